//! Generated implementations and their instances
//!
//! An `Implementation` is a dispatch table: one forwarding entry per contract
//! member, each routed either to a captured slot or to a free function, plus a
//! property table pairing property names with their accessor entries.
//! A `Constructor` instantiates it into a `Composite` by capturing one source
//! per slot, in order. Slots are never mutated after construction.

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use weave_core::contract::{getter_name, setter_name};
use weave_core::{
    ContractId, ContractRef, Error, MethodBody, MethodSig, Object, ObjectRef, Result, Value,
    ValueType,
};

/// Where a forwarding entry sends its call
#[derive(Clone)]
pub enum Route {
    /// Call `member` on the object captured in slot `index`
    Slot {
        /// Slot position
        index: usize,
        /// Member name on the captured object
        member: String,
    },
    /// Call a free function; nothing is captured
    Free(MethodBody),
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Slot { index, member } => write!(f, "slot{}.{}", index, member),
            Route::Free(_) => f.write_str("free fn"),
        }
    }
}

/// One member of a generated implementation
#[derive(Debug, Clone)]
pub struct ForwardingMethod {
    signature: MethodSig,
    route: Route,
    declared_by: String,
}

impl ForwardingMethod {
    pub(crate) fn new(signature: MethodSig, route: Route, declared_by: impl Into<String>) -> Self {
        Self {
            signature,
            route,
            declared_by: declared_by.into(),
        }
    }

    /// Contract member signature this entry implements
    pub fn signature(&self) -> &MethodSig {
        &self.signature
    }

    /// Routing target
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Captured slot, if the route uses one
    pub fn slot(&self) -> Option<usize> {
        match self.route {
            Route::Slot { index, .. } => Some(index),
            Route::Free(_) => None,
        }
    }

    /// Name of the contract that declared the member
    pub fn declared_by(&self) -> &str {
        &self.declared_by
    }
}

/// Property paired with its accessor entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccessors {
    value_type: ValueType,
    getter: Option<usize>,
    setter: Option<usize>,
}

impl PropertyAccessors {
    pub(crate) fn new(value_type: ValueType, getter: Option<usize>, setter: Option<usize>) -> Self {
        Self {
            value_type,
            getter,
            setter,
        }
    }

    /// Property value type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether reads are forwarded
    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    /// Whether writes are forwarded
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }
}

/// A constructor parameter
#[derive(Debug, Clone)]
pub struct SlotSpec {
    label: String,
    contract: Option<ContractRef>,
}

impl SlotSpec {
    pub(crate) fn new(label: impl Into<String>, contract: Option<ContractRef>) -> Self {
        Self {
            label: label.into(),
            contract,
        }
    }

    /// Positional label used in error messages (`obj1`, `target_Inc`, ...)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Contract the captured object must implement, if any
    pub fn contract(&self) -> Option<&ContractRef> {
        self.contract.as_ref()
    }
}

/// Generated implementation of a contract
pub struct Implementation {
    name: String,
    contract: ContractRef,
    satisfies: FxHashSet<ContractId>,
    slots: Vec<SlotSpec>,
    methods: Vec<ForwardingMethod>,
    method_index: FxHashMap<String, usize>,
    properties: FxHashMap<String, PropertyAccessors>,
}

impl Implementation {
    pub(crate) fn new(
        name: String,
        contract: ContractRef,
        slots: Vec<SlotSpec>,
        methods: Vec<ForwardingMethod>,
        properties: FxHashMap<String, PropertyAccessors>,
    ) -> Self {
        let mut satisfies: FxHashSet<ContractId> =
            contract.ancestors().iter().map(|c| c.id()).collect();
        satisfies.insert(contract.id());
        let method_index = methods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.signature.name().to_string(), i))
            .collect();
        Self {
            name,
            contract,
            satisfies,
            slots,
            methods,
            method_index,
            properties,
        }
    }

    /// Registered name, unique within its registry namespace
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contract this implementation satisfies
    pub fn contract(&self) -> &ContractRef {
        &self.contract
    }

    /// Constructor parameters in order
    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    /// Forwarding entries in generation order
    pub fn methods(&self) -> &[ForwardingMethod] {
        &self.methods
    }

    /// Entry for a method name
    pub fn method(&self, name: &str) -> Option<&ForwardingMethod> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }

    /// Property table entry
    pub fn property(&self, name: &str) -> Option<&PropertyAccessors> {
        self.properties.get(name)
    }

    /// Number of synthesized properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("name", &self.name)
            .field("contract", &self.contract.name())
            .field("slots", &self.slots.len())
            .field("methods", &self.methods)
            .finish()
    }
}

/// Reusable construction function for one implementation
#[derive(Debug, Clone)]
pub struct Constructor {
    implementation: Arc<Implementation>,
    verify_sources: bool,
}

impl Constructor {
    pub(crate) fn new(implementation: Arc<Implementation>, verify_sources: bool) -> Self {
        Self {
            implementation,
            verify_sources,
        }
    }

    /// The implementation this constructor instantiates
    pub fn implementation(&self) -> &Arc<Implementation> {
        &self.implementation
    }

    /// Capture `sources` into a fresh instance; source *i* lands in slot *i*
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` on an arity mismatch or, when verification is
    /// on, if a source does not implement its slot contract.
    pub fn construct(&self, sources: Vec<ObjectRef>) -> Result<Composite> {
        let slots = self.implementation.slots();
        if sources.len() != slots.len() {
            return Err(Error::invalid_argument(format!(
                "{} expects {} source(s), got {}",
                self.implementation.name(),
                slots.len(),
                sources.len()
            )));
        }
        if self.verify_sources {
            for (spec, source) in slots.iter().zip(&sources) {
                if let Some(contract) = spec.contract() {
                    if !source.implements(contract.id()) {
                        return Err(Error::invalid_argument(format!(
                            "{} does not implement {}",
                            spec.label(),
                            contract.name()
                        )));
                    }
                }
            }
        }
        Ok(Composite {
            implementation: Arc::clone(&self.implementation),
            slots: sources.into_boxed_slice(),
        })
    }
}

/// Instance of a generated implementation
pub struct Composite {
    implementation: Arc<Implementation>,
    slots: Box<[ObjectRef]>,
}

impl Composite {
    /// The shared generated implementation
    pub fn implementation(&self) -> &Arc<Implementation> {
        &self.implementation
    }

    /// Wrap in an `ObjectRef`, e.g. to merge it again
    pub fn into_object(self) -> ObjectRef {
        Arc::new(self)
    }

    fn dispatch(&self, entry: &ForwardingMethod, args: &[Value]) -> Result<Value> {
        entry.signature.check_args(args)?;
        match &entry.route {
            Route::Slot { index, member } => self.slots[*index].call(member, args),
            Route::Free(body) => body(args),
        }
    }
}

impl Object for Composite {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let entry = self
            .implementation
            .method(method)
            .ok_or_else(|| Error::member_not_found(method))?;
        self.dispatch(entry, args)
    }

    fn implements(&self, contract: ContractId) -> bool {
        self.implementation.satisfies.contains(&contract)
    }

    fn get(&self, property: &str) -> Result<Value> {
        let getter = self
            .implementation
            .property(property)
            .and_then(|p| p.getter)
            .ok_or_else(|| Error::member_not_found(getter_name(property)))?;
        self.dispatch(&self.implementation.methods[getter], &[])
    }

    fn set(&self, property: &str, value: Value) -> Result<()> {
        let setter = self
            .implementation
            .property(property)
            .and_then(|p| p.setter)
            .ok_or_else(|| Error::member_not_found(setter_name(property)))?;
        self.dispatch(&self.implementation.methods[setter], &[value])
            .map(|_| ())
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("implementation", &self.implementation.name())
            .field("slots", &self.slots.len())
            .finish()
    }
}
