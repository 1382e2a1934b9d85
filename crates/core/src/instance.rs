//! Closure-backed objects
//!
//! `Instance` is a ready-made `Object` assembled from method closures and
//! stored property values. It declares the contracts it implements; `build`
//! refuses to produce an instance that leaves a declared member without a
//! body or a stored value.
//!
//! Property storage is read/write at the instance level regardless of what a
//! contract exposes, the same way a class may add a setter its interface does
//! not declare.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::contract::{ContractId, ContractRef, Member, MethodSig, GETTER_PREFIX, SETTER_PREFIX};
use crate::error::{Error, Result};
use crate::traits::{MethodBody, Object};
use crate::value::Value;

/// Object built from closures and stored property values
pub struct Instance {
    type_name: String,
    contracts: FxHashSet<ContractId>,
    signatures: FxHashMap<String, MethodSig>,
    methods: FxHashMap<String, MethodBody>,
    properties: RwLock<FxHashMap<String, Value>>,
}

impl Instance {
    /// Start building an instance of a type called `type_name`
    pub fn builder(type_name: impl Into<String>) -> InstanceBuilder {
        InstanceBuilder {
            type_name: type_name.into(),
            contracts: Vec::new(),
            methods: FxHashMap::default(),
            properties: FxHashMap::default(),
        }
    }

    /// Name given at build time
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Current stored value of a property, bypassing accessors
    pub fn peek(&self, property: &str) -> Option<Value> {
        self.properties.read().get(property).cloned()
    }

    fn property_access(&self, method: &str, args: &[Value]) -> Option<Result<Value>> {
        if let Some(name) = method.strip_prefix(GETTER_PREFIX) {
            let props = self.properties.read();
            let value = props.get(name)?;
            if !args.is_empty() {
                return Some(Err(arity_mismatch(method, 0, args.len())));
            }
            return Some(Ok(value.clone()));
        }
        if let Some(name) = method.strip_prefix(SETTER_PREFIX) {
            let mut props = self.properties.write();
            let slot = props.get_mut(name)?;
            if args.len() != 1 {
                return Some(Err(arity_mismatch(method, 1, args.len())));
            }
            *slot = args[0].clone();
            return Some(Ok(Value::Null));
        }
        None
    }
}

fn arity_mismatch(method: &str, expected: usize, actual: usize) -> Error {
    Error::SignatureMismatch {
        member: method.to_string(),
        expected: format!("{} argument(s)", expected),
        actual: format!("{} argument(s)", actual),
    }
}

impl Object for Instance {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        if let Some(sig) = self.signatures.get(method) {
            sig.check_args(args)?;
        }
        if let Some(body) = self.methods.get(method) {
            return body(args);
        }
        self.property_access(method, args)
            .unwrap_or_else(|| Err(Error::member_not_found(method)))
    }

    fn implements(&self, contract: ContractId) -> bool {
        self.contracts.contains(&contract)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("methods", &self.methods.len())
            .field("properties", &self.properties.read().len())
            .finish()
    }
}

/// Builder for `Instance`
pub struct InstanceBuilder {
    type_name: String,
    contracts: Vec<ContractRef>,
    methods: FxHashMap<String, MethodBody>,
    properties: FxHashMap<String, Value>,
}

impl InstanceBuilder {
    /// Declare an implemented contract (its ancestors are implied)
    pub fn implements(mut self, contract: &ContractRef) -> Self {
        self.contracts.push(Arc::clone(contract));
        self
    }

    /// Provide a method body
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(body));
        self
    }

    /// Provide a stored property with its initial value
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Finish the instance
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a member of a declared contract (or one of
    /// its ancestors) has no method body or stored property.
    pub fn build(self) -> Result<Arc<Instance>> {
        let mut contracts = FxHashSet::default();
        let mut signatures: FxHashMap<String, MethodSig> = FxHashMap::default();

        for contract in &self.contracts {
            let lineage = std::iter::once(Arc::clone(contract)).chain(contract.ancestors());
            for c in lineage {
                if !contracts.insert(c.id()) {
                    continue;
                }
                for member in c.members() {
                    let provided = match member {
                        Member::Method(m) => self.methods.contains_key(m.name()),
                        Member::Property(p) => self.properties.contains_key(p.name()),
                    };
                    if !provided {
                        return Err(Error::invalid_argument(format!(
                            "type `{}` does not provide member `{}` of `{}`",
                            self.type_name,
                            member.name(),
                            c.name()
                        )));
                    }
                    for sig in member.methods() {
                        signatures.entry(sig.name().to_string()).or_insert(sig);
                    }
                }
            }
        }

        Ok(Arc::new(Instance {
            type_name: self.type_name,
            contracts,
            signatures,
            methods: self.methods,
            properties: RwLock::new(self.properties),
        }))
    }
}
