//! Forwarding generator
//!
//! Builds dispatch tables. Two shapes are produced:
//!
//! - **Aggregate** (`generate`): one slot per component contract, in order.
//!   For each component, its own members and then those of every contract it
//!   extends become forwarding entries that call the same member on the slot.
//! - **Bound** (`generate_bound`): one entry per member of a flat contract,
//!   routed by a resolved `Binding`; only instance bindings take a slot.
//!
//! ## Member-name conflicts
//!
//! When a name has already been materialized, later occurrences are skipped,
//! so the first component in order wins. This is silent under
//! `ConflictPolicy::FirstWins`. Under `ConflictPolicy::Reject` a second
//! sighting from a *different* declaring contract fails generation; sightings
//! of the very same contract's member (diamonds, a shared identity contract)
//! are always skipped quietly.
//!
//! Properties are paired with their accessor entries only after every
//! forwarding entry exists.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use weave_core::contract::{getter_name, setter_name};
use weave_core::{ContractId, ContractRef, Error, MethodSig, ObjectRef, PropertySig, Result};

use crate::binding::Binding;
use crate::composite::{ForwardingMethod, Implementation, PropertyAccessors, Route, SlotSpec};
use crate::config::ConflictPolicy;

/// Generator of forwarding implementations
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardingGenerator {
    policy: ConflictPolicy,
}

/// Accumulates entries while enforcing the conflict policy
struct TableBuilder {
    policy: ConflictPolicy,
    methods: Vec<ForwardingMethod>,
    declared: FxHashMap<String, (ContractId, String)>,
    property_decls: Vec<PropertySig>,
}

impl TableBuilder {
    fn new(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            methods: Vec::new(),
            declared: FxHashMap::default(),
            property_decls: Vec::new(),
        }
    }

    /// Returns false if the name was already taken and the entry skipped
    fn push(&mut self, declaring: &ContractRef, sig: &MethodSig, route: Route) -> Result<bool> {
        if let Some((first_id, first_name)) = self.declared.get(sig.name()) {
            if self.policy == ConflictPolicy::Reject && *first_id != declaring.id() {
                return Err(Error::MemberConflict {
                    member: sig.name().to_string(),
                    first: first_name.clone(),
                    second: declaring.name().to_string(),
                });
            }
            trace!(member = sig.name(), kept = %first_name, skipped = declaring.name(), "Skipped duplicate member");
            return Ok(false);
        }
        self.declared.insert(
            sig.name().to_string(),
            (declaring.id(), declaring.name().to_string()),
        );
        self.methods
            .push(ForwardingMethod::new(sig.clone(), route, declaring.name()));
        Ok(true)
    }

    fn properties(&self) -> FxHashMap<String, PropertyAccessors> {
        let index: FxHashMap<&str, usize> = self
            .methods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.signature().name(), i))
            .collect();

        let mut table: FxHashMap<String, (PropertySig, Option<usize>, Option<usize>)> =
            FxHashMap::default();
        for prop in &self.property_decls {
            let entry = table
                .entry(prop.name().to_string())
                .or_insert_with(|| (prop.clone(), None, None));
            if prop.has_getter() && entry.1.is_none() {
                entry.1 = index.get(getter_name(prop.name()).as_str()).copied();
            }
            if prop.has_setter() && entry.2.is_none() {
                entry.2 = index.get(setter_name(prop.name()).as_str()).copied();
            }
        }
        table
            .into_iter()
            .map(|(name, (sig, getter, setter))| {
                (name, PropertyAccessors::new(sig.value_type(), getter, setter))
            })
            .collect()
    }
}

impl ForwardingGenerator {
    /// Generator using `policy` for member-name conflicts
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    /// Conflict policy in effect
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Build an aggregate implementation of `combined` over `components`
    ///
    /// # Errors
    ///
    /// Returns `MemberConflict` under the reject policy, or `InvalidArgument`
    /// if `combined` declares a member none of the components provides.
    pub fn generate(
        &self,
        name: String,
        components: &[ContractRef],
        combined: &ContractRef,
    ) -> Result<Implementation> {
        let mut table = TableBuilder::new(self.policy);
        let mut slots = Vec::with_capacity(components.len());

        for (index, component) in components.iter().enumerate() {
            slots.push(SlotSpec::new(
                format!("obj{}", index + 1),
                Some(Arc::clone(component)),
            ));
            let lineage = std::iter::once(Arc::clone(component)).chain(component.ancestors());
            for declaring in lineage {
                for sig in declaring.declared_methods() {
                    let route = Route::Slot {
                        index,
                        member: sig.name().to_string(),
                    };
                    table.push(&declaring, &sig, route)?;
                }
                table
                    .property_decls
                    .extend(declaring.declared_properties().cloned());
            }
        }

        check_complete(combined, &table)?;
        let properties = table.properties();
        debug!(
            implementation = %name,
            contract = combined.name(),
            slots = slots.len(),
            methods = table.methods.len(),
            properties = properties.len(),
            "Generated aggregate implementation"
        );
        Ok(Implementation::new(
            name,
            Arc::clone(combined),
            slots,
            table.methods,
            properties,
        ))
    }

    /// Build an implementation of `contract` from resolved bindings
    ///
    /// `resolved` pairs each contract member with its binding, in declaration
    /// order. Returns the implementation together with the captured targets
    /// in slot order, ready to be passed to its constructor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a binding's shape does not match its member.
    pub fn generate_bound(
        &self,
        name: String,
        contract: &ContractRef,
        resolved: Vec<(MethodSig, Binding)>,
    ) -> Result<(Implementation, Vec<ObjectRef>)> {
        let mut table = TableBuilder::new(self.policy);
        let mut slots = Vec::new();
        let mut targets = Vec::new();

        for (member, binding) in resolved {
            binding.check_against(&member)?;
            let route = match binding {
                Binding::Instance { target, method } => {
                    let index = targets.len();
                    slots.push(SlotSpec::new(format!("target_{}", member.name()), None));
                    targets.push(target);
                    Route::Slot {
                        index,
                        member: method.name().to_string(),
                    }
                }
                Binding::Free { body, .. } => Route::Free(body),
            };
            table.push(contract, &member, route)?;
        }
        table
            .property_decls
            .extend(contract.declared_properties().cloned());

        let properties = table.properties();
        debug!(
            implementation = %name,
            contract = contract.name(),
            slots = slots.len(),
            methods = table.methods.len(),
            "Generated bound implementation"
        );
        Ok((
            Implementation::new(name, Arc::clone(contract), slots, table.methods, properties),
            targets,
        ))
    }
}

/// Every callable member of `combined` must have an entry
fn check_complete(combined: &ContractRef, table: &TableBuilder) -> Result<()> {
    let lineage = std::iter::once(Arc::clone(combined)).chain(combined.ancestors());
    for contract in lineage {
        for sig in contract.declared_methods() {
            if !table.declared.contains_key(sig.name()) {
                return Err(Error::invalid_argument(format!(
                    "TOut declares member `{}` (on {}) that no component provides",
                    sig.name(),
                    contract.name()
                )));
            }
        }
    }
    Ok(())
}
