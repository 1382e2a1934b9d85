//! Object merging
//!
//! Combines objects implementing component contracts into one object
//! implementing a contract that extends exactly those components. The
//! implementation for a given shape (combined contract plus ordered components)
//! is generated once per registry and reused for every later merge of that
//! shape.
//!
//! ## Flow
//!
//! 1. Validate contracts (nothing is generated or cached on failure)
//! 2. Fetch or build the constructor through the registry's cache
//! 3. Construct a composite over the sources, in component order
//!
//! `join_by_id` adds an identity check in front: both sources must agree on
//! every readable member of the identity contract before anything is built.

use std::sync::Arc;

use tracing::{debug, trace};
use weave_core::{ContractRef, Error, Member, ObjectRef, Result, Value};

use crate::cache::CompositeCache;
use crate::composite::{Composite, Constructor};
use crate::key::StructuralKey;
use crate::registry::Registry;
use crate::validator::{validate_aggregation, validate_identity};

/// Merges objects into composites of their contracts
#[derive(Debug, Clone)]
pub struct ObjectMerger {
    registry: Arc<Registry>,
}

impl ObjectMerger {
    /// Merger backed by the global registry
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    /// Merger backed by `registry`
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Backing registry
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Merge two objects into an instance of `t_out`
    ///
    /// Members of `obj1` take precedence over same-named members of `obj2`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `t1`, `t2` or `t_out` is not an interface,
    /// or if `t_out` does not extend exactly `t1` and `t2`.
    pub fn merge(
        &self,
        t1: &ContractRef,
        obj1: ObjectRef,
        t2: &ContractRef,
        obj2: ObjectRef,
        t_out: &ContractRef,
    ) -> Result<Composite> {
        self.merge_all(
            &[(Arc::clone(t1), obj1), (Arc::clone(t2), obj2)],
            t_out,
        )
    }

    /// Merge any number of objects into an instance of `t_out`
    ///
    /// Earlier components win member-name conflicts.
    pub fn merge_all(
        &self,
        parts: &[(ContractRef, ObjectRef)],
        t_out: &ContractRef,
    ) -> Result<Composite> {
        let components: Vec<ContractRef> = parts.iter().map(|(c, _)| Arc::clone(c)).collect();
        validate_aggregation(&components, t_out)?;

        let key = StructuralKey::of(t_out, &components);
        let ctor = self.constructor(self.registry.merge_cache(), &key, &components, t_out)?;
        trace!(key = %key, "Merging objects");
        ctor.construct(parts.iter().map(|(_, o)| Arc::clone(o)).collect())
    }

    /// Merge two objects that share an identity
    ///
    /// Every readable member of `t_id` (properties with a getter and methods
    /// without parameters) is read from both objects and compared first.
    /// Identity members appear once on the result, sourced from `obj1`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the objects disagree on any identity member
    /// - `InvalidArgument` if `t_id` is not an interface, one of its members
    ///   cannot be read, or the contracts fail validation as in `merge`
    pub fn join_by_id(
        &self,
        t_id: &ContractRef,
        t1: &ContractRef,
        obj1: ObjectRef,
        t2: &ContractRef,
        obj2: ObjectRef,
        t_out: &ContractRef,
    ) -> Result<Composite> {
        validate_identity(t_id)?;
        check_same_identity(t_id, &obj1, &obj2)?;

        let components = [Arc::clone(t1), Arc::clone(t2)];
        validate_aggregation(&components, t_out)?;

        let key = StructuralKey::of(
            t_out,
            &[Arc::clone(t_id), Arc::clone(t1), Arc::clone(t2)],
        );
        let ctor = self.constructor(self.registry.join_cache(), &key, &components, t_out)?;
        trace!(key = %key, "Joining objects");
        ctor.construct(vec![obj1, obj2])
    }

    fn constructor(
        &self,
        cache: &CompositeCache,
        key: &StructuralKey,
        components: &[ContractRef],
        t_out: &ContractRef,
    ) -> Result<Constructor> {
        cache.get_or_create(key, || {
            let name = self.registry.unique_name(t_out.name());
            let implementation = self
                .registry
                .generator()
                .generate(name.clone(), components, t_out)?;
            self.registry.define(&name)?;
            Ok(Constructor::new(
                Arc::new(implementation),
                self.registry.config().verify_sources,
            ))
        })
    }
}

impl Default for ObjectMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare every readable identity member of `obj1` and `obj2`
fn check_same_identity(t_id: &ContractRef, obj1: &ObjectRef, obj2: &ObjectRef) -> Result<()> {
    let lineage = std::iter::once(Arc::clone(t_id)).chain(t_id.ancestors());
    for contract in lineage {
        for member in contract.members() {
            let (first, second) = read_identity_member(member, obj1, obj2)?;
            if !first.same_identity(&second) {
                debug!(
                    identity = t_id.name(),
                    member = member.name(),
                    "Identity mismatch"
                );
                return Err(Error::invalid_state(format!(
                    "identity mismatch between obj1 and obj2 on `{}` ({} vs {})",
                    member.name(),
                    first.type_name(),
                    second.type_name()
                )));
            }
        }
    }
    Ok(())
}

fn read_identity_member(
    member: &Member,
    obj1: &ObjectRef,
    obj2: &ObjectRef,
) -> Result<(Value, Value)> {
    match member {
        Member::Property(prop) if prop.has_getter() => {
            Ok((obj1.get(prop.name())?, obj2.get(prop.name())?))
        }
        Member::Method(sig) if sig.arity() == 0 => {
            Ok((obj1.call(sig.name(), &[])?, obj2.call(sig.name(), &[])?))
        }
        other => Err(Error::invalid_argument(format!(
            "identity member `{}` of TId cannot be read",
            other.name()
        ))),
    }
}
