//! Contract auto-implementation
//!
//! Builds an instance of a contract whose every member is supplied by a
//! caller-provided resolver. Each member maps to either a method on a target
//! object or a free function; the generated implementation forwards calls
//! unchanged and returns results unchanged.
//!
//! Nothing is cached across calls: free bindings are baked into the dispatch
//! table, so two calls with the same contract may legitimately produce
//! different implementations. Each call registers a fresh name, and names are
//! never released: on `Registry::global()` the name set grows by one per call.
//! Give long-running callers that implement repeatedly their own registry.

use std::sync::Arc;

use tracing::debug;
use weave_core::{ContractRef, Error, MethodSig, Result};

use crate::binding::Binding;
use crate::composite::{Composite, Constructor};
use crate::registry::Registry;
use crate::validator::is_contract;

/// Maps a contract member to the binding that implements it
pub type Resolver<'a> = dyn Fn(&MethodSig) -> Result<Binding> + 'a;

/// Builds contract instances from resolved bindings
#[derive(Debug, Clone)]
pub struct AutoImplementer {
    registry: Arc<Registry>,
}

impl AutoImplementer {
    /// Implementer registering into the global registry
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    /// Implementer registering into `registry`
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Registry generated implementations are registered in
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Implement `contract` by asking `resolver` for each declared member
    ///
    /// Members are resolved in declaration order, properties expanded to
    /// their accessors. Inherited members are not resolved.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `contract` is not an interface or a binding's
    ///   shape differs from its member
    /// - `MissingArgument` if `resolver` is `None`
    /// - any error returned by the resolver itself
    pub fn implement(
        &self,
        contract: &ContractRef,
        resolver: Option<&Resolver<'_>>,
    ) -> Result<Composite> {
        if !is_contract(contract) {
            return Err(Error::invalid_argument(format!(
                "T must be an interface/contract, got `{}`",
                contract.name()
            )));
        }
        let resolver =
            resolver.ok_or_else(|| Error::missing_argument("resolver must be provided"))?;

        let mut resolved = Vec::new();
        for member in contract.declared_methods() {
            let binding = resolver(&member)?;
            resolved.push((member, binding));
        }

        let name = self
            .registry
            .unique_name(&format!("{}_auto", contract.name()));
        let (implementation, targets) =
            self.registry
                .generator()
                .generate_bound(name.clone(), contract, resolved)?;
        self.registry.define(&name)?;
        debug!(
            contract = contract.name(),
            implementation = %name,
            targets = targets.len(),
            "Auto-implemented contract"
        );

        Constructor::new(Arc::new(implementation), self.registry.config().verify_sources)
            .construct(targets)
    }

    /// Like [`implement`](Self::implement) with a resolver that is always present
    pub fn implement_with<F>(&self, contract: &ContractRef, resolver: F) -> Result<Composite>
    where
        F: Fn(&MethodSig) -> Result<Binding>,
    {
        let resolver: &Resolver<'_> = &resolver;
        self.implement(contract, Some(resolver))
    }
}

impl Default for AutoImplementer {
    fn default() -> Self {
        Self::new()
    }
}
