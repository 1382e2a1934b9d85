//! Registry of generated implementations
//!
//! A registry owns the namespace that generated implementations (and
//! synthesized contracts) are registered in, plus the merge and join caches.
//! It lives as long as its last `Arc`; the process-wide default returned by
//! `Registry::global()` is never torn down.
//!
//! Pass a registry explicitly wherever isolation matters (tests in
//! particular). Name registration is serialized by a single mutex; builds are
//! rare relative to calls, so that lock is cold.
//!
//! Uses parking_lot::Mutex instead of std::sync::Mutex to avoid cascading
//! panics from mutex poisoning.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use weave_core::{Contract, ContractId, ContractRef, Error, Result};

use crate::cache::CompositeCache;
use crate::config::EngineConfig;
use crate::forwarding::ForwardingGenerator;
use crate::validator::is_contract;

/// Process-wide default registry
static GLOBAL_REGISTRY: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

/// Namespace and caches for generated implementations
#[derive(Debug)]
pub struct Registry {
    namespace: String,
    config: EngineConfig,
    names: Mutex<FxHashSet<String>>,
    pairs: Mutex<FxHashMap<(ContractId, ContractId), ContractRef>>,
    merge_cache: CompositeCache,
    join_cache: CompositeCache,
}

impl Registry {
    /// Registry with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Registry with explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        let namespace = format!("{}_{}", config.namespace_prefix, Uuid::new_v4().simple());
        info!(namespace = %namespace, policy = ?config.conflict_policy, "Created registry");
        Self {
            namespace,
            config,
            names: Mutex::new(FxHashSet::default()),
            pairs: Mutex::new(FxHashMap::default()),
            merge_cache: CompositeCache::new(),
            join_cache: CompositeCache::new(),
        }
    }

    /// The process-wide default registry
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Namespace name
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generator configured with this registry's conflict policy
    pub fn generator(&self) -> ForwardingGenerator {
        ForwardingGenerator::new(self.config.conflict_policy)
    }

    /// Cache used by plain merges
    pub fn merge_cache(&self) -> &CompositeCache {
        &self.merge_cache
    }

    /// Cache used by join-by-id merges
    pub fn join_cache(&self) -> &CompositeCache {
        &self.join_cache
    }

    /// Register `name` in the namespace
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if the name is already taken.
    pub fn define(&self, name: &str) -> Result<()> {
        let mut names = self.names.lock();
        if !names.insert(name.to_string()) {
            return Err(Error::DuplicateRegistration {
                namespace: self.namespace.clone(),
                name: name.to_string(),
            });
        }
        debug!(namespace = %self.namespace, name, "Registered name");
        Ok(())
    }

    /// Whether `name` is registered
    pub fn is_defined(&self, name: &str) -> bool {
        self.names.lock().contains(name)
    }

    /// Number of registered names
    pub fn defined_count(&self) -> usize {
        self.names.lock().len()
    }

    /// A fresh `<base>_impl_<uuid>` name (not yet registered)
    pub fn unique_name(&self, base: &str) -> String {
        format!("{}_impl_{}", base, Uuid::new_v4().simple())
    }

    /// Register and return a fresh name derived from `base`
    pub fn define_unique(&self, base: &str) -> Result<String> {
        let name = self.unique_name(base);
        self.define(&name)?;
        Ok(name)
    }

    /// Synthesize a contract whose direct parents are exactly `t1` and `t2`
    ///
    /// The new contract declares no members of its own and is registered as
    /// `IBoth_<t1>_<t2>_<uuid>`. Later calls with the same ordered pair return
    /// the contract built by the first call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either input is not a contract.
    pub fn inherit_both(&self, t1: &ContractRef, t2: &ContractRef) -> Result<ContractRef> {
        if !is_contract(t1) || !is_contract(t2) {
            return Err(Error::invalid_argument(format!(
                "both types `{}` and `{}` must be interfaces",
                t1.name(),
                t2.name()
            )));
        }

        let mut pairs = self.pairs.lock();
        if let Some(existing) = pairs.get(&(t1.id(), t2.id())) {
            return Ok(Arc::clone(existing));
        }
        let name = format!(
            "IBoth_{}_{}_{}",
            t1.name(),
            t2.name(),
            Uuid::new_v4().simple()
        );
        self.define(&name)?;
        let both = Contract::interface(name).extends(t1).extends(t2).build();
        pairs.insert((t1.id(), t2.id()), Arc::clone(&both));
        Ok(both)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
