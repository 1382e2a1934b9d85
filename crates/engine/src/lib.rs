//! Composition engine for weave
//!
//! This crate builds objects that satisfy contracts at runtime:
//! - AutoImplementer: implement a contract from per-member bindings
//! - ObjectMerger: merge objects implementing component contracts into one
//!   implementing their combined contract, optionally joined on an identity
//! - Forwarding generator: dispatch tables whose entries forward to captured
//!   sources or free functions
//! - Composite cache: one generated implementation per structural shape
//! - Registry: namespace of generated names, owner of the caches
//!
//! Contracts, values and the `Object` trait live in `weave-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auto_implementer;
pub mod binding;
pub mod cache;
pub mod composite;
pub mod config;
pub mod forwarding;
pub mod key;
pub mod merger;
pub mod registry;
pub mod validator;

pub use auto_implementer::{AutoImplementer, Resolver};
pub use binding::Binding;
pub use cache::CompositeCache;
pub use composite::{
    Composite, Constructor, ForwardingMethod, Implementation, PropertyAccessors, Route, SlotSpec,
};
pub use config::{ConflictPolicy, EngineConfig, CONFIG_FILE_NAME};
pub use forwarding::ForwardingGenerator;
pub use key::StructuralKey;
pub use merger::ObjectMerger;
pub use registry::Registry;
pub use validator::{is_contract, minimal_ancestors, validate_aggregation, validate_identity};
