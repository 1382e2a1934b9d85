//! Weave - runtime contract composition
//!
//! Weave builds objects that satisfy contracts at runtime, without a
//! hand-written implementation type per combination:
//!
//! - [`AutoImplementer`] implements a contract from per-member bindings, each
//!   pointing at a method on some target object or at a free function
//! - [`ObjectMerger`] combines objects implementing component contracts into a
//!   single object implementing a contract that extends exactly those
//!   components; `join_by_id` first checks that the sources share an identity
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use weave::{Access, Contract, Instance, Object, ObjectMerger, ObjectRef, Registry, Value, ValueType};
//!
//! let named = Contract::interface("INamed")
//!     .property("Name", ValueType::String, Access::Get)
//!     .build();
//! let aged = Contract::interface("IAged")
//!     .property("Age", ValueType::Int, Access::Get)
//!     .build();
//! let person = Contract::interface("IPerson").extends(&named).extends(&aged).build();
//!
//! let name: ObjectRef = Instance::builder("Name").implements(&named).property("Name", "Ada").build()?;
//! let age: ObjectRef = Instance::builder("Age").implements(&aged).property("Age", 36).build()?;
//!
//! let merger = ObjectMerger::with_registry(Arc::new(Registry::new()));
//! let merged = merger.merge(&named, name, &aged, age, &person)?;
//! assert_eq!(merged.get("Name")?, Value::from("Ada"));
//! assert_eq!(merged.get("Age")?, Value::Int(36));
//! # Ok::<(), weave::Error>(())
//! ```
//!
//! # Architecture
//!
//! Contracts, values and the `Object` trait live in `weave-core`; generation,
//! caching and the registry live in `weave-engine`. Both are re-exported here.

pub use weave_core::*;
pub use weave_engine::*;
