//! Core types and traits for weave
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / ValueType: dynamic values and their static types
//! - Contract: interface-like type descriptors (members + parents)
//! - Object: the trait every source, target and generated instance implements
//! - Instance: closure-backed objects for hand-built sources
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod contract;
pub mod error;
pub mod instance;
pub mod traits;
pub mod value;

// Re-export commonly used types and traits
pub use contract::{
    Access, Contract, ContractBuilder, ContractId, ContractKind, ContractRef, Member, MethodSig,
    PropertySig,
};
pub use error::{Error, Result};
pub use instance::{Instance, InstanceBuilder};
pub use traits::{MethodBody, Object, ObjectRef};
pub use value::{Value, ValueType};
