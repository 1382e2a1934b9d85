//! Contract descriptors
//!
//! A contract is an interface-like description of a type: an ordered list of
//! member signatures plus the contracts it extends.
//!
//! ## Module Structure
//!
//! - `member`: method and property signatures, accessor naming
//! - `descriptor`: `Contract`, `ContractId`, `ContractBuilder`
//!
//! ## Usage
//!
//! ```
//! use weave_core::contract::{Access, Contract};
//! use weave_core::ValueType;
//!
//! let first = Contract::interface("IFirst")
//!     .property("Prop1", ValueType::Int, Access::Get)
//!     .build();
//! let second = Contract::interface("ISecond")
//!     .method("GetValue", [ValueType::Int], ValueType::Int)
//!     .build();
//! let aggregated = Contract::interface("IAggregated")
//!     .extends(&first)
//!     .extends(&second)
//!     .build();
//! assert_eq!(aggregated.ancestors().len(), 2);
//! ```

pub mod descriptor;
pub mod member;

// Re-exports
pub use descriptor::{Contract, ContractBuilder, ContractId, ContractKind, ContractRef};
pub use member::{
    getter_name, setter_name, Access, Member, MethodSig, PropertySig, GETTER_PREFIX,
    SETTER_PREFIX,
};
