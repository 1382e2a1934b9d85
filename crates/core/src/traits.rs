//! Core traits for live objects
//!
//! Every source object, binding target and generated instance implements
//! `Object`. Members are addressed by name; property access goes through the
//! `get_<name>` / `set_<name>` accessor methods unless an implementation
//! overrides `get` / `set`.
//!
//! Thread safety: objects are shared across threads behind `Arc`, so every
//! implementation must be `Send + Sync`.

use std::sync::Arc;

use crate::contract::{getter_name, setter_name, ContractId};
use crate::error::Result;
use crate::value::Value;

/// Shared handle to a live object
pub type ObjectRef = Arc<dyn Object>;

/// Function body usable as a method implementation
pub type MethodBody = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A live object that can be called through its contracts
pub trait Object: Send + Sync {
    /// Invoke the method `method` with `args`
    ///
    /// # Errors
    ///
    /// Returns `MemberNotFound` for unknown members, `SignatureMismatch` for
    /// bad arguments, or whatever the member body itself fails with.
    fn call(&self, method: &str, args: &[Value]) -> Result<Value>;

    /// Whether this object satisfies `contract`
    fn implements(&self, contract: ContractId) -> bool;

    /// Read a property
    fn get(&self, property: &str) -> Result<Value> {
        self.call(&getter_name(property), &[])
    }

    /// Write a property
    fn set(&self, property: &str, value: Value) -> Result<()> {
        self.call(&setter_name(property), &[value]).map(|_| ())
    }
}
