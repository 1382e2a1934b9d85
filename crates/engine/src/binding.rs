//! Member bindings
//!
//! A binding says how one contract member is implemented: by calling a method
//! on a target object, or by calling a free function. The concrete signature
//! must have exactly the contract member's parameter and return types; only the
//! name may differ.

use std::fmt;
use std::sync::Arc;

use weave_core::{Error, MethodBody, MethodSig, ObjectRef, Result, Value};

/// Implementation of one contract member
#[derive(Clone)]
pub enum Binding {
    /// Call `method` on `target`
    Instance {
        /// Object the call is forwarded to
        target: ObjectRef,
        /// Concrete method on the target
        method: MethodSig,
    },
    /// Call a free function; no target is captured
    Free {
        /// Concrete function signature
        function: MethodSig,
        /// Function body
        body: MethodBody,
    },
}

impl Binding {
    /// Bind to a method on a target object
    pub fn instance(target: ObjectRef, method: MethodSig) -> Self {
        Binding::Instance { target, method }
    }

    /// Bind to a free function
    pub fn free<F>(function: MethodSig, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Binding::Free {
            function,
            body: Arc::new(body),
        }
    }

    /// Captured target, if any
    pub fn target(&self) -> Option<&ObjectRef> {
        match self {
            Binding::Instance { target, .. } => Some(target),
            Binding::Free { .. } => None,
        }
    }

    /// Concrete member signature
    pub fn signature(&self) -> &MethodSig {
        match self {
            Binding::Instance { method, .. } => method,
            Binding::Free { function, .. } => function,
        }
    }

    /// Check that this binding can implement `member`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when parameter or return types differ.
    pub fn check_against(&self, member: &MethodSig) -> Result<()> {
        let concrete = self.signature();
        if concrete.same_shape(member) {
            return Ok(());
        }
        Err(Error::invalid_argument(format!(
            "binding `{}` for member `{}` has shape {}, expected {}",
            concrete.name(),
            member.name(),
            concrete.shape(),
            member.shape()
        )))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Instance { method, .. } => write!(f, "Binding::Instance({})", method),
            Binding::Free { function, .. } => write!(f, "Binding::Free({})", function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::{Instance, ValueType};

    #[test]
    fn test_free_binding_has_no_target() {
        let b = Binding::free(MethodSig::new("inc", [ValueType::Int], ValueType::Int), |args| {
            Ok(Value::Int(args[0].as_int().unwrap_or(0) + 1))
        });
        assert!(b.target().is_none());
        assert_eq!(b.signature().name(), "inc");
    }

    #[test]
    fn test_instance_binding_keeps_target() {
        let target: ObjectRef = Instance::builder("T").build().unwrap();
        let b = Binding::instance(
            Arc::clone(&target),
            MethodSig::new("Run", [], ValueType::Unit),
        );
        assert!(Arc::ptr_eq(b.target().unwrap(), &target));
    }

    #[test]
    fn test_check_against() {
        let member = MethodSig::new("Inc", [ValueType::Int], ValueType::Int);
        let ok = Binding::free(MethodSig::new("inc", [ValueType::Int], ValueType::Int), |a| {
            Ok(a[0].clone())
        });
        assert!(ok.check_against(&member).is_ok());

        let bad = Binding::free(MethodSig::new("inc", [ValueType::Float], ValueType::Int), |a| {
            Ok(a[0].clone())
        });
        let err = bad.check_against(&member).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("(Float) -> Int"));
    }
}
