//! Error types for weave
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every failure surfaces synchronously at the offending call. The engine never
//! retries or swallows an error, and validation failures never touch caches or
//! the registry.

use thiserror::Error;

/// Result type alias for weave operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for contract composition
#[derive(Debug, Error)]
pub enum Error {
    /// A type, binding or source was not acceptable where it was passed.
    ///
    /// Messages carry the positional label of the offending parameter
    /// (`obj1`, `obj2`, `TOut`, `TId`, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required argument was absent
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// Operation rejected because of the state of its inputs
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A name was registered twice in the same namespace
    #[error("Duplicate registration of '{name}' in namespace '{namespace}'")]
    DuplicateRegistration {
        /// Namespace the name was registered in
        namespace: String,
        /// The name that was already taken
        name: String,
    },

    /// Member lookup failed on an object
    #[error("Member not found: {member}")]
    MemberNotFound {
        /// Requested member name
        member: String,
    },

    /// Call arguments did not match the member signature
    #[error("Signature mismatch for '{member}': expected {expected}, got {actual}")]
    SignatureMismatch {
        /// Member that was called
        member: String,
        /// Declared signature
        expected: String,
        /// What the caller supplied
        actual: String,
    },

    /// Two different contracts declare a member with the same name
    /// and the reject conflict policy is active
    #[error("Member '{member}' is declared by both {first} and {second}")]
    MemberConflict {
        /// Conflicting member name
        member: String,
        /// Contract whose member would have been kept
        first: String,
        /// Contract whose member collided
        second: String,
    },

    /// A user-supplied member body failed
    #[error("Invocation failed: {0}")]
    Invocation(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a missing-argument error
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Error::MissingArgument(message.into())
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Error::InvalidState(message.into())
    }

    /// Create a member-not-found error
    pub fn member_not_found(member: impl Into<String>) -> Self {
        Error::MemberNotFound {
            member: member.into(),
        }
    }

    /// Create an invocation error
    pub fn invocation(message: impl Into<String>) -> Self {
        Error::Invocation(message.into())
    }

    /// True for the invalid-argument family of validation failures
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_argument() {
        let err = Error::invalid_argument("type `First` passed for obj1 must be a contract");
        let msg = err.to_string();
        assert!(msg.contains("Invalid argument"));
        assert!(msg.contains("obj1"));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_error_display_missing_argument() {
        let err = Error::missing_argument("resolver");
        assert!(err.to_string().contains("Missing argument: resolver"));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_error_display_duplicate_registration() {
        let err = Error::DuplicateRegistration {
            namespace: "weave_ns".to_string(),
            name: "IAggregated_impl".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Duplicate registration"));
        assert!(msg.contains("weave_ns"));
        assert!(msg.contains("IAggregated_impl"));
    }

    #[test]
    fn test_error_display_signature_mismatch() {
        let err = Error::SignatureMismatch {
            member: "GetValue".to_string(),
            expected: "(Int) -> Int".to_string(),
            actual: "(String)".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GetValue"));
        assert!(msg.contains("(Int) -> Int"));
        assert!(msg.contains("(String)"));
    }

    #[test]
    fn test_error_display_member_conflict() {
        let err = Error::MemberConflict {
            member: "Id".to_string(),
            first: "IFirst".to_string(),
            second: "ISecond".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Id'"));
        assert!(msg.contains("IFirst"));
        assert!(msg.contains("ISecond"));
    }

    #[test]
    fn test_error_pattern_matching() {
        let err = Error::member_not_found("Prop9");
        match err {
            Error::MemberNotFound { member } => assert_eq!(member, "Prop9"),
            _ => panic!("Wrong error variant"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::invalid_state("identity mismatch between obj1 and obj2"))
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(matches!(returns_error(), Err(Error::InvalidState(_))));
    }
}
