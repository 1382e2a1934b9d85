//! Member signatures
//!
//! A contract is an ordered list of members. Methods carry their parameter
//! types and return type. Properties carry a value type and the presence of a
//! getter and a setter; each present accessor is also visible as an ordinary
//! method named `get_<name>` / `set_<name>`, which is how generated
//! implementations forward property access.

use std::fmt;

use crate::error::{Error, Result};
use crate::value::{Value, ValueType};

/// Prefix of generated getter accessors
pub const GETTER_PREFIX: &str = "get_";
/// Prefix of generated setter accessors
pub const SETTER_PREFIX: &str = "set_";

/// Accessor method name for reading `property`
pub fn getter_name(property: &str) -> String {
    format!("{}{}", GETTER_PREFIX, property)
}

/// Accessor method name for writing `property`
pub fn setter_name(property: &str) -> String {
    format!("{}{}", SETTER_PREFIX, property)
}

/// Method signature: name, ordered parameter types, return type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
    name: String,
    params: Vec<ValueType>,
    returns: ValueType,
}

impl MethodSig {
    /// Create a method signature
    pub fn new(
        name: impl Into<String>,
        params: impl IntoIterator<Item = ValueType>,
        returns: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
            returns,
        }
    }

    /// Member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types in declaration order
    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    /// Return type (`Unit` for void members)
    pub fn returns(&self) -> ValueType {
        self.returns
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Same parameter types and return type, ignoring the name
    pub fn same_shape(&self, other: &MethodSig) -> bool {
        self.params == other.params && self.returns == other.returns
    }

    /// Render as `(Int, String) -> Int`
    pub fn shape(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(ValueType::name).collect();
        format!("({}) -> {}", params.join(", "), self.returns)
    }

    /// Check call arguments against the parameter list
    ///
    /// # Errors
    ///
    /// Returns `SignatureMismatch` on an arity or type mismatch.
    pub fn check_args(&self, args: &[Value]) -> Result<()> {
        let matches = args.len() == self.params.len()
            && self.params.iter().zip(args).all(|(ty, v)| ty.accepts(v));
        if matches {
            return Ok(());
        }
        let actual: Vec<&str> = args.iter().map(Value::type_name).collect();
        Err(Error::SignatureMismatch {
            member: self.name.clone(),
            expected: self.shape(),
            actual: format!("({})", actual.join(", ")),
        })
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.shape())
    }
}

/// Which accessors a property exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Getter only
    Get,
    /// Setter only
    Set,
    /// Getter and setter
    GetSet,
}

/// Property signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertySig {
    name: String,
    ty: ValueType,
    getter: bool,
    setter: bool,
}

impl PropertySig {
    /// Create a property signature
    pub fn new(name: impl Into<String>, ty: ValueType, access: Access) -> Self {
        let (getter, setter) = match access {
            Access::Get => (true, false),
            Access::Set => (false, true),
            Access::GetSet => (true, true),
        };
        Self {
            name: name.into(),
            ty,
            getter,
            setter,
        }
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    /// Whether the property can be read
    pub fn has_getter(&self) -> bool {
        self.getter
    }

    /// Whether the property can be written
    pub fn has_setter(&self) -> bool {
        self.setter
    }

    /// `get_<name>() -> ty`, if readable
    pub fn getter_sig(&self) -> Option<MethodSig> {
        self.getter
            .then(|| MethodSig::new(getter_name(&self.name), [], self.ty))
    }

    /// `set_<name>(ty) -> Unit`, if writable
    pub fn setter_sig(&self) -> Option<MethodSig> {
        self.setter
            .then(|| MethodSig::new(setter_name(&self.name), [self.ty], ValueType::Unit))
    }
}

/// A contract member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    /// A method
    Method(MethodSig),
    /// A property
    Property(PropertySig),
}

impl Member {
    /// Member name
    pub fn name(&self) -> &str {
        match self {
            Member::Method(m) => m.name(),
            Member::Property(p) => p.name(),
        }
    }

    /// The callable methods this member contributes
    ///
    /// A method contributes itself; a property contributes its getter then
    /// its setter.
    pub fn methods(&self) -> Vec<MethodSig> {
        match self {
            Member::Method(m) => vec![m.clone()],
            Member::Property(p) => p.getter_sig().into_iter().chain(p.setter_sig()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_names() {
        assert_eq!(getter_name("Prop1"), "get_Prop1");
        assert_eq!(setter_name("Prop1"), "set_Prop1");
    }

    #[test]
    fn test_method_shape_and_display() {
        let sig = MethodSig::new("GetValue", [ValueType::Int, ValueType::String], ValueType::Int);
        assert_eq!(sig.arity(), 2);
        assert_eq!(sig.shape(), "(Int, String) -> Int");
        assert_eq!(sig.to_string(), "GetValue(Int, String) -> Int");
    }

    #[test]
    fn test_same_shape_ignores_name() {
        let a = MethodSig::new("Inc", [ValueType::Int], ValueType::Int);
        let b = MethodSig::new("inc", [ValueType::Int], ValueType::Int);
        let c = MethodSig::new("inc", [ValueType::Int], ValueType::Unit);
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn test_check_args() {
        let sig = MethodSig::new("M", [ValueType::Int, ValueType::Any], ValueType::Unit);
        assert!(sig.check_args(&[Value::Int(1), Value::from("x")]).is_ok());

        let err = sig.check_args(&[Value::from("1"), Value::Null]).unwrap_err();
        assert!(matches!(err, Error::SignatureMismatch { .. }));

        let err = sig.check_args(&[Value::Int(1)]).unwrap_err();
        assert!(err.to_string().contains("(Int)"));
    }

    #[test]
    fn test_property_accessors() {
        let get_only = PropertySig::new("Prop", ValueType::Int, Access::Get);
        assert_eq!(get_only.getter_sig().unwrap().name(), "get_Prop");
        assert!(get_only.setter_sig().is_none());

        let set_only = PropertySig::new("Prop", ValueType::Int, Access::Set);
        let setter = set_only.setter_sig().unwrap();
        assert_eq!(setter.params(), &[ValueType::Int]);
        assert_eq!(setter.returns(), ValueType::Unit);
        assert!(set_only.getter_sig().is_none());
    }

    #[test]
    fn test_member_methods_expand_properties() {
        let member = Member::Property(PropertySig::new("Id", ValueType::String, Access::GetSet));
        let names: Vec<String> = member.methods().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["get_Id", "set_Id"]);
        assert_eq!(member.name(), "Id");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn int_params_accept_any_int_args(args in prop::collection::vec(any::<i64>(), 0..6)) {
                let sig = MethodSig::new("M", vec![ValueType::Int; args.len()], ValueType::Unit);
                let values: Vec<Value> = args.iter().copied().map(Value::Int).collect();
                prop_assert!(sig.check_args(&values).is_ok());

                // One argument too many never passes
                let mut longer = values.clone();
                longer.push(Value::Int(0));
                prop_assert!(sig.check_args(&longer).is_err());
            }

            #[test]
            fn any_params_accept_strings(s in ".{0,32}") {
                let sig = MethodSig::new("M", [ValueType::Any], ValueType::Any);
                prop_assert!(sig.check_args(&[Value::String(s.clone())]).is_ok());
                let strict = MethodSig::new("M", [ValueType::Int], ValueType::Any);
                prop_assert!(strict.check_args(&[Value::String(s)]).is_err());
            }
        }
    }
}
