//! Structural cache keys
//!
//! A key is the combined contract plus the ordered component contracts.
//! Equality and hashing follow component order: swapping components changes
//! which member wins a name conflict, so it must also change the key.

use smallvec::SmallVec;
use std::fmt;
use weave_core::{ContractId, ContractRef};

/// Cache key for a generated implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralKey {
    combined: ContractId,
    components: SmallVec<[ContractId; 4]>,
}

impl StructuralKey {
    /// Key from raw ids
    pub fn new(combined: ContractId, components: impl IntoIterator<Item = ContractId>) -> Self {
        Self {
            combined,
            components: components.into_iter().collect(),
        }
    }

    /// Key for `combined` built from `components` in order
    pub fn of(combined: &ContractRef, components: &[ContractRef]) -> Self {
        Self::new(combined.id(), components.iter().map(|c| c.id()))
    }

    /// The combined contract
    pub fn combined(&self) -> ContractId {
        self.combined
    }

    /// Component contracts in order
    pub fn components(&self) -> &[ContractId] {
        &self.components
    }
}

impl fmt::Display for StructuralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.combined)?;
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", c)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use weave_core::Contract;

    fn hash_of(key: &StructuralKey) -> u64 {
        let mut h = DefaultHasher::new();
        key.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_equal_keys_hash_equal() {
        let out = Contract::interface("IOut").build();
        let a = Contract::interface("IA").build();
        let b = Contract::interface("IB").build();
        let k1 = StructuralKey::of(&out, &[a.clone(), b.clone()]);
        let k2 = StructuralKey::of(&out, &[a, b]);
        assert_eq!(k1, k2);
        assert_eq!(hash_of(&k1), hash_of(&k2));
    }

    #[test]
    fn test_order_matters() {
        let out = Contract::interface("IOut").build();
        let a = Contract::interface("IA").build();
        let b = Contract::interface("IB").build();
        let k1 = StructuralKey::of(&out, &[a.clone(), b.clone()]);
        let k2 = StructuralKey::of(&out, &[b, a]);
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_combined_matters() {
        let a = Contract::interface("IA").build();
        let out1 = Contract::interface("IOut").build();
        let out2 = Contract::interface("IOut").build();
        assert_ne!(
            StructuralKey::of(&out1, &[a.clone()]),
            StructuralKey::of(&out2, &[a])
        );
    }

    #[test]
    fn test_length_matters() {
        let out = Contract::interface("IOut").build();
        let a = Contract::interface("IA").build();
        assert_ne!(
            StructuralKey::of(&out, &[a.clone()]),
            StructuralKey::of(&out, &[a.clone(), a])
        );
    }

    #[test]
    fn test_display() {
        let key = StructuralKey::new(
            Contract::interface("IOut").build().id(),
            std::iter::empty(),
        );
        assert!(key.to_string().ends_with("[]"));
        assert!(key.components().is_empty());
    }
}
