//! Contract descriptors
//!
//! A `Contract` describes a type by its ordered members and its direct parents.
//! Interfaces are contracts; concrete types are described with the same
//! structure so that callers passing a class where a contract is expected can
//! be told exactly which argument was wrong.
//!
//! Identity is nominal. Every built descriptor receives a fresh `ContractId`,
//! so two descriptors with identical members are still different contracts.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::member::{Access, Member, MethodSig, PropertySig};
use crate::value::ValueType;

static NEXT_CONTRACT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a contract descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId(u64);

impl ContractId {
    fn next() -> Self {
        ContractId(NEXT_CONTRACT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// Interface-like abstract contract
    Interface,
    /// Concrete type; never valid where a contract is required
    Concrete,
}

/// Shared handle to a descriptor
pub type ContractRef = Arc<Contract>;

/// Type descriptor: ordered members plus direct parents
#[derive(Debug)]
pub struct Contract {
    id: ContractId,
    name: String,
    kind: ContractKind,
    members: Vec<Member>,
    parents: Vec<ContractRef>,
}

impl Contract {
    /// Start describing an interface contract
    pub fn interface(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name, ContractKind::Interface)
    }

    /// Start describing a concrete type
    pub fn concrete(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name, ContractKind::Concrete)
    }

    /// Identity
    pub fn id(&self) -> ContractId {
        self.id
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind
    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    /// True for interface contracts
    pub fn is_interface(&self) -> bool {
        self.kind == ContractKind::Interface
    }

    /// Members declared directly on this contract, in order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Direct parents, in declaration order
    pub fn parents(&self) -> &[ContractRef] {
        &self.parents
    }

    /// Every transitive ancestor, each once
    ///
    /// Breadth-first: direct parents come before grandparents.
    pub fn ancestors(&self) -> Vec<ContractRef> {
        let mut seen = FxHashSet::default();
        let mut out: Vec<ContractRef> = Vec::new();
        let mut frontier: Vec<ContractRef> = self.parents.clone();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for parent in frontier {
                if seen.insert(parent.id) {
                    next.extend(parent.parents.iter().cloned());
                    out.push(parent);
                }
            }
            frontier = next;
        }
        out
    }

    /// True if `other` is this contract or one of its ancestors
    pub fn is_or_extends(&self, other: ContractId) -> bool {
        self.id == other || self.ancestors().iter().any(|a| a.id == other)
    }

    /// Callable methods declared directly here, properties expanded to accessors
    pub fn declared_methods(&self) -> Vec<MethodSig> {
        self.members.iter().flat_map(Member::methods).collect()
    }

    /// Properties declared directly here
    pub fn declared_properties(&self) -> impl Iterator<Item = &PropertySig> {
        self.members.iter().filter_map(|m| match m {
            Member::Property(p) => Some(p),
            Member::Method(_) => None,
        })
    }

    /// Look up a callable method by name on this contract or its ancestors
    pub fn find_method(&self, name: &str) -> Option<MethodSig> {
        let own = self.declared_methods().into_iter().find(|m| m.name() == name);
        own.or_else(|| {
            self.ancestors()
                .iter()
                .find_map(|a| a.declared_methods().into_iter().find(|m| m.name() == name))
        })
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for `Contract`
#[derive(Debug)]
pub struct ContractBuilder {
    name: String,
    kind: ContractKind,
    members: Vec<Member>,
    parents: Vec<ContractRef>,
}

impl ContractBuilder {
    fn new(name: impl Into<String>, kind: ContractKind) -> Self {
        Self {
            name: name.into(),
            kind,
            members: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Declare a method
    pub fn method(
        mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = ValueType>,
        returns: ValueType,
    ) -> Self {
        self.members
            .push(Member::Method(MethodSig::new(name, params, returns)));
        self
    }

    /// Declare a property
    pub fn property(mut self, name: impl Into<String>, ty: ValueType, access: Access) -> Self {
        self.members
            .push(Member::Property(PropertySig::new(name, ty, access)));
        self
    }

    /// Add a direct parent
    pub fn extends(mut self, parent: &ContractRef) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Finish the descriptor, assigning a fresh identity
    pub fn build(self) -> ContractRef {
        Arc::new(Contract {
            id: ContractId::next(),
            name: self.name,
            kind: self.kind,
            members: self.members,
            parents: self.parents,
        })
    }
}
