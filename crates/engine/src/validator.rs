//! Contract validation
//!
//! Pure checks run before anything is generated or cached:
//! - a type passed where a contract is required must be an interface
//! - the combined contract's minimal ancestors must be exactly the components
//!
//! Messages name the offending parameter by its positional label (`obj1`,
//! `obj2`, `TOut`, `TId`) so callers can tell which argument was wrong.

use weave_core::{ContractRef, Error, Result};

/// True iff `ty` is an interface-like contract
pub fn is_contract(ty: &ContractRef) -> bool {
    ty.is_interface()
}

/// Ancestors of `contract` that are not ancestors of another ancestor
///
/// These are its direct, non-redundant parents. Order follows
/// `Contract::ancestors`.
pub fn minimal_ancestors(contract: &ContractRef) -> Vec<ContractRef> {
    let ancestors = contract.ancestors();
    ancestors
        .iter()
        .filter(|candidate| {
            !ancestors
                .iter()
                .any(|other| other.id() != candidate.id() && other.is_or_extends(candidate.id()))
        })
        .cloned()
        .collect()
}

/// Check that `components` are exactly the minimal ancestors of `combined`
///
/// # Errors
///
/// Returns `InvalidArgument` naming `objN` for a non-contract component,
/// `TOut` for a non-contract combined type, and `T1 and T2 ... TOut` when the
/// ancestor sets differ.
pub fn validate_aggregation(components: &[ContractRef], combined: &ContractRef) -> Result<()> {
    for (i, component) in components.iter().enumerate() {
        if !is_contract(component) {
            return Err(Error::invalid_argument(format!(
                "type `{}` (T{n}) of argument obj{n} must be an interface",
                component.name(),
                n = i + 1
            )));
        }
    }

    if !is_contract(combined) {
        return Err(Error::invalid_argument(format!(
            "type `{}` (TOut) of the return value must be an interface",
            combined.name()
        )));
    }

    let minimal = minimal_ancestors(combined);
    let exact = minimal.len() == components.len()
        && components
            .iter()
            .all(|c| minimal.iter().any(|m| m.id() == c.id()));
    if !exact {
        let labels: Vec<String> = (1..=components.len()).map(|i| format!("T{}", i)).collect();
        return Err(Error::invalid_argument(format!(
            "{} must be the only direct ancestors of TOut (`{}`)",
            labels.join(" and "),
            combined.name()
        )));
    }
    Ok(())
}

/// Check the identity descriptor of a join
///
/// # Errors
///
/// Returns `InvalidArgument` naming `TId` if it is not a contract.
pub fn validate_identity(t_id: &ContractRef) -> Result<()> {
    if is_contract(t_id) {
        return Ok(());
    }
    Err(Error::invalid_argument(format!(
        "type `{}` (TId) of the identity descriptor must be an interface",
        t_id.name()
    )))
}
