//! End-to-end composition scenarios through the `weave` facade
//!
//! Each scenario wires contracts, sources and the two construction strategies
//! together the way an application would.

use std::sync::Arc;

use parking_lot::Mutex;
use weave::{
    Access, AutoImplementer, Binding, ConflictPolicy, Contract, ContractRef, EngineConfig, Error,
    Instance, MethodSig, Object, ObjectMerger, ObjectRef, Registry, Value, ValueType,
};

// ============================================================================
// AutoImplementer
// ============================================================================

fn incrementer() -> ContractRef {
    Contract::interface("I1")
        .method("Inc", [ValueType::Int], ValueType::Int)
        .build()
}

#[test]
fn scenario_inc_bound_to_free_function() {
    let auto = AutoImplementer::with_registry(Arc::new(Registry::new()));
    let implemented = auto
        .implement_with(&incrementer(), |_| {
            Ok(Binding::free(
                MethodSig::new("inc", [ValueType::Int], ValueType::Int),
                |args| Ok(Value::Int(args[0].as_int().unwrap_or(0) + 1)),
            ))
        })
        .unwrap();
    assert_eq!(implemented.call("Inc", &[Value::Int(5)]).unwrap(), Value::Int(6));
}

#[test]
fn scenario_inc_bound_to_stateful_target() {
    let increment = 2;
    let target: ObjectRef = Instance::builder("Incrementor")
        .method("Increment", move |args| {
            Ok(Value::Int(args[0].as_int().unwrap_or(0) + increment))
        })
        .build()
        .unwrap();

    let auto = AutoImplementer::with_registry(Arc::new(Registry::new()));
    let implemented = auto
        .implement_with(&incrementer(), |_| {
            Ok(Binding::instance(
                Arc::clone(&target),
                MethodSig::new("Increment", [ValueType::Int], ValueType::Int),
            ))
        })
        .unwrap();
    assert_eq!(implemented.call("Inc", &[Value::Int(5)]).unwrap(), Value::Int(7));
}

#[test]
fn scenario_auto_implemented_object_feeds_a_merge() {
    let registry = Arc::new(Registry::new());
    let log = Contract::interface("ILog")
        .method("Write", [ValueType::String], ValueType::Unit)
        .build();
    let inc = incrementer();
    let both = Contract::interface("ILoggingIncrementer")
        .extends(&inc)
        .extends(&log)
        .build();

    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let logger = AutoImplementer::with_registry(Arc::clone(&registry))
        .implement_with(&log, move |member| {
            let sink = Arc::clone(&sink);
            Ok(Binding::free(member.clone(), move |args| {
                sink.lock().push(args[0].as_str().unwrap_or_default().to_string());
                Ok(Value::Null)
            }))
        })
        .unwrap()
        .into_object();
    let counter = AutoImplementer::with_registry(Arc::clone(&registry))
        .implement_with(&inc, |member| {
            Ok(Binding::free(member.clone(), |args| {
                Ok(Value::Int(args[0].as_int().unwrap_or(0) + 1))
            }))
        })
        .unwrap()
        .into_object();

    let merged = ObjectMerger::with_registry(Arc::clone(&registry))
        .merge(&inc, counter, &log, logger, &both)
        .unwrap();
    assert_eq!(merged.call("Inc", &[Value::Int(41)]).unwrap(), Value::Int(42));
    merged.call("Write", &[Value::from("hello")]).unwrap();
    assert_eq!(*lines.lock(), vec!["hello".to_string()]);
    // Two auto implementations plus one merge
    assert_eq!(registry.defined_count(), 3);
}

// ============================================================================
// Merge and join
// ============================================================================

#[test]
fn scenario_first_and_second_aggregated() {
    let first = Contract::interface("IFirst")
        .property("Prop1", ValueType::Int, Access::Get)
        .build();
    let second = Contract::interface("ISecond")
        .property("Prop2", ValueType::Int, Access::Get)
        .method("GetValue", [ValueType::Int], ValueType::Int)
        .build();
    let aggregated = Contract::interface("IAggregated")
        .extends(&first)
        .extends(&second)
        .build();

    let obj1: ObjectRef = Instance::builder("First")
        .implements(&first)
        .property("Prop1", 12)
        .build()
        .unwrap();
    let obj2: ObjectRef = Instance::builder("Second")
        .implements(&second)
        .property("Prop2", 23)
        .method("GetValue", |args| Ok(args[0].clone()))
        .build()
        .unwrap();

    let merged = ObjectMerger::with_registry(Arc::new(Registry::new()))
        .merge(&first, obj1, &second, obj2, &aggregated)
        .unwrap();
    assert_eq!(merged.get("Prop1").unwrap(), Value::Int(12));
    assert_eq!(merged.get("Prop2").unwrap(), Value::Int(23));
    assert_eq!(merged.call("GetValue", &[Value::Int(34)]).unwrap(), Value::Int(34));
}

#[test]
fn scenario_synthesized_pair_contract() {
    let registry = Arc::new(Registry::new());
    let left = Contract::interface("ILeft")
        .method("Left", [], ValueType::String)
        .build();
    let right = Contract::interface("IRight")
        .method("Right", [], ValueType::String)
        .build();
    let pair = registry.inherit_both(&left, &right).unwrap();

    let l: ObjectRef = Instance::builder("L")
        .implements(&left)
        .method("Left", |_| Ok(Value::from("l")))
        .build()
        .unwrap();
    let r: ObjectRef = Instance::builder("R")
        .implements(&right)
        .method("Right", |_| Ok(Value::from("r")))
        .build()
        .unwrap();

    let merged = ObjectMerger::with_registry(Arc::clone(&registry))
        .merge(&left, l, &right, r, &pair)
        .unwrap();
    assert_eq!(merged.call("Left", &[]).unwrap(), Value::from("l"));
    assert_eq!(merged.call("Right", &[]).unwrap(), Value::from("r"));
    assert!(merged.implements(pair.id()));
}

#[test]
fn scenario_join_order_records() {
    let keyed = Contract::interface("IOrderKey")
        .property("OrderId", ValueType::Int, Access::Get)
        .build();
    let billing = Contract::interface("IBilling")
        .extends(&keyed)
        .property("Total", ValueType::Float, Access::Get)
        .build();
    let shipping = Contract::interface("IShipping")
        .extends(&keyed)
        .property("Address", ValueType::String, Access::GetSet)
        .build();
    let order = Contract::interface("IOrder")
        .extends(&billing)
        .extends(&shipping)
        .build();

    let bill = |id: i64| -> ObjectRef {
        let obj: ObjectRef = Instance::builder("Bill")
            .implements(&billing)
            .property("OrderId", id)
            .property("Total", 99.5)
            .build()
            .unwrap();
        obj
    };
    let ship = Instance::builder("Shipment")
        .implements(&shipping)
        .property("OrderId", 17)
        .property("Address", "1 Main St")
        .build()
        .unwrap();

    let merger = ObjectMerger::with_registry(Arc::new(Registry::new()));
    let joined = merger
        .join_by_id(&keyed, &billing, bill(17), &shipping, ship.clone(), &order)
        .unwrap();
    assert_eq!(joined.get("OrderId").unwrap(), Value::Int(17));
    assert_eq!(joined.get("Total").unwrap(), Value::Float(99.5));
    joined.set("Address", Value::from("2 Side St")).unwrap();
    assert_eq!(ship.peek("Address"), Some(Value::from("2 Side St")));

    let err = merger
        .join_by_id(&keyed, &billing, bill(18), &shipping, ship, &order)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn scenario_reject_policy_from_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
namespace_prefix = "orders"
conflict_policy = "reject"
"#,
    )
    .unwrap();
    assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
    let registry = Arc::new(Registry::with_config(config));
    assert!(registry.namespace().starts_with("orders_"));

    let a = Contract::interface("IA").method("Name", [], ValueType::String).build();
    let b = Contract::interface("IB").method("Name", [], ValueType::String).build();
    let ab = Contract::interface("IAB").extends(&a).extends(&b).build();
    let source = |contract: &ContractRef| {
        let obj: ObjectRef = Instance::builder("Named")
            .implements(contract)
            .method("Name", |_| Ok(Value::from("n")))
            .build()
            .unwrap();
        obj
    };

    let err = ObjectMerger::with_registry(registry)
        .merge(&a, source(&a), &b, source(&b), &ab)
        .unwrap_err();
    assert!(matches!(err, Error::MemberConflict { .. }));
}
