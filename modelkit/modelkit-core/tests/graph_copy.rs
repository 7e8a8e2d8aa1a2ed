mod common;

use common::{field, keyed_schema, person_schema};
use modelkit_core::{
    GraphCopier, ModelError, Node, Record, RecordList, ScalarArray, Sequence, Value,
};

// ── helpers ──────────────────────────────────────────────────────────────────

fn parent_of(schema: &modelkit_core::SchemaRef, r: &Record) -> Record {
    match r.get(field(schema, "parent")) {
        Value::Record(p) => p,
        other => panic!("expected a parent record, got {other:?}"),
    }
}

fn friends_of(schema: &modelkit_core::SchemaRef, r: &Record) -> RecordList {
    match r.get(field(schema, "friends")) {
        Value::List(l) => l,
        other => panic!("expected a friends list, got {other:?}"),
    }
}

// ── records ──────────────────────────────────────────────────────────────────

#[test]
fn two_cycle_is_reproduced_between_copies() {
    let schema = person_schema();
    let a = schema.create_record().expect("record");
    let b = schema.create_record().expect("record");
    a.set(field(&schema, "name"), "a").expect("name");
    b.set(field(&schema, "name"), "b").expect("name");
    a.set(field(&schema, "parent"), b.clone()).expect("parent");
    b.set(field(&schema, "parent"), a.clone()).expect("parent");

    let a2 = GraphCopier::deep_copy(&a).expect("cycle copies");
    let b2 = parent_of(&schema, &a2);

    assert!(!a2.ptr_eq(&a));
    assert!(!b2.ptr_eq(&b));
    assert!(parent_of(&schema, &b2).ptr_eq(&a2));
    assert_eq!(b2.get(field(&schema, "name")).to_string(), "b");
}

#[test]
fn self_reference_points_at_the_copy() {
    let schema = person_schema();
    let a = schema.create_record().expect("record");
    a.set(field(&schema, "parent"), a.clone()).expect("parent");

    let a2 = GraphCopier::deep_copy(&a).expect("self loop copies");
    assert!(parent_of(&schema, &a2).ptr_eq(&a2));
}

#[test]
fn shared_child_stays_shared() {
    let schema = person_schema();
    let shared = schema.create_record().expect("record");
    let (x, y) = (
        schema.create_record().expect("record"),
        schema.create_record().expect("record"),
    );
    x.set(field(&schema, "parent"), shared.clone()).expect("parent");
    y.set(field(&schema, "parent"), shared.clone()).expect("parent");
    let root = schema.create_list_from([x, y]).expect("same schema");

    let copy = GraphCopier::deep_copy(&root).expect("list copies");
    let (x2, y2) = (copy.get(0).expect("x"), copy.get(1).expect("y"));
    let (px, py) = (parent_of(&schema, &x2), parent_of(&schema, &y2));
    assert!(px.ptr_eq(&py));
    assert!(!px.ptr_eq(&shared));
}

#[test]
fn copies_are_independent_of_originals() {
    let schema = person_schema();
    let a = schema.create_record().expect("record");
    let friends = schema.create_list().expect("list");
    friends.push(a.clone()).expect("same schema");
    a.set(field(&schema, "friends"), friends.clone()).expect("friends");
    a.set(field(&schema, "age"), 40).expect("age");

    let a2 = GraphCopier::deep_copy(&a).expect("copies");
    let friends2 = friends_of(&schema, &a2);
    assert!(!friends2.ptr_eq(&friends));
    assert!(friends2.get(0).expect("element").ptr_eq(&a2));

    a.set(field(&schema, "age"), 41).expect("age");
    friends.clear();
    assert!(matches!(a2.get(field(&schema, "age")), Value::I32(40)));
    assert_eq!(friends2.len(), 1);
}

#[test]
fn record_without_references_is_a_plain_copy() {
    let schema = keyed_schema();
    let r = schema.create_record().expect("record");
    r.set_at(0, 5).expect("k");
    let copy = GraphCopier::deep_copy(&r).expect("copies");
    assert!(!copy.ptr_eq(&r));
    assert!(copy.values_equal(&r));
}

// ── other containers ─────────────────────────────────────────────────────────

#[test]
fn sequence_with_holes_and_repeats() {
    let schema = keyed_schema();
    let r = schema.create_record().expect("record");
    let scalars = ScalarArray::new([Value::I32(1), Value::from("two")]).expect("scalars");
    let seq = Sequence::from_nodes([
        Some(Node::from(r.clone())),
        None,
        Some(Node::from(r.clone())),
        Some(Node::from(scalars.clone())),
    ]);
    seq.push(Some(Node::from(seq.clone())));

    let copy = GraphCopier::deep_copy(&seq).expect("sequence copies");
    assert_eq!(copy.len(), 5);
    assert!(copy.get(1).is_none());

    let (first, third) = (copy.get(0).expect("first"), copy.get(2).expect("third"));
    assert!(first.ptr_eq(&third));
    assert!(!first.ptr_eq(&Node::from(r)));

    let Some(Node::Scalars(array)) = copy.get(3) else {
        panic!("fourth slot should hold scalars");
    };
    assert!(!array.ptr_eq(&scalars));
    assert_eq!(array.values().len(), 2);

    let Some(Node::Sequence(inner)) = copy.get(4) else {
        panic!("fifth slot should hold the sequence");
    };
    assert!(inner.ptr_eq(&copy));
}

#[test]
fn scalar_array_copy_is_element_wise() {
    let array = ScalarArray::new([Value::I32(1), Value::Null]).expect("scalars");
    let copy = GraphCopier::deep_copy(&array).expect("copies");
    copy.set(0, Value::I32(9)).expect("scalar fits");
    assert!(matches!(array.get(0), Some(Value::I32(1))));
}

#[test]
fn scalar_array_rejects_records() {
    let schema = keyed_schema();
    let record = schema.create_record().expect("record");
    let err = ScalarArray::new([Value::Record(record)]).expect_err("record");
    assert!(matches!(err, ModelError::TypeMismatch { .. }));
}
