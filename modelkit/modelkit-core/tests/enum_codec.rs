mod common;

use std::cmp::Ordering;

use common::{Color, Status};
use modelkit_core::{
    BooleanEnum, EnumCase, EnumCodec, EnumCodecMode, EnumType, EnumValue, FieldType, ModelEnum,
    ModelError, ScalarType, SpecialRule, SpecialValue, Value,
};

// ── ordinal mode ─────────────────────────────────────────────────────────────

#[test]
fn ordinal_mode_round_trips_every_case() {
    let ty = Color::enum_type();
    let codec = EnumCodec::build(&ty, SpecialRule::Wire).expect("ordinal enum builds");
    assert_eq!(codec.mode(), EnumCodecMode::Ordinal);
    assert_eq!(codec.target(), ScalarType::I32);

    for &case in Color::cases() {
        let v = EnumValue::of(case);
        let external = codec.to_external(&v).expect("every case maps");
        assert!(matches!(external, Value::I32(o) if o as usize == case.ordinal()));
        assert_eq!(codec.to_case(&external), Some(v));
    }
}

#[test]
fn unknown_external_value_has_no_case() {
    let codec = EnumCodec::build(&Color::enum_type(), SpecialRule::Wire).expect("builds");
    assert_eq!(codec.to_case(&Value::I32(3)), None);
    assert_eq!(codec.to_case(&Value::from("RED")), None);
}

// ── special mode ─────────────────────────────────────────────────────────────

#[test]
fn wire_and_persistent_rules_diverge() {
    let ty = Status::enum_type();
    let wire = EnumCodec::build(&ty, SpecialRule::Wire).expect("wire builds");
    let persistent = EnumCodec::build(&ty, SpecialRule::Persistent).expect("persistent builds");
    let suspended = EnumValue::of(Status::Suspended);

    assert_eq!(wire.mode(), EnumCodecMode::Special);
    assert!(matches!(wire.to_external(&suspended), Some(Value::I32(20))));
    assert_eq!(persistent.target(), ScalarType::String);
    assert!(matches!(
        persistent.to_external(&suspended),
        Some(Value::String(s)) if &*s == "S"
    ));
    assert_eq!(persistent.to_case(&Value::from("C")), Some(EnumValue::of(Status::Closed)));
    assert_eq!(wire.to_case(&Value::I32(10)), Some(EnumValue::of(Status::Active)));
    assert_eq!(wire.to_case(&Value::I32(0)), None);
}

#[test]
fn mixed_special_and_ordinal_cases_are_rejected() {
    let ty = EnumType::new(
        "Mixed",
        vec![EnumCase::new("A").with_wire(5), EnumCase::new("B")],
    );
    let err = EnumCodec::build(&ty, SpecialRule::Wire).expect_err("mixed modes");
    assert!(matches!(err, ModelError::SchemaDefinition { ref schema, .. } if schema == "Mixed"));

    // the persistent rule only looks at persistent overrides
    assert!(EnumCodec::build(&ty, SpecialRule::Persistent).is_ok());
    assert!(FieldType::enumeration(&ty).is_err());
}

#[test]
fn differing_targets_are_rejected() {
    let ty = EnumType::new(
        "Targets",
        vec![
            EnumCase::new("A").with_persistent(SpecialValue::new(ScalarType::String, "a")),
            EnumCase::new("B").with_persistent(SpecialValue::new(ScalarType::I32, 2)),
        ],
    );
    assert!(matches!(
        EnumCodec::build(&ty, SpecialRule::Persistent),
        Err(ModelError::SchemaDefinition { .. })
    ));
}

#[test]
fn special_value_must_match_its_target() {
    let ty = EnumType::new(
        "Shape",
        vec![EnumCase::new("A").with_persistent(SpecialValue::new(ScalarType::I32, "one"))],
    );
    assert!(matches!(
        EnumCodec::build(&ty, SpecialRule::Persistent),
        Err(ModelError::SchemaDefinition { .. })
    ));
}

#[test]
fn duplicate_external_values_are_rejected() {
    let ty = EnumType::new(
        "Dup",
        vec![EnumCase::new("A").with_wire(1), EnumCase::new("B").with_wire(1)],
    );
    let err = EnumCodec::build(&ty, SpecialRule::Wire).expect_err("duplicate code");
    assert!(err.to_string().contains("duplicate"), "{err}");
}

#[test]
fn null_special_value_is_left_unmapped() {
    let ty = EnumType::new(
        "Optional",
        vec![
            EnumCase::new("NONE").with_persistent(SpecialValue::new(ScalarType::String, Value::Null)),
            EnumCase::new("SOME").with_persistent(SpecialValue::new(ScalarType::String, "s")),
        ],
    );
    let codec = EnumCodec::build(&ty, SpecialRule::Persistent).expect("builds");
    let none = ty.value_by_name("NONE").expect("case exists");
    assert_eq!(codec.to_external(&none), None);
    assert_eq!(codec.to_case(&Value::Null), None);
    assert_eq!(codec.to_case(&Value::from("s")), ty.value_by_name("SOME"));
}

#[test]
fn empty_enumeration_defaults_to_ordinal() {
    let codec = EnumCodec::build(&EnumType::new("Empty", vec![]), SpecialRule::Wire)
        .expect("empty enum builds");
    assert_eq!(codec.mode(), EnumCodecMode::Ordinal);
}

#[test]
fn values_of_another_enumeration_do_not_map() {
    let codec = EnumCodec::build(&Color::enum_type(), SpecialRule::Wire).expect("builds");
    assert_eq!(codec.to_external(&EnumValue::of(Status::Active)), None);
}

// ── runtime values ───────────────────────────────────────────────────────────

#[test]
fn enum_value_converts_back_to_rust_enum() {
    let v = EnumValue::of(Color::Blue);
    assert_eq!(v.name(), "BLUE");
    assert_eq!(v.ordinal(), 2);
    assert_eq!(v.to::<Color>(), Some(Color::Blue));
    assert_eq!(v.to::<Status>(), None);
}

#[test]
fn descriptor_is_built_once_per_enum() {
    let first = Color::enum_type();
    assert!(first.ptr_eq(&Color::enum_type()));
    assert!(first.ptr_eq(EnumValue::of(Color::Green).enum_type()));
    assert!(!first.ptr_eq(&Status::enum_type()));
}

#[test]
fn same_name_with_other_cases_is_another_enumeration() {
    let field = FieldType::enum_of::<Color>().expect("Color is consistent");

    let twin = EnumType::new(
        "Color",
        vec![EnumCase::new("RED"), EnumCase::new("GREEN"), EnumCase::new("BLUE")],
    );
    let red = twin.value(0).expect("RED");
    field
        .check(&Value::Enum(red.clone()))
        .expect("identical cases fit");
    assert_eq!(red, EnumValue::of(Color::Red));

    let other = EnumType::new("Color", vec![EnumCase::new("RED"), EnumCase::new("PURPLE")]);
    let purple = other.value(1).expect("PURPLE");
    assert!(matches!(
        field.check(&Value::Enum(purple.clone())),
        Err(ModelError::TypeMismatch { .. })
    ));
    assert_ne!(purple, EnumValue::of(Color::Green));
    assert_ne!(other, Color::enum_type());
}

// ── ordering ─────────────────────────────────────────────────────────────────

#[test]
fn enum_fields_order_by_ordinal_not_by_external_codes() {
    // both external mappings run opposite to declaration order
    let ty = EnumType::new(
        "Priority",
        vec![
            EnumCase::new("LOW")
                .with_wire(30)
                .with_persistent(SpecialValue::new(ScalarType::String, "z")),
            EnumCase::new("MID")
                .with_wire(20)
                .with_persistent(SpecialValue::new(ScalarType::String, "y")),
            EnumCase::new("HIGH")
                .with_wire(10)
                .with_persistent(SpecialValue::new(ScalarType::String, "x")),
        ],
    );
    let field = FieldType::enumeration(&ty).expect("Priority is consistent");
    let FieldType::Enum(mappings) = &field else {
        panic!("enumeration builds an enum field type");
    };
    let low = ty.value(0).expect("LOW");
    let high = ty.value(2).expect("HIGH");
    assert!(matches!(mappings.wire().to_external(&low), Some(Value::I32(30))));
    assert!(matches!(mappings.wire().to_external(&high), Some(Value::I32(10))));

    let (low, high) = (Value::Enum(low), Value::Enum(high));
    assert_eq!(field.compare(&low, &high), Ordering::Less);
    assert_eq!(field.compare(&high, &low), Ordering::Greater);
    assert_eq!(field.compare(&low, &low), Ordering::Equal);
    assert_eq!(field.compare_for_display(&low, &high), Ordering::Less);
}

#[test]
fn null_enum_sorts_before_every_case() {
    let field = FieldType::enum_of::<Status>().expect("Status is consistent");
    let first = Value::Enum(EnumValue::of(Status::Active));
    assert_eq!(field.compare(&Value::Null, &first), Ordering::Less);
    assert_eq!(field.compare(&first, &Value::Null), Ordering::Greater);
    assert_eq!(field.compare(&Value::Null, &Value::Null), Ordering::Equal);
    assert_eq!(field.compare_for_display(&Value::Null, &first), Ordering::Less);
}

#[test]
fn boolean_enum_helpers() {
    assert_eq!(BooleanEnum::from_option(None), BooleanEnum::False);
    assert_eq!(BooleanEnum::from_option(Some(true)), BooleanEnum::True);
    assert!(BooleanEnum::True.get());
    assert_eq!(BooleanEnum::True.to_int(), 1);
    assert_eq!(EnumValue::of(BooleanEnum::True).name(), "TRUE");
    assert_eq!(BooleanEnum::enum_type().len(), 2);
}
