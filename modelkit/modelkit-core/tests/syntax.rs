use modelkit_core::{FieldSpec, ScalarType, SchemaDefinition, Syntax, SyntaxSet};

#[test]
fn bits_follow_declaration_order() {
    assert_eq!(Syntax::Json.bit(), 1);
    assert_eq!(Syntax::Html.bit(), 2);
    assert_eq!(Syntax::Wire.bit(), 4);
    assert_eq!(SyntaxSet::encode(&[Syntax::Json, Syntax::Wire]), 5);
    assert_eq!(SyntaxSet::ALL.bits(), 7);
    assert_eq!(SyntaxSet::NONE.bits(), 0);
}

#[test]
fn decode_inverts_encode_and_ignores_unknown_bits() {
    assert_eq!(SyntaxSet::decode(5), [Syntax::Json, Syntax::Wire]);
    assert!(SyntaxSet::decode(0xf8).is_empty());
    assert_eq!(SyntaxSet::from_bits(0xff), SyntaxSet::ALL);
    for bits in 0..8 {
        assert_eq!(SyntaxSet::encode(&SyntaxSet::decode(bits)), bits);
    }
}

#[test]
fn set_operations() {
    let set = SyntaxSet::NONE.with(Syntax::Html).with(Syntax::Wire);
    assert!(set.contains(Syntax::Html));
    assert!(!set.contains(Syntax::Json));
    assert_eq!(set.without(Syntax::Html), SyntaxSet::of(&[Syntax::Wire]));
    assert_eq!(set.iter().collect::<Vec<_>>(), [Syntax::Html, Syntax::Wire]);
    assert_eq!(Syntax::ALL.into_iter().collect::<SyntaxSet>(), SyntaxSet::ALL);
    assert_eq!(format!("{set:?}"), "{Html, Wire}");
    assert_eq!(Syntax::Wire.to_string(), "wire");
}

#[test]
fn field_visibility_comes_from_its_syntax_set() {
    let schema = SchemaDefinition::declare("Visible");
    let mut b = schema.builder();
    b.create_field(FieldSpec::new("all", ScalarType::I32)).expect("all");
    b.create_field(FieldSpec::new("json", ScalarType::I32).syntaxes(SyntaxSet::of(&[Syntax::Json])))
        .expect("json");
    b.create_field(FieldSpec::new("none", ScalarType::I32).syntaxes(SyntaxSet::NONE))
        .expect("none");
    let schema = b.finish().expect("finishes");

    let json: Vec<_> = schema.fields_for(Syntax::Json).map(|f| f.name()).collect();
    let wire: Vec<_> = schema.fields_for(Syntax::Wire).map(|f| f.name()).collect();
    assert_eq!(json, ["all", "json"]);
    assert_eq!(wire, ["all"]);
    assert_eq!(schema.field("none").expect("none").syntaxes(), SyntaxSet::NONE);
}
