mod common;

use common::{Color, Status, field, person_schema};
use modelkit_core::{
    CodecKind, EnumValue, FieldType, Id, ModelError, ScalarType, TextOptions, Timestamp, Value,
    codec::text::{
        decode_value, encode_value, from_hex, parse_blob, persisted_literals, quote, to_hex,
        unquote,
    },
};

// ── helpers ──────────────────────────────────────────────────────────────────

fn opts() -> TextOptions {
    TextOptions::default()
}

fn encode(kind: impl Into<FieldType>, v: impl Into<Value>) -> String {
    encode_value(&kind.into(), &v.into(), &opts()).expect("encodes")
}

fn decode(kind: impl Into<FieldType>, literal: &str) -> Value {
    decode_value(&kind.into(), literal, &opts()).expect("decodes")
}

// ── quoting ──────────────────────────────────────────────────────────────────

#[test]
fn quote_escapes_quote_and_backslash() {
    assert_eq!(quote(r"O'Brien\"), r"'O\'Brien\\'");
    assert_eq!(quote(""), "''");
    assert_eq!(unquote(r"'O\'Brien\\'").expect("unquotes"), r"O'Brien\");
    assert_eq!(unquote("''").expect("empty literal"), "");
}

#[test]
fn malformed_quoted_literals_fail() {
    for bad in ["'open", "bare", r"'bad\x'", "'a' trailing"] {
        let err = unquote(bad).expect_err("malformed");
        assert!(matches!(err, ModelError::Codec { codec: CodecKind::Text, .. }), "{bad}");
    }
}

#[test]
fn hex_helpers() {
    assert_eq!(to_hex(&[0x00, 0x0f, 0xff]), "000fff");
    assert_eq!(from_hex("000FfF").expect("hex"), [0x00, 0x0f, 0xff]);
    assert!(from_hex("abc").is_err());
    assert!(from_hex("zz").is_err());
    assert_eq!(parse_blob("X'cafe'").expect("blob"), [0xca, 0xfe]);
    assert_eq!(parse_blob("x''").expect("empty blob"), Vec::<u8>::new());
    assert!(parse_blob("'cafe'").is_err());
}

// ── literals ─────────────────────────────────────────────────────────────────

#[test]
fn scalar_literals() {
    assert_eq!(encode(ScalarType::I32, -4), "-4");
    assert_eq!(encode(ScalarType::I64, 1i64 << 40), "1099511627776");
    assert_eq!(encode(ScalarType::F64, 2.5), "2.5");
    assert_eq!(encode(ScalarType::Bool, true), "1");
    assert_eq!(encode(ScalarType::Bool, false), "0");
    assert_eq!(encode(ScalarType::Id, Id::new(12)), "12");
    assert_eq!(encode(ScalarType::String, "it's"), r"'it\'s'");
    assert_eq!(encode(ScalarType::Bytes, Value::bytes([1, 171])), "x'01ab'");
    assert_eq!(
        encode(ScalarType::Timestamp, Timestamp::from_millis(1_709_296_200_000)),
        "'2024-03-01 12:30:00'"
    );
}

#[test]
fn null_is_the_null_keyword_for_every_kind() {
    for kind in ScalarType::ALL {
        assert_eq!(encode(kind, Value::Null), "NULL");
        assert!(decode(kind, "NULL").is_null());
        assert!(decode(kind, " null ").is_null());
    }
}

#[test]
fn literals_decode_back() {
    assert!(matches!(decode(ScalarType::I32, " 42 "), Value::I32(42)));
    assert!(matches!(decode(ScalarType::Bool, "1"), Value::Bool(true)));
    assert!(matches!(decode(ScalarType::Bool, "0"), Value::Bool(false)));
    assert!(matches!(decode(ScalarType::String, r"'O\'Brien\\'"), Value::String(s) if &*s == r"O'Brien\"));
    assert!(matches!(decode(ScalarType::Bytes, "x'01ab'"), Value::Bytes(b) if *b == [1, 171]));
    assert!(matches!(
        decode(ScalarType::Timestamp, "'2024-03-01 12:30:00'"),
        Value::Timestamp(t) if t.millis() == 1_709_296_200_000
    ));
    assert!(matches!(decode(ScalarType::Id, "9"), Value::Id(id) if id.value() == 9));
}

#[test]
fn malformed_literals_are_text_codec_errors() {
    for (kind, literal) in [
        (ScalarType::I32, "'4'"),
        (ScalarType::Bool, "true"),
        (ScalarType::String, "unquoted"),
        (ScalarType::Bytes, "0x01"),
        (ScalarType::Timestamp, "'not a time'"),
    ] {
        let err = decode_value(&kind.into(), literal, &opts()).expect_err("malformed");
        assert!(
            matches!(err, ModelError::Codec { codec: CodecKind::Text, .. }),
            "{kind:?} {literal}: {err}"
        );
    }
}

// ── enums ────────────────────────────────────────────────────────────────────

#[test]
fn enums_use_the_persistent_mapping() {
    let status = FieldType::enum_of::<Status>().expect("Status");
    let color = FieldType::enum_of::<Color>().expect("Color");

    assert_eq!(encode(status.clone(), EnumValue::of(Status::Suspended)), "'S'");
    assert_eq!(encode(color.clone(), EnumValue::of(Color::Blue)), "2");
    assert!(matches!(
        decode(status.clone(), "'A'"),
        Value::Enum(v) if v.name() == "ACTIVE"
    ));
    assert!(decode(status.clone(), "NULL").is_null());

    let err = decode_value(&status, "'Z'", &opts()).expect_err("no such code");
    assert!(matches!(err, ModelError::Codec { codec: CodecKind::Text, .. }));
    assert!(decode_value(&color, "7", &opts()).is_err());
}

#[test]
fn nested_fields_have_no_literal() {
    let schema = person_schema();
    let parent = field(&schema, "parent").field_type();
    assert!(encode_value(parent, &Value::Null, &opts()).is_err());
}

// ── records ──────────────────────────────────────────────────────────────────

#[test]
fn persisted_literals_list_columns_in_schema_order() {
    let schema = person_schema();
    let r = schema.create_record().expect("record");
    r.set(field(&schema, "id"), Id::new(3)).expect("id");
    r.set(field(&schema, "name"), "O'Hara").expect("name");
    r.set(field(&schema, "status"), EnumValue::of(Status::Closed)).expect("status");
    r.set(field(&schema, "note"), "transient").expect("note");

    let literals = persisted_literals(&r, &opts()).expect("encodes");
    let columns: Vec<_> = literals.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(
        columns,
        [
            "id", "full_name", "age", "balance", "score", "born", "avatar", "version", "active",
            "color", "status"
        ]
    );
    assert_eq!(literals[0].1, "3");
    assert_eq!(literals[1].1, r"'O\'Hara'");
    assert_eq!(literals[2].1, "NULL");
    assert_eq!(literals[10].1, "'C'");
}

#[test]
fn custom_timestamp_format() {
    let iso = TextOptions::default().with_timestamp_format("%Y-%m-%dT%H:%M:%SZ");
    let ty = FieldType::from(ScalarType::Timestamp);
    let v = Value::Timestamp(Timestamp::from_millis(0));
    assert_eq!(encode_value(&ty, &v, &iso).expect("encodes"), "'1970-01-01T00:00:00Z'");
    assert!(matches!(
        decode_value(&ty, "'1970-01-01T00:00:00Z'", &iso),
        Ok(Value::Timestamp(t)) if t.millis() == 0
    ));
}
