use std::cmp::Ordering;

use modelkit_core::{
    CodecKind, Id, ModelError, ScalarType, TextOptions, Timestamp, Value, Version,
    scalar::DISPLAY_LIMIT,
};

// ── helpers ──────────────────────────────────────────────────────────────────

fn opts() -> TextOptions {
    TextOptions::default()
}

fn display(kind: ScalarType, v: &Value, full: bool) -> String {
    kind.to_display_string(v, full, &opts())
}

// ── check ────────────────────────────────────────────────────────────────────

#[test]
fn check_accepts_matching_variant_and_null() {
    assert!(ScalarType::I32.check(&Value::I32(1)).is_ok());
    assert!(ScalarType::Id.check(&Value::Id(Id::new(5))).is_ok());
    for kind in ScalarType::ALL {
        assert!(kind.check(&Value::Null).is_ok(), "{kind:?} rejects null");
    }
}

#[test]
fn check_rejects_other_variants() {
    let err = ScalarType::I32
        .check(&Value::I64(1))
        .expect_err("i64 is not i32");
    assert_eq!(err.found, "I64");
    assert!(ScalarType::Id.check(&Value::I64(1)).is_err());
    assert!(ScalarType::Version.check(&Value::Id(Id::new(1))).is_err());
    assert!(ScalarType::String.check(&Value::bytes(b"x")).is_err());
}

// ── equality & hashing ───────────────────────────────────────────────────────

#[test]
fn equality_is_null_safe() {
    let k = ScalarType::String;
    assert!(k.equals(&Value::Null, &Value::Null));
    assert!(!k.equals(&Value::Null, &Value::from("a")));
    assert!(!k.equals(&Value::from("a"), &Value::Null));
    assert!(k.equals(&Value::from("a"), &Value::from("a")));
}

#[test]
fn double_equality_folds_nan_and_separates_signed_zero() {
    let k = ScalarType::F64;
    assert!(k.equals(&Value::F64(f64::NAN), &Value::F64(f64::NAN)));
    assert!(!k.equals(&Value::F64(0.0), &Value::F64(-0.0)));
    assert_eq!(k.hash(&Value::F64(f64::NAN)), k.hash(&Value::F64(-f64::NAN)));
}

#[test]
fn hashes_follow_the_31_multiplier_scheme() {
    assert_eq!(ScalarType::String.hash(&Value::from("a")), 97);
    assert_eq!(ScalarType::String.hash(&Value::from("ab")), 3105);
    assert_eq!(ScalarType::I32.hash(&Value::I32(-7)), -7);
    assert_eq!(ScalarType::I64.hash(&Value::I64(1 << 32)), 1);
    assert_eq!(ScalarType::Bool.hash(&Value::Bool(true)), 1231);
    assert_eq!(ScalarType::Bool.hash(&Value::Bool(false)), 1237);
    assert_eq!(ScalarType::Bytes.hash(&Value::bytes([])), 1);
    assert_eq!(ScalarType::Bytes.hash(&Value::bytes([1])), 32);
    assert_eq!(ScalarType::Id.hash(&Value::Null), 0);
}

#[test]
fn equal_values_hash_equally() {
    for (kind, a, b) in [
        (ScalarType::String, Value::from("x"), Value::from(String::from("x"))),
        (ScalarType::Bytes, Value::bytes([1, 2]), Value::from(vec![1u8, 2])),
        (ScalarType::Id, Value::Id(Id::new(9)), Value::Id(Id::new(9))),
        (
            ScalarType::Timestamp,
            Value::Timestamp(Timestamp::from_millis(5)),
            Value::Timestamp(Timestamp::from_millis(5)),
        ),
    ] {
        assert!(kind.equals(&a, &b));
        assert_eq!(kind.hash(&a), kind.hash(&b));
    }
}

// ── ordering ─────────────────────────────────────────────────────────────────

#[test]
fn null_sorts_before_every_value() {
    for (kind, v) in [
        (ScalarType::I32, Value::I32(i32::MIN)),
        (ScalarType::F64, Value::F64(f64::NEG_INFINITY)),
        (ScalarType::String, Value::from("")),
        (ScalarType::Bool, Value::Bool(false)),
    ] {
        assert_eq!(kind.compare_native(&Value::Null, &v), Ordering::Less);
        assert_eq!(kind.compare_native(&v, &Value::Null), Ordering::Greater);
        assert_eq!(kind.compare_for_display(&Value::Null, &v), Ordering::Less);
    }
    assert_eq!(
        ScalarType::I32.compare_native(&Value::Null, &Value::Null),
        Ordering::Equal
    );
}

#[test]
fn text_display_order_ignores_case() {
    let (a, b) = (Value::from("apple"), Value::from("Banana"));
    assert_eq!(ScalarType::String.compare_native(&a, &b), Ordering::Greater);
    assert_eq!(ScalarType::String.compare_for_display(&a, &b), Ordering::Less);
    assert_eq!(
        ScalarType::String.compare_for_display(&Value::from("ABC"), &Value::from("abc")),
        Ordering::Equal
    );
}

#[test]
fn nan_sorts_after_numbers() {
    let k = ScalarType::F64;
    assert_eq!(
        k.compare_native(&Value::F64(f64::NAN), &Value::F64(f64::INFINITY)),
        Ordering::Greater
    );
    assert_eq!(
        k.compare_native(&Value::F64(-1.0), &Value::F64(2.5)),
        Ordering::Less
    );
}

// ── display & parse ──────────────────────────────────────────────────────────

#[test]
fn long_text_is_truncated_unless_full() {
    let long = "a".repeat(DISPLAY_LIMIT + 1);
    let v = Value::from(long.as_str());

    let short = display(ScalarType::String, &v, false);
    assert!(short.starts_with(&"a".repeat(DISPLAY_LIMIT)));
    assert!(short.ends_with(&format!("… ({} total chars)", DISPLAY_LIMIT + 1)));
    assert!(!short.contains(&"a".repeat(DISPLAY_LIMIT + 1)));

    assert_eq!(display(ScalarType::String, &v, true), long);
}

#[test]
fn text_at_the_limit_is_not_truncated() {
    let exact = "é".repeat(DISPLAY_LIMIT);
    assert_eq!(display(ScalarType::String, &Value::from(exact.as_str()), false), exact);
}

#[test]
fn long_binary_is_truncated_unless_full() {
    let v = Value::bytes(vec![0xab; DISPLAY_LIMIT + 1]);
    let short = display(ScalarType::Bytes, &v, false);
    assert_eq!(
        short,
        format!("{}… ({} total bytes)", "ab".repeat(DISPLAY_LIMIT), DISPLAY_LIMIT + 1)
    );
    assert_eq!(display(ScalarType::Bytes, &v, true), "ab".repeat(DISPLAY_LIMIT + 1));
}

#[test]
fn null_displays_as_null() {
    for kind in ScalarType::ALL {
        assert_eq!(display(kind, &Value::Null, false), "null");
    }
}

#[test]
fn parse_inverts_display() {
    let cases = [
        (ScalarType::I32, Value::I32(-42)),
        (ScalarType::I64, Value::I64(1 << 40)),
        (ScalarType::F64, Value::F64(1.5)),
        (ScalarType::String, Value::from("hello")),
        (ScalarType::Bytes, Value::bytes([0, 1, 254])),
        (ScalarType::Id, Value::Id(Id::new(77))),
        (ScalarType::Version, Value::Version(Version::new(3))),
        (ScalarType::Bool, Value::Bool(true)),
        (
            ScalarType::Timestamp,
            Value::Timestamp(Timestamp::from_millis(1_709_296_200_000)),
        ),
    ];
    for (kind, v) in cases {
        let text = display(kind, &v, true);
        let back = kind.parse(&text, &opts()).expect("display output parses");
        assert!(kind.equals(&v, &back), "{kind:?}: {text} -> {back:?}");
    }
}

#[test]
fn parse_of_empty_text_is_null() {
    for kind in ScalarType::ALL {
        let v = kind.parse("", &opts()).expect("empty text parses");
        assert!(v.is_null(), "{kind:?} parsed empty text as {v:?}");
    }
}

#[test]
fn id_parse_treats_zero_as_absent() {
    assert!(ScalarType::Id.parse("0", &opts()).expect("zero parses").is_null());
    assert!(matches!(
        ScalarType::Id.parse("12", &opts()),
        Ok(Value::Id(id)) if id.value() == 12
    ));
}

#[test]
fn parse_failures_are_display_codec_errors() {
    for (kind, text) in [
        (ScalarType::I32, "forty"),
        (ScalarType::Id, "abc"),
        (ScalarType::Bool, "maybe"),
        (ScalarType::Bytes, "xyz"),
        (ScalarType::Timestamp, "yesterday"),
    ] {
        let err = kind.parse(text, &opts()).expect_err("input is malformed");
        assert!(
            matches!(err, ModelError::Codec { codec: CodecKind::Display, .. }),
            "{kind:?}: {err}"
        );
    }
}

#[test]
fn bool_parse_accepts_words_and_digits() {
    let k = ScalarType::Bool;
    assert!(matches!(k.parse("TRUE", &opts()), Ok(Value::Bool(true))));
    assert!(matches!(k.parse("false", &opts()), Ok(Value::Bool(false))));
    assert!(matches!(k.parse("1", &opts()), Ok(Value::Bool(true))));
    assert!(matches!(k.parse("0", &opts()), Ok(Value::Bool(false))));
}

#[test]
fn timestamp_display_follows_configured_format() {
    let v = Value::Timestamp(Timestamp::from_millis(1_709_296_200_000));
    assert_eq!(display(ScalarType::Timestamp, &v, false), "2024-03-01 12:30:00");

    let iso = TextOptions::default().with_timestamp_format("%Y-%m-%dT%H:%M:%S");
    assert_eq!(
        ScalarType::Timestamp.to_display_string(&v, false, &iso),
        "2024-03-01T12:30:00"
    );
    assert!(matches!(
        ScalarType::Timestamp.parse("2024-03-01T12:30:00", &iso),
        Ok(Value::Timestamp(t)) if t.millis() == 1_709_296_200_000
    ));
}

// ── nominal types ────────────────────────────────────────────────────────────

#[test]
fn id_helpers() {
    assert_eq!(Id::parse_nullable(""), None);
    assert_eq!(Id::parse_nullable("0"), None);
    assert_eq!(Id::parse_nullable("x"), None);
    assert_eq!(Id::parse_nullable("15"), Some(Id::new(15)));
    assert_eq!(Id::parse_hex("ff"), Some(Id::new(255)));
    assert_eq!(Id::new(255).to_hex_string(), "ff");
    assert_eq!(
        Id::parse_list("1, 2,,3", ",").expect("list parses"),
        vec![Id::new(1), Id::new(2), Id::new(3)]
    );
    assert!(Id::parse_list("1,x", ",").is_err());
    assert!(Id::is_set(Some(Id::new(1))));
    assert!(!Id::is_set(Some(Id::new(-1))));
    assert!(!Id::is_set(None));
    assert_eq!(Id::new(4).next(3), Id::new(7));
    assert_eq!(Id::to_primitive(None), 0);
    assert_eq!(Id::new((1 << 32) + 5).int_value(), 5);
}

#[test]
fn version_helpers() {
    assert_eq!(Version::initial().value(), 1);
    assert_eq!(Version::initial().increment(), Version::new(2));
    assert_eq!("9".parse::<Version>().expect("parses"), Version::new(9));
}

#[test]
fn counters_wrap_instead_of_overflowing() {
    assert_eq!(Id::new(i64::MAX).next(1), Id::new(i64::MIN));
    assert_eq!(Id::new(i64::MIN).next(-1), Id::new(i64::MAX));
    assert_eq!(Version::new(i64::MAX).increment(), Version::new(i64::MIN));
}
