//! SQL-style text literals.
//!
//! Numbers are written verbatim, booleans as `1`/`0`, strings and timestamps
//! single-quoted with `'` and `\` backslash-escaped, binary as `x'hex'`,
//! and absence as `NULL`.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, tag_no_case, take_while},
    character::complete::{char, one_of},
    combinator::{all_consuming, map, opt},
    sequence::delimited,
};

use crate::{
    error::{CodecKind, ModelError},
    field::FieldType,
    record::Record,
    timestamp::DEFAULT_TIMESTAMP_FORMAT,
    value::Value,
};

pub const NULL_LITERAL: &str = "NULL";

/// Options shared by the text codec and the display/parse surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// chrono `strftime` pattern for timestamps.
    pub timestamp_format: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl TextOptions {
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }
}

pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        map(
            opt(escaped_transform(is_not("\\'"), '\\', one_of("\\'"))),
            Option::unwrap_or_default,
        ),
        char('\''),
    )(input)
}

/// Inverse of [`quote`]. The whole input must be one quoted literal.
pub fn unquote(literal: &str) -> Result<String, ModelError> {
    all_consuming(quoted)(literal)
        .map(|(_, s)| s)
        .map_err(|e| {
            ModelError::codec(CodecKind::Text, format!("malformed quoted literal {literal:?}: {e}"))
        })
}

pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

pub fn from_hex(text: &str) -> Result<Vec<u8>, ModelError> {
    if text.len() % 2 != 0 {
        return Err(ModelError::codec(
            CodecKind::Text,
            format!("odd-length hex string {text:?}"),
        ));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| {
                    ModelError::codec(CodecKind::Text, format!("invalid hex digits in {text:?}"))
                })
        })
        .collect()
}

fn blob(input: &str) -> IResult<&str, &str> {
    delimited(
        alt((tag("x'"), tag("X'"))),
        take_while(|c: char| c.is_ascii_hexdigit()),
        tag("'"),
    )(input)
}

/// Parses `x'..'` into bytes.
pub fn parse_blob(literal: &str) -> Result<Vec<u8>, ModelError> {
    let (_, hex) = all_consuming(blob)(literal).map_err(|e| {
        ModelError::codec(CodecKind::Text, format!("malformed blob literal {literal:?}: {e}"))
    })?;
    from_hex(hex)
}

pub(crate) fn is_null_literal(literal: &str) -> bool {
    all_consuming(tag_no_case::<_, _, nom::error::Error<&str>>(NULL_LITERAL))(literal.trim())
        .is_ok()
}

/// Text literal for one value of `field_type`.
pub fn encode_value(
    field_type: &FieldType,
    value: &Value,
    options: &TextOptions,
) -> Result<String, ModelError> {
    field_type.encode_text(value, options)
}

pub fn decode_value(
    field_type: &FieldType,
    literal: &str,
    options: &TextOptions,
) -> Result<Value, ModelError> {
    field_type.decode_text(literal, options)
}

/// `(column, literal)` for every persisted field of `record`, in schema order.
pub fn persisted_literals(
    record: &Record,
    options: &TextOptions,
) -> Result<Vec<(String, String)>, ModelError> {
    record
        .schema()
        .persisted_fields()
        .map(|field| {
            let literal = field.field_type().encode_text(&record.get(field), options)?;
            Ok((field.column().to_string(), literal))
        })
        .collect()
}
