use std::{cmp::Ordering, sync::Arc};

use super::{
    DISPLAY_LIMIT, ScalarCodec, ScalarType, ZeroSubstitution, literal_error, mismatch_order,
    numeric::hash_i64, parse_error,
};
use crate::{
    codec::{
        binary::{WireReader, WireWriter},
        relational::{ColumnSource, ParameterSink, SqlType},
        text::{NULL_LITERAL, TextOptions, from_hex, is_null_literal, parse_blob, quote, to_hex, unquote},
    },
    error::{CodecKind, ModelError, ValueTypeError},
    timestamp::Timestamp,
    value::Value,
};

/// Hash over the UTF-16 code units, `h = 31 * h + unit`.
fn hash_str(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn hash_bytes(b: &[u8]) -> i32 {
    b.iter().fold(1i32, |h, &byte| {
        h.wrapping_mul(31).wrapping_add(i32::from(byte as i8))
    })
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

pub(super) struct StringCodec;

impl ScalarCodec for StringCodec {
    fn kind(&self) -> ScalarType {
        ScalarType::String
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_str().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::String(a), Value::String(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::String(s) => hash_str(s),
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn compare_for_display(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::String(a), Value::String(b)) => cmp_ignore_case(a, b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, full: bool, _options: &TextOptions) -> String {
        let Value::String(s) = value else {
            return value.to_string();
        };
        if full {
            return s.to_string();
        }
        match s.char_indices().nth(DISPLAY_LIMIT) {
            Some((cut, _)) => format!("{}… ({} total chars)", &s[..cut], s.chars().count()),
            None => s.to_string(),
        }
    }

    /// Empty text is null.
    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(Value::string(text))
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_len_prefixed(value.try_str()?.map(str::as_bytes))
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        _substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let Some(payload) = input.get_len_prefixed()? else {
            return Ok(Value::Null);
        };
        let s = std::str::from_utf8(&payload).map_err(|e| {
            ModelError::codec(CodecKind::Binary, format!("invalid UTF-8 in string: {e}"))
        })?;
        Ok(Value::string(s))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::Varchar
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_str()? {
            Some(v) => sink.set_string(index, v),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_string(index)?.into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(value
            .try_str()?
            .map_or_else(|| NULL_LITERAL.to_string(), quote))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        if is_null_literal(literal) {
            return Ok(Value::Null);
        }
        Ok(Value::from(unquote(literal)?))
    }
}

pub(super) struct BytesCodec;

impl ScalarCodec for BytesCodec {
    fn kind(&self) -> ScalarType {
        ScalarType::Bytes
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_bytes().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::Bytes(a), Value::Bytes(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::Bytes(b) => hash_bytes(b),
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, full: bool, _options: &TextOptions) -> String {
        let Value::Bytes(b) = value else {
            return value.to_string();
        };
        if full || b.len() <= DISPLAY_LIMIT {
            return to_hex(b);
        }
        format!("{}… ({} total bytes)", to_hex(&b[..DISPLAY_LIMIT]), b.len())
    }

    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        from_hex(text)
            .map(Value::from)
            .map_err(|e| parse_error(self.kind(), text, e))
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_len_prefixed(value.try_bytes()?)
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        _substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        Ok(input
            .get_len_prefixed()?
            .map(|payload| Value::Bytes(Arc::from(payload.as_ref())))
            .unwrap_or_default())
    }

    fn sql_type(&self) -> SqlType {
        SqlType::VarBinary
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_bytes()? {
            Some(v) => sink.set_bytes(index, v),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_bytes(index)?.into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(value
            .try_bytes()?
            .map_or_else(|| NULL_LITERAL.to_string(), |b| format!("x'{}'", to_hex(b))))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        if is_null_literal(literal) {
            return Ok(Value::Null);
        }
        parse_blob(literal.trim())
            .map(Value::from)
            .map_err(|e| literal_error(self.kind(), literal, e))
    }
}

/// Wire form is the millisecond count as an 8-byte float; NaN encodes null.
pub(super) struct TimestampCodec;

impl ScalarCodec for TimestampCodec {
    fn kind(&self) -> ScalarType {
        ScalarType::Timestamp
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_timestamp().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::Timestamp(a), Value::Timestamp(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::Timestamp(t) => hash_i64(t.millis()),
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, options: &TextOptions) -> String {
        match value {
            Value::Timestamp(t) => t.format(&options.timestamp_format),
            other => other.to_string(),
        }
    }

    fn parse(&self, text: &str, options: &TextOptions) -> Result<Value, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Timestamp::parse(text, &options.timestamp_format)
            .map(Value::Timestamp)
            .map_err(|e| parse_error(self.kind(), text, e))
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_f64(value.try_timestamp()?.map_or(0.0, |t| t.millis() as f64));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let v = input.get_f64()?;
        if substitution.folds_plain() && (v == 0.0 || v.is_nan()) {
            return Ok(Value::Null);
        }
        // saturating; NaN lands on the epoch
        Ok(Value::Timestamp(Timestamp::from_millis(v as i64)))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::Timestamp
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_timestamp()? {
            Some(v) => sink.set_timestamp(index, v),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_timestamp(index)?.into())
    }

    fn encode_text(&self, value: &Value, options: &TextOptions) -> Result<String, ModelError> {
        Ok(value.try_timestamp()?.map_or_else(
            || NULL_LITERAL.to_string(),
            |t| quote(&t.format(&options.timestamp_format)),
        ))
    }

    fn decode_text(&self, literal: &str, options: &TextOptions) -> Result<Value, ModelError> {
        if is_null_literal(literal) {
            return Ok(Value::Null);
        }
        let text = unquote(literal.trim())?;
        Timestamp::parse(&text, &options.timestamp_format)
            .map(Value::Timestamp)
            .map_err(|e| literal_error(self.kind(), literal, e))
    }
}
