use std::{cmp::Ordering, fmt::Display, str::FromStr};

use super::{
    ScalarCodec, ScalarType, ZeroSubstitution, literal_error, mismatch_order, parse_error,
};
use crate::{
    codec::{
        binary::{WireReader, WireWriter},
        relational::{ColumnSource, ParameterSink, SqlType},
        text::{NULL_LITERAL, TextOptions, is_null_literal},
    },
    error::{ModelError, ValueTypeError},
    id::{Id, Version},
    value::{Value, canonical_bits},
};

pub(super) fn hash_i64(v: i64) -> i32 {
    (v ^ ((v as u64) >> 32) as i64) as i32
}

fn parse_number<T>(kind: ScalarType, text: &str) -> Result<Option<T>, ModelError>
where
    T: FromStr,
    T::Err: Display,
{
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|e| parse_error(kind, text, e))
}

fn decode_number<T>(kind: ScalarType, literal: &str) -> Result<Option<T>, ModelError>
where
    T: FromStr,
    T::Err: Display,
{
    if is_null_literal(literal) {
        return Ok(None);
    }
    let text = literal.trim();
    text.parse()
        .map(Some)
        .map_err(|e| literal_error(kind, text, e))
}

fn display_or_null<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NULL_LITERAL.to_string(), |v| v.to_string())
}

pub(super) struct I32Codec;

impl ScalarCodec for I32Codec {
    fn kind(&self) -> ScalarType {
        ScalarType::I32
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_i32().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::I32(a), Value::I32(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::I32(v) => *v,
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::I32(a), Value::I32(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, _options: &TextOptions) -> String {
        value.to_string()
    }

    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(parse_number::<i32>(self.kind(), text)?.into())
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_i32(value.try_i32()?.unwrap_or(0));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let v = input.get_i32()?;
        if v == 0 && substitution.folds_plain() {
            return Ok(Value::Null);
        }
        Ok(Value::I32(v))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::Integer
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_i32()? {
            Some(v) => sink.set_i32(index, v),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_i32(index)?.into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(display_or_null(value.try_i32()?))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(decode_number::<i32>(self.kind(), literal)?.into())
    }
}

pub(super) struct I64Codec;

impl ScalarCodec for I64Codec {
    fn kind(&self) -> ScalarType {
        ScalarType::I64
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_i64().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::I64(a), Value::I64(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::I64(v) => hash_i64(*v),
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, _options: &TextOptions) -> String {
        value.to_string()
    }

    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(parse_number::<i64>(self.kind(), text)?.into())
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_i64(value.try_i64()?.unwrap_or(0));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let v = input.get_i64()?;
        if v == 0 && substitution.folds_plain() {
            return Ok(Value::Null);
        }
        Ok(Value::I64(v))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::BigInt
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_i64()? {
            Some(v) => sink.set_i64(index, v),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_i64(index)?.into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(display_or_null(value.try_i64()?))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(decode_number::<i64>(self.kind(), literal)?.into())
    }
}

/// NaN equals NaN and sorts last; `0.0` and `-0.0` are distinct.
pub(super) struct F64Codec;

impl ScalarCodec for F64Codec {
    fn kind(&self) -> ScalarType {
        ScalarType::F64
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_f64().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::F64(a), Value::F64(b)) if canonical_bits(*a) == canonical_bits(*b))
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::F64(v) => hash_i64(canonical_bits(*v) as i64),
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::F64(a), Value::F64(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.total_cmp(b),
            },
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, _options: &TextOptions) -> String {
        value.to_string()
    }

    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(parse_number::<f64>(self.kind(), text)?.into())
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_f64(value.try_f64()?.unwrap_or(0.0));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let v = input.get_f64()?;
        if v == 0.0 && substitution.folds_plain() {
            return Ok(Value::Null);
        }
        Ok(Value::F64(v))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::Double
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_f64()? {
            Some(v) => sink.set_f64(index, v),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_f64(index)?.into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(display_or_null(value.try_f64()?))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(decode_number::<f64>(self.kind(), literal)?.into())
    }
}

/// 64-bit in memory and in the relational surface, low 32 bits on the wire.
pub(super) struct IdCodec;

impl ScalarCodec for IdCodec {
    fn kind(&self) -> ScalarType {
        ScalarType::Id
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_id().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::Id(a), Value::Id(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::Id(v) => (v.value() ^ (v.value() >> 32)) as i32,
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Id(a), Value::Id(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, _options: &TextOptions) -> String {
        value.to_string()
    }

    /// Empty text and `"0"` parse to null.
    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        let raw = parse_number::<i64>(self.kind(), text)?;
        Ok(raw.and_then(Id::from_primitive).into())
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_i32(value.try_id()?.map_or(0, Id::int_value));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let v = input.get_i32()?;
        if v == 0 && substitution.folds_identity() {
            return Ok(Value::Null);
        }
        Ok(Value::Id(Id::new(i64::from(v))))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::BigInt
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_id()? {
            Some(v) => sink.set_i64(index, v.value()),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_i64(index)?.map(Id::new).into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(display_or_null(value.try_id()?))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(decode_number::<i64>(self.kind(), literal)?.map(Id::new).into())
    }
}

pub(super) struct VersionCodec;

impl ScalarCodec for VersionCodec {
    fn kind(&self) -> ScalarType {
        ScalarType::Version
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_version().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::Version(a), Value::Version(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::Version(v) => (v.value() ^ (v.value() >> 32)) as i32,
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Version(a), Value::Version(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, _options: &TextOptions) -> String {
        value.to_string()
    }

    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(parse_number::<i64>(self.kind(), text)?.map(Version::new).into())
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_i32(value.try_version()?.map_or(0, Version::int_value));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        let v = input.get_i32()?;
        if v == 0 && substitution.folds_identity() {
            return Ok(Value::Null);
        }
        Ok(Value::Version(Version::new(i64::from(v))))
    }

    fn sql_type(&self) -> SqlType {
        SqlType::BigInt
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_version()? {
            Some(v) => sink.set_i64(index, v.value()),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_i64(index)?.map(Version::new).into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(display_or_null(value.try_version()?))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        Ok(decode_number::<i64>(self.kind(), literal)?
            .map(Version::new)
            .into())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        t if t.eq_ignore_ascii_case("true") => Some(true),
        t if t.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Stored as an integer column (`1`/`0`); `false < true`.
pub(super) struct BoolCodec;

impl ScalarCodec for BoolCodec {
    fn kind(&self) -> ScalarType {
        ScalarType::Bool
    }

    fn check(&self, value: &Value) -> Result<(), ValueTypeError> {
        value.try_bool().map(drop)
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        matches!((a, b), (Value::Bool(a), Value::Bool(b)) if a == b)
    }

    fn hash(&self, value: &Value) -> i32 {
        match value {
            Value::Bool(true) => 1231,
            Value::Bool(false) => 1237,
            _ => 0,
        }
    }

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => mismatch_order(a, b),
        }
    }

    fn to_display_string(&self, value: &Value, _full: bool, _options: &TextOptions) -> String {
        value.to_string()
    }

    fn parse(&self, text: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| parse_error(self.kind(), text, "expected true/false or 1/0"))
    }

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        out.put_i8(value.try_bool()?.map_or(-1, i8::from));
        Ok(())
    }

    fn decode_binary(
        &self,
        input: &mut WireReader,
        _substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        Ok(match input.get_i8()? {
            -1 => Value::Null,
            0 => Value::Bool(false),
            _ => Value::Bool(true),
        })
    }

    fn sql_type(&self) -> SqlType {
        SqlType::Integer
    }

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match value.try_bool()? {
            Some(v) => sink.set_i32(index, i32::from(v)),
            None => sink.set_null(index, self.sql_type()),
        }
    }

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        Ok(source.get_i32(index)?.map(|v| v != 0).into())
    }

    fn encode_text(&self, value: &Value, _options: &TextOptions) -> Result<String, ModelError> {
        Ok(display_or_null(value.try_bool()?.map(i32::from)))
    }

    fn decode_text(&self, literal: &str, _options: &TextOptions) -> Result<Value, ModelError> {
        if is_null_literal(literal) {
            return Ok(Value::Null);
        }
        let text = literal.trim();
        parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| literal_error(self.kind(), text, "expected 1 or 0"))
    }
}
