//! JSON → record.

use modelkit_core::{
    FieldDefinition, FieldType, Id, Record, RecordList, ScalarType, SchemaRef, Syntax, Timestamp,
    Value, Version, codec::text::from_hex,
};
use serde_json::Value as Json;

use crate::{JsonCodec, JsonCodecError};

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn unexpected(field: &str, expected: &'static str, json: &Json) -> JsonCodecError {
    JsonCodecError::UnexpectedJson {
        field: field.to_string(),
        expected,
        found: json_kind(json).to_string(),
    }
}

/// Keys missing from the object leave their field null; keys that are not
/// `Json`-visible fields are ignored.
fn record(schema: &SchemaRef, json: &Json) -> Result<Record, JsonCodecError> {
    let object = json
        .as_object()
        .ok_or_else(|| unexpected(schema.entity_name(), "object", json))?;
    let record = schema.create_record()?;
    for field in schema.fields_for(Syntax::Json) {
        let Some(v) = object.get(field.name()) else {
            continue;
        };
        record.set(field, field_value(field, v)?)?;
    }
    Ok(record)
}

fn list(schema: &SchemaRef, json: &Json) -> Result<RecordList, JsonCodecError> {
    let items = json
        .as_array()
        .ok_or_else(|| unexpected(schema.entity_name(), "array", json))?;
    let list = schema.create_list()?;
    for item in items {
        list.push(record(schema, item)?)?;
    }
    Ok(list)
}

fn field_value(field: &FieldDefinition, json: &Json) -> Result<Value, JsonCodecError> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    match field.field_type() {
        FieldType::Scalar(kind) => scalar(field, *kind, json),
        FieldType::Enum(e) => {
            let code = i32::try_from(integer(field, json)?)
                .map_err(|_| unexpected(field.name(), "32-bit enum code", json))?;
            Ok(e.wire().to_case(&Value::I32(code)).into())
        }
        FieldType::Record(schema) => Ok(record(schema, json)?.into()),
        FieldType::List(schema) => Ok(list(schema, json)?.into()),
    }
}

/// Numbers are accepted either as JSON numbers or as numeric strings.
fn integer(field: &FieldDefinition, json: &Json) -> Result<i64, JsonCodecError> {
    match json {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| unexpected(field.name(), "integer", json))
}

fn float(field: &FieldDefinition, json: &Json) -> Result<f64, JsonCodecError> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| unexpected(field.name(), "number", json))
}

fn scalar(field: &FieldDefinition, kind: ScalarType, json: &Json) -> Result<Value, JsonCodecError> {
    Ok(match kind {
        ScalarType::I32 => Value::I32(
            i32::try_from(integer(field, json)?)
                .map_err(|_| unexpected(field.name(), "32-bit integer", json))?,
        ),
        ScalarType::I64 => Value::I64(integer(field, json)?),
        ScalarType::F64 => Value::F64(float(field, json)?),
        ScalarType::String => match json {
            Json::String(s) if s.is_empty() => Value::Null,
            Json::String(s) => Value::from(s.as_str()),
            Json::Number(_) | Json::Bool(_) => Value::from(json.to_string()),
            _ => return Err(unexpected(field.name(), "string", json)),
        },
        ScalarType::Timestamp => Value::Timestamp(Timestamp::from_millis(integer(field, json)?)),
        ScalarType::Bytes => match json {
            Json::String(s) => Value::from(from_hex(s)?),
            _ => return Err(unexpected(field.name(), "hex string", json)),
        },
        ScalarType::Id => match integer(field, json)? {
            0 => Value::Null,
            v => Value::Id(Id::new(v)),
        },
        ScalarType::Version => Value::Version(Version::new(integer(field, json)?)),
        ScalarType::Bool => match json {
            Json::Bool(b) => Value::Bool(*b),
            Json::String(s) => Value::Bool(s.trim().eq_ignore_ascii_case("true")),
            _ => return Err(unexpected(field.name(), "boolean", json)),
        },
    })
}

impl JsonCodec {
    pub fn record_from_json(&self, schema: &SchemaRef, json: &Json) -> Result<Record, JsonCodecError> {
        record(schema, json)
    }

    /// `None` for empty or blank input.
    pub fn record_from_str(
        &self,
        schema: &SchemaRef,
        input: &str,
    ) -> Result<Option<Record>, JsonCodecError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let json: Json = serde_json::from_str(input)?;
        record(schema, &json).map(Some)
    }

    pub fn list_from_json(
        &self,
        schema: &SchemaRef,
        json: &Json,
    ) -> Result<RecordList, JsonCodecError> {
        list(schema, json)
    }

    /// `None` for empty or blank input.
    pub fn list_from_str(
        &self,
        schema: &SchemaRef,
        input: &str,
    ) -> Result<Option<RecordList>, JsonCodecError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let json: Json = serde_json::from_str(input)?;
        list(schema, &json).map(Some)
    }
}
