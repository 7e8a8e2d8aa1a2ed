//! Record → JSON.

use modelkit_core::{
    FieldDefinition, FieldType, ModelError, Record, RecordList, Syntax, Value, codec::text::to_hex,
};
use serde_json::{Map, Number, Value as Json};

use crate::{JsonCodec, JsonCodecError, JsonOptions};

struct Encoder<'a> {
    options: &'a JsonOptions,
    /// Records on the current path, for cycle detection.
    active: Vec<Record>,
}

impl<'a> Encoder<'a> {
    fn new(options: &'a JsonOptions) -> Self {
        Self {
            options,
            active: Vec::new(),
        }
    }

    fn record(&mut self, record: &Record) -> Result<Json, JsonCodecError> {
        self.record_fields(record, record.schema().fields())
    }

    fn record_fields<'f>(
        &mut self,
        record: &Record,
        fields: impl IntoIterator<Item = &'f FieldDefinition>,
    ) -> Result<Json, JsonCodecError> {
        if self.active.iter().any(|r| r.ptr_eq(record)) {
            return Err(JsonCodecError::Cycle {
                entity: record.to_short_string(),
            });
        }
        self.active.push(record.clone());
        let result = fields
            .into_iter()
            .filter(|f| f.is_visible(Syntax::Json))
            .try_fold(Map::new(), |mut object, field| {
                if let Some(json) = self.field(field, &record.get(field))? {
                    object.insert(field.name().to_string(), json);
                }
                Ok(object)
            });
        self.active.pop();
        result.map(Json::Object)
    }

    fn list(&mut self, list: &RecordList) -> Result<Json, JsonCodecError> {
        list.records()
            .iter()
            .map(|r| self.record(r))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    /// `None` leaves the key out of the object.
    fn field(
        &mut self,
        field: &FieldDefinition,
        value: &Value,
    ) -> Result<Option<Json>, JsonCodecError> {
        let field_type = field.field_type();
        if value.is_null() {
            let kind = match field_type {
                FieldType::Scalar(kind) => Some(*kind),
                _ => None,
            };
            return Ok(self.options.null_for(kind));
        }
        let json = match (field_type, value) {
            (FieldType::Scalar(_), _) => scalar(field, value)?,
            (FieldType::Enum(e), Value::Enum(case)) => match e.wire().to_external(case) {
                Some(external) => scalar(field, &external)?,
                None => return Ok(self.options.null_for(None)),
            },
            (FieldType::Record(_), Value::Record(r)) => self.record(r)?,
            (FieldType::List(_), Value::List(l)) => self.list(l)?,
            _ => return Err(mismatch(field, value).into()),
        };
        Ok(Some(json))
    }
}

fn mismatch(field: &FieldDefinition, value: &Value) -> ModelError {
    ModelError::type_mismatch(
        field.name(),
        field.field_type().type_name(),
        value.variant_name(),
    )
}

fn scalar(field: &FieldDefinition, value: &Value) -> Result<Json, JsonCodecError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::I32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::F64(v) => Number::from_f64(*v).map(Json::Number).ok_or_else(|| {
            JsonCodecError::NonFiniteNumber {
                field: field.name().to_string(),
                value: *v,
            }
        })?,
        Value::String(s) => Json::from(&**s),
        Value::Timestamp(t) => Json::from(t.millis()),
        Value::Bytes(b) => Json::from(to_hex(b)),
        Value::Id(id) => Json::from(id.value()),
        Value::Version(v) => Json::from(v.value()),
        Value::Bool(b) => Json::from(*b),
        Value::Enum(_) | Value::Record(_) | Value::List(_) => {
            return Err(mismatch(field, value).into());
        }
    })
}

impl JsonCodec {
    /// Object of every `Json`-visible field, keyed by field name.
    pub fn record_to_json(&self, record: &Record) -> Result<Json, JsonCodecError> {
        Encoder::new(&self.options).record(record)
    }

    pub fn record_to_string(&self, record: &Record) -> Result<String, JsonCodecError> {
        Ok(serde_json::to_string(&self.record_to_json(record)?)?)
    }

    /// Like [`record_to_json`](Self::record_to_json) restricted to `fields`;
    /// nested records are still written whole.
    pub fn record_to_json_only<'f>(
        &self,
        record: &Record,
        fields: impl IntoIterator<Item = &'f FieldDefinition>,
    ) -> Result<Json, JsonCodecError> {
        Encoder::new(&self.options).record_fields(record, fields)
    }

    pub fn record_to_json_except(
        &self,
        record: &Record,
        except: &[&FieldDefinition],
    ) -> Result<Json, JsonCodecError> {
        let fields = record
            .schema()
            .fields()
            .iter()
            .filter(|f| !except.iter().any(|e| std::ptr::eq(*e, *f)));
        self.record_to_json_only(record, fields)
    }

    pub fn list_to_json(&self, list: &RecordList) -> Result<Json, JsonCodecError> {
        Encoder::new(&self.options).list(list)
    }

    pub fn list_to_string(&self, list: &RecordList) -> Result<String, JsonCodecError> {
        Ok(serde_json::to_string(&self.list_to_json(list)?)?)
    }
}
