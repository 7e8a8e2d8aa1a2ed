//! Shape contract of one field: scalar, enum, nested record or nested list.

use std::{cmp::Ordering, fmt, sync::Arc};

use crate::{
    codec::{
        binary::{WireReader, WireWriter},
        relational::{ColumnSource, ParameterSink},
        text::{TextOptions, is_null_literal},
    },
    enum_codec::{EnumCodec, SpecialRule},
    enum_type::{EnumType, ModelEnum},
    error::{CodecKind, ModelError},
    scalar::{ScalarType, ZeroSubstitution, null_first},
    schema::SchemaRef,
    value::Value,
};

/// An enumeration together with its two external mappings, which may
/// diverge for the same case.
#[derive(Debug)]
pub struct EnumField {
    enum_type: EnumType,
    wire: EnumCodec,
    persistent: EnumCodec,
}

impl EnumField {
    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    /// Mapping used by the binary wire codec and the JSON codec.
    pub fn wire(&self) -> &EnumCodec {
        &self.wire
    }

    /// Mapping used by the relational and text codecs.
    pub fn persistent(&self) -> &EnumCodec {
        &self.persistent
    }
}

#[derive(Clone)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum(Arc<EnumField>),
    Record(SchemaRef),
    List(SchemaRef),
}

impl FieldType {
    pub const fn scalar(kind: ScalarType) -> Self {
        Self::Scalar(kind)
    }

    /// Builds both enum mappings; fails if either is inconsistent.
    pub fn enumeration(enum_type: &EnumType) -> Result<Self, ModelError> {
        Ok(Self::Enum(Arc::new(EnumField {
            enum_type: enum_type.clone(),
            wire: EnumCodec::build(enum_type, SpecialRule::Wire)?,
            persistent: EnumCodec::build(enum_type, SpecialRule::Persistent)?,
        })))
    }

    pub fn enum_of<E: ModelEnum>() -> Result<Self, ModelError> {
        Self::enumeration(&E::enum_type())
    }

    pub fn record(schema: &SchemaRef) -> Self {
        Self::Record(Arc::clone(schema))
    }

    pub fn list(schema: &SchemaRef) -> Self {
        Self::List(Arc::clone(schema))
    }

    /// Nested records and lists are graph edges: never persisted and walked
    /// by the graph copier. Scalars and enums are immutable values.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Record(_) | Self::List(_))
    }

    /// Kind this field binds as in the relational surface. `None` for
    /// nested fields.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Enum(e) => Some(e.persistent.target()),
            Self::Record(_) | Self::List(_) => None,
        }
    }

    pub fn nested_schema(&self) -> Option<&SchemaRef> {
        match self {
            Self::Record(s) | Self::List(s) => Some(s),
            Self::Scalar(_) | Self::Enum(_) => None,
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.type_name().to_string(),
            Self::Enum(e) => format!("enum {}", e.enum_type.name()),
            Self::Record(s) => format!("record {}", s.entity_name()),
            Self::List(s) => format!("list<{}>", s.entity_name()),
        }
    }

    /// `Null` always passes.
    pub fn check(&self, value: &Value) -> Result<(), ModelError> {
        if value.is_null() {
            return Ok(());
        }
        let ok = match (self, value) {
            (Self::Scalar(kind), _) => return kind.check(value).map_err(ModelError::from),
            (Self::Enum(e), Value::Enum(v)) => *v.enum_type() == e.enum_type,
            (Self::Record(s), Value::Record(r)) => Arc::ptr_eq(s, r.schema()),
            (Self::List(s), Value::List(l)) => Arc::ptr_eq(s, l.schema()),
            _ => false,
        };
        if ok {
            return Ok(());
        }
        Err(ModelError::type_mismatch(
            "value",
            self.type_name(),
            describe(value),
        ))
    }

    /// Null-safe equality: scalars by content, enums by case, nested values
    /// by identity.
    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a.is_null(), b.is_null()) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }
        match (self, a, b) {
            (Self::Scalar(kind), _, _) => kind.equals(a, b),
            (Self::Enum(_), Value::Enum(a), Value::Enum(b)) => a == b,
            (Self::Record(_), Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Self::List(_), Value::List(a), Value::List(b)) => {
                a.ptr_eq(b) || {
                    let (a, b) = (a.records(), b.records());
                    a.len() == b.len() && a.iter().zip(&b).all(|(x, y)| x.ptr_eq(y))
                }
            }
            _ => false,
        }
    }

    /// Consistent with [`equals`](Self::equals); `Null` hashes to 0.
    pub fn hash(&self, value: &Value) -> i32 {
        match (self, value) {
            (_, Value::Null) => 0,
            (Self::Scalar(kind), _) => kind.hash(value),
            (Self::Enum(_), Value::Enum(v)) => v.ordinal() as i32,
            (Self::Record(_), Value::Record(r)) => hash_addr(r.addr()),
            (Self::List(_), Value::List(l)) => l
                .records()
                .iter()
                .fold(1i32, |h, r| h.wrapping_mul(31).wrapping_add(hash_addr(r.addr()))),
            _ => 0,
        }
    }

    /// Null sorts first; enums by ordinal; nested values are unordered.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        if let Some(o) = null_first(a, b) {
            return o;
        }
        match (self, a, b) {
            (Self::Scalar(kind), _, _) => kind.compare_native(a, b),
            (Self::Enum(_), Value::Enum(a), Value::Enum(b)) => a.ordinal().cmp(&b.ordinal()),
            _ => Ordering::Equal,
        }
    }

    /// Like [`compare`](Self::compare) but with the user-facing scalar order
    /// (case-insensitive text).
    pub fn compare_for_display(&self, a: &Value, b: &Value) -> Ordering {
        match self {
            Self::Scalar(kind) => kind.compare_for_display(a, b),
            _ => self.compare(a, b),
        }
    }

    pub fn to_display_string(&self, value: &Value, full: bool, options: &TextOptions) -> String {
        match (self, value) {
            (_, Value::Null) => "null".to_string(),
            (Self::Scalar(kind), _) => kind.to_display_string(value, full, options),
            (Self::Enum(_), Value::Enum(v)) => v.name().to_string(),
            (Self::Record(_), Value::Record(r)) => r.to_short_string(),
            _ => value.to_string(),
        }
    }

    /// Inverse of [`to_display_string`](Self::to_display_string). Enums parse
    /// by case name; nested fields cannot be parsed.
    pub fn parse(&self, text: &str, options: &TextOptions) -> Result<Value, ModelError> {
        match self {
            Self::Scalar(kind) => kind.parse(text, options),
            Self::Enum(e) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                e.enum_type
                    .value_by_name(text)
                    .map(Value::Enum)
                    .ok_or_else(|| {
                        ModelError::codec(
                            CodecKind::Display,
                            format!("no case {text:?} in {}", e.enum_type.name()),
                        )
                    })
            }
            Self::Record(_) | Self::List(_) => Err(self.unsupported(CodecKind::Display)),
        }
    }

    pub fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError> {
        match self {
            Self::Scalar(kind) => kind.codec().encode_binary(out, value),
            Self::Enum(e) => {
                let code = match value.try_enum()? {
                    Some(v) => match e.wire.to_external(v) {
                        Some(external) => external.try_i32()?.unwrap_or(0),
                        None => 0,
                    },
                    None => 0,
                };
                out.put_i32(code);
                Ok(())
            }
            Self::Record(_) => out.write_nested_record(value.try_record()?),
            Self::List(_) => out.write_nested_list(value.try_list()?),
        }
    }

    /// Enum codes without a case decode to null, as does `0` under
    /// [`ZeroSubstitution::Fold`].
    pub fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError> {
        match self {
            Self::Scalar(kind) => kind.codec().decode_binary(input, substitution),
            Self::Enum(e) => {
                let code = input.get_i32()?;
                if code == 0 && substitution.folds_plain() {
                    return Ok(Value::Null);
                }
                Ok(e.wire.to_case(&Value::I32(code)).into())
            }
            Self::Record(s) => Ok(input.read_nested_record(s)?.into()),
            Self::List(s) => Ok(input.read_nested_list(s)?.into()),
        }
    }

    pub fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError> {
        match self {
            Self::Scalar(kind) => kind.codec().encode_relational(sink, index, value),
            Self::Enum(e) => {
                let target = e.persistent.target();
                let external = match value.try_enum()? {
                    Some(v) => e.persistent.to_external(v).unwrap_or_default(),
                    None => Value::Null,
                };
                target.codec().encode_relational(sink, index, &external)
            }
            Self::Record(_) | Self::List(_) => Err(self.unsupported(CodecKind::Relational)),
        }
    }

    pub fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError> {
        match self {
            Self::Scalar(kind) => kind.codec().decode_relational(source, index),
            Self::Enum(e) => {
                let external = e.persistent.target().codec().decode_relational(source, index)?;
                self.persisted_to_case(e, external, CodecKind::Relational)
            }
            Self::Record(_) | Self::List(_) => Err(self.unsupported(CodecKind::Relational)),
        }
    }

    pub fn encode_text(&self, value: &Value, options: &TextOptions) -> Result<String, ModelError> {
        match self {
            Self::Scalar(kind) => kind.codec().encode_text(value, options),
            Self::Enum(e) => {
                let external = match value.try_enum()? {
                    Some(v) => e.persistent.to_external(v).unwrap_or_default(),
                    None => Value::Null,
                };
                e.persistent.target().codec().encode_text(&external, options)
            }
            Self::Record(_) | Self::List(_) => Err(self.unsupported(CodecKind::Text)),
        }
    }

    pub fn decode_text(&self, literal: &str, options: &TextOptions) -> Result<Value, ModelError> {
        match self {
            Self::Scalar(kind) => kind.codec().decode_text(literal, options),
            Self::Enum(e) => {
                if is_null_literal(literal) {
                    return Ok(Value::Null);
                }
                let external = e.persistent.target().codec().decode_text(literal, options)?;
                self.persisted_to_case(e, external, CodecKind::Text)
            }
            Self::Record(_) | Self::List(_) => Err(self.unsupported(CodecKind::Text)),
        }
    }

    fn persisted_to_case(
        &self,
        e: &EnumField,
        external: Value,
        codec: CodecKind,
    ) -> Result<Value, ModelError> {
        if external.is_null() {
            return Ok(Value::Null);
        }
        e.persistent
            .to_case(&external)
            .map(Value::Enum)
            .ok_or_else(|| {
                ModelError::codec(
                    codec,
                    format!("{external} is not a persisted value of {}", e.enum_type.name()),
                )
            })
    }

    fn unsupported(&self, codec: CodecKind) -> ModelError {
        ModelError::codec(codec, format!("{} fields have no {codec} form", self.type_name()))
    }
}

fn hash_addr(addr: usize) -> i32 {
    let v = addr as u64;
    (v ^ (v >> 32)) as i32
}

fn describe(value: &Value) -> String {
    match value {
        Value::Enum(v) => format!("enum {}", v.enum_type().name()),
        Value::Record(r) => format!("record {}", r.schema().entity_name()),
        Value::List(l) => format!("list<{}>", l.schema().entity_name()),
        other => other.variant_name().to_string(),
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

impl From<ScalarType> for FieldType {
    fn from(kind: ScalarType) -> Self {
        Self::Scalar(kind)
    }
}
