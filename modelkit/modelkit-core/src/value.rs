//! Runtime value held in a record slot.

use std::{fmt, sync::Arc};

use crate::{
    enum_type::EnumValue,
    error::ValueTypeError,
    id::{Id, Version},
    record::Record,
    record_list::RecordList,
    timestamp::Timestamp,
};

/// Value stored in one record slot.
/// Every variant is explicit; nothing is coerced between kinds.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    I32(i32),
    I64(i64),
    F64(f64),
    String(Arc<str>),
    Timestamp(Timestamp),
    Bytes(Arc<[u8]>),
    Id(Id),
    Version(Version),
    Bool(bool),
    Enum(EnumValue),
    Record(Record),
    List(RecordList),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Self::Bytes(Arc::from(b.as_ref()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn try_i32(&self) -> Result<Option<i32>, ValueTypeError> {
        match self {
            Value::I32(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("I32")),
        }
    }

    pub fn try_i64(&self) -> Result<Option<i64>, ValueTypeError> {
        match self {
            Value::I64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("I64")),
        }
    }

    pub fn try_f64(&self) -> Result<Option<f64>, ValueTypeError> {
        match self {
            Value::F64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("F64")),
        }
    }

    pub fn try_str(&self) -> Result<Option<&str>, ValueTypeError> {
        match self {
            Value::String(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("String")),
        }
    }

    pub fn try_timestamp(&self) -> Result<Option<Timestamp>, ValueTypeError> {
        match self {
            Value::Timestamp(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Timestamp")),
        }
    }

    pub fn try_bytes(&self) -> Result<Option<&[u8]>, ValueTypeError> {
        match self {
            Value::Bytes(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bytes")),
        }
    }

    pub fn try_id(&self) -> Result<Option<Id>, ValueTypeError> {
        match self {
            Value::Id(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Id")),
        }
    }

    pub fn try_version(&self) -> Result<Option<Version>, ValueTypeError> {
        match self {
            Value::Version(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Version")),
        }
    }

    pub fn try_bool(&self) -> Result<Option<bool>, ValueTypeError> {
        match self {
            Value::Bool(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bool")),
        }
    }

    pub fn try_enum(&self) -> Result<Option<&EnumValue>, ValueTypeError> {
        match self {
            Value::Enum(v) => Ok(Some(v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Enum")),
        }
    }

    pub fn try_record(&self) -> Result<Option<&Record>, ValueTypeError> {
        match self {
            Value::Record(v) => Ok(Some(v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Record")),
        }
    }

    pub fn try_list(&self) -> Result<Option<&RecordList>, ValueTypeError> {
        match self {
            Value::List(v) => Ok(Some(v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("List")),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.variant_name())
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::Bytes(_) => "Bytes",
            Value::Id(_) => "Id",
            Value::Version(_) => "Version",
            Value::Bool(_) => "Bool",
            Value::Enum(_) => "Enum",
            Value::Record(_) => "Record",
            Value::List(_) => "List",
        }
    }

    /// Hashable identity of this value under field equality: scalars by
    /// content, enums by ordinal, records and lists by reference.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::I32(v) => ValueKey::I32(*v),
            Value::I64(v) => ValueKey::I64(*v),
            Value::F64(v) => ValueKey::F64(canonical_bits(*v)),
            Value::String(v) => ValueKey::String(Arc::clone(v)),
            Value::Timestamp(v) => ValueKey::Timestamp(v.millis()),
            Value::Bytes(v) => ValueKey::Bytes(Arc::clone(v)),
            Value::Id(v) => ValueKey::Id(v.value()),
            Value::Version(v) => ValueKey::Version(v.value()),
            Value::Bool(v) => ValueKey::Bool(*v),
            Value::Enum(v) => ValueKey::Enum(Arc::from(v.enum_type().name()), v.ordinal()),
            Value::Record(r) => ValueKey::Ref(r.addr()),
            Value::List(l) => ValueKey::Ref(l.addr()),
        }
    }
}

/// `f64` bit pattern with every NaN folded onto one representative, so that
/// NaN equals NaN and `0.0` differs from `-0.0`.
pub(crate) fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// See [`Value::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    I32(i32),
    I64(i64),
    F64(u64),
    String(Arc<str>),
    Timestamp(i64),
    Bytes(Arc<[u8]>),
    Id(i64),
    Version(i64),
    Bool(bool),
    Enum(Arc<str>, usize),
    Ref(usize),
}

impl ValueKey {
    /// Scalar value this key was taken from; `None` for enum and reference
    /// keys, which do not carry their value.
    pub fn to_scalar(&self) -> Option<Value> {
        Some(match self {
            ValueKey::Null => Value::Null,
            ValueKey::I32(v) => Value::I32(*v),
            ValueKey::I64(v) => Value::I64(*v),
            ValueKey::F64(bits) => Value::F64(f64::from_bits(*bits)),
            ValueKey::String(v) => Value::String(Arc::clone(v)),
            ValueKey::Timestamp(v) => Value::Timestamp(Timestamp::from_millis(*v)),
            ValueKey::Bytes(v) => Value::Bytes(Arc::clone(v)),
            ValueKey::Id(v) => Value::Id(Id::new(*v)),
            ValueKey::Version(v) => Value::Version(Version::new(*v)),
            ValueKey::Bool(v) => Value::Bool(*v),
            ValueKey::Enum(..) | ValueKey::Ref(_) => return None,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::Bytes(v) => f.write_str(&crate::codec::text::to_hex(v)),
            Value::Id(v) => write!(f, "{v}"),
            Value::Version(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Enum(v) => f.write_str(v.name()),
            Value::Record(r) => f.write_str(&r.to_short_string()),
            Value::List(l) => write!(f, "{}[{}]", l.schema().entity_name(), l.len()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    i32 => I32,
    i64 => I64,
    f64 => F64,
    Timestamp => Timestamp,
    Id => Id,
    Version => Version,
    bool => Bool,
    EnumValue => Enum,
    Record => Record,
    RecordList => List,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Arc::from(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Arc::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
