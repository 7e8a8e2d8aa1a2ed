//! Closed set of primitive kinds and their per-kind codec logic.
//!
//! Every kind is implemented once as a [`ScalarCodec`]; [`ScalarType::codec`]
//! is the only place that switches over the kinds.

mod numeric;
mod textual;

use std::cmp::Ordering;

use crate::{
    codec::{
        binary::{WireReader, WireWriter},
        relational::{ColumnSource, ParameterSink, SqlType},
        text::TextOptions,
    },
    error::{ModelError, ValueTypeError},
    value::Value,
};

/// Text and binary values longer than this are truncated in display strings
/// unless the full rendering is requested.
pub const DISPLAY_LIMIT: usize = 0x1000;

/// Primitive value kind of a field.
///
/// Variant names mirror [`Value`] (values <-> kinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    I32,
    I64,
    F64,
    String,
    Timestamp,
    Bytes,
    Id,
    Version,
    Bool,
}

/// How an encoded zero is read back from the binary wire.
///
/// | kind                    | `Default` | `Fold` | `Verbatim` |
/// |-------------------------|-----------|--------|------------|
/// | I32, I64, F64           | zero      | null   | zero       |
/// | Timestamp               | epoch     | null   | epoch      |
/// | Id, Version             | null      | null   | zero       |
///
/// A null timestamp is written as zero, and under `Fold` a NaN also reads
/// back as null; strings, bytes and bools carry an explicit null marker and
/// ignore the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZeroSubstitution {
    #[default]
    Default,
    Fold,
    Verbatim,
}

impl ZeroSubstitution {
    pub(crate) fn folds_plain(self) -> bool {
        self == Self::Fold
    }

    pub(crate) fn folds_identity(self) -> bool {
        self != Self::Verbatim
    }
}

/// Per-kind capability set. Callers go through [`ScalarType`], which handles
/// `Null` before dispatching; implementations only see `Null` in the binary
/// and relational encoders, where absence has a kind-specific encoding.
pub trait ScalarCodec: Send + Sync {
    fn kind(&self) -> ScalarType;

    fn check(&self, value: &Value) -> Result<(), ValueTypeError>;

    fn equals(&self, a: &Value, b: &Value) -> bool;

    fn hash(&self, value: &Value) -> i32;

    fn compare_native(&self, a: &Value, b: &Value) -> Ordering;

    fn compare_for_display(&self, a: &Value, b: &Value) -> Ordering {
        self.compare_native(a, b)
    }

    fn to_display_string(&self, value: &Value, full: bool, options: &TextOptions) -> String;

    fn parse(&self, text: &str, options: &TextOptions) -> Result<Value, ModelError>;

    fn encode_binary(&self, out: &mut WireWriter, value: &Value) -> Result<(), ModelError>;

    fn decode_binary(
        &self,
        input: &mut WireReader,
        substitution: ZeroSubstitution,
    ) -> Result<Value, ModelError>;

    fn sql_type(&self) -> SqlType;

    fn encode_relational(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
    ) -> Result<(), ModelError>;

    fn decode_relational(
        &self,
        source: &mut dyn ColumnSource,
        index: usize,
    ) -> Result<Value, ModelError>;

    fn encode_text(&self, value: &Value, options: &TextOptions) -> Result<String, ModelError>;

    fn decode_text(&self, literal: &str, options: &TextOptions) -> Result<Value, ModelError>;
}

impl ScalarType {
    pub const ALL: [ScalarType; 9] = [
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::F64,
        ScalarType::String,
        ScalarType::Timestamp,
        ScalarType::Bytes,
        ScalarType::Id,
        ScalarType::Version,
        ScalarType::Bool,
    ];

    pub fn codec(self) -> &'static dyn ScalarCodec {
        match self {
            ScalarType::I32 => &numeric::I32Codec,
            ScalarType::I64 => &numeric::I64Codec,
            ScalarType::F64 => &numeric::F64Codec,
            ScalarType::String => &textual::StringCodec,
            ScalarType::Timestamp => &textual::TimestampCodec,
            ScalarType::Bytes => &textual::BytesCodec,
            ScalarType::Id => &numeric::IdCodec,
            ScalarType::Version => &numeric::VersionCodec,
            ScalarType::Bool => &numeric::BoolCodec,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::F64 => "f64",
            ScalarType::String => "string",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Bytes => "bytes",
            ScalarType::Id => "id",
            ScalarType::Version => "version",
            ScalarType::Bool => "bool",
        }
    }

    /// `Null` always passes; presence is not part of the kind contract.
    pub fn check(self, value: &Value) -> Result<(), ValueTypeError> {
        if value.is_null() {
            return Ok(());
        }
        self.codec().check(value)
    }

    pub fn equals(self, a: &Value, b: &Value) -> bool {
        match (a.is_null(), b.is_null()) {
            (true, true) => true,
            (false, false) => self.codec().equals(a, b),
            _ => false,
        }
    }

    /// Hash consistent with [`equals`](Self::equals); `Null` hashes to 0.
    pub fn hash(self, value: &Value) -> i32 {
        if value.is_null() {
            return 0;
        }
        self.codec().hash(value)
    }

    pub fn compare_native(self, a: &Value, b: &Value) -> Ordering {
        null_first(a, b).unwrap_or_else(|| self.codec().compare_native(a, b))
    }

    pub fn compare_for_display(self, a: &Value, b: &Value) -> Ordering {
        null_first(a, b).unwrap_or_else(|| self.codec().compare_for_display(a, b))
    }

    pub fn to_display_string(self, value: &Value, full: bool, options: &TextOptions) -> String {
        if value.is_null() {
            return "null".to_string();
        }
        self.codec().to_display_string(value, full, options)
    }

    pub fn parse(self, text: &str, options: &TextOptions) -> Result<Value, ModelError> {
        self.codec().parse(text, options)
    }

    pub fn sql_type(self) -> SqlType {
        self.codec().sql_type()
    }
}

/// Null sorts before any value. `None` when both sides are non-null.
pub(crate) fn null_first(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.is_null(), b.is_null()) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (false, false) => None,
    }
}

/// Ordering between values that failed the kind check on at least one side.
fn mismatch_order(a: &Value, b: &Value) -> Ordering {
    a.variant_name().cmp(b.variant_name())
}

fn parse_error(kind: ScalarType, text: &str, detail: impl std::fmt::Display) -> ModelError {
    ModelError::codec(
        crate::error::CodecKind::Display,
        format!("cannot parse {:?} as {}: {detail}", text, kind.type_name()),
    )
}

fn literal_error(kind: ScalarType, literal: &str, detail: impl std::fmt::Display) -> ModelError {
    ModelError::codec(
        crate::error::CodecKind::Text,
        format!(
            "invalid {} literal {:?}: {detail}",
            kind.type_name(),
            literal
        ),
    )
}
