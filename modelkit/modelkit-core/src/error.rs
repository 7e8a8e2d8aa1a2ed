//! Error types for schema registration, value assignment and codecs.

use std::fmt;

/// Identifies which codec surface produced a [`ModelError::Codec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Binary,
    Text,
    Relational,
    Display,
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecKind::Binary => "binary",
            CodecKind::Text => "text",
            CodecKind::Relational => "relational",
            CodecKind::Display => "display",
        })
    }
}

/// Returned by the typed accessors on [`Value`](crate::Value) when the
/// runtime variant is not the requested one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueTypeError {
    pub expected: String,
    pub found: &'static str,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, found: &'static str) -> Self {
        Self {
            expected: expected.into(),
            found,
        }
    }
}

/// Error returned by every fallible operation of the record engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Schema or enum registration is inconsistent (duplicate name, mixed
    /// enum mode, misplaced index, ...). Raised before any record exists.
    #[error("invalid definition of '{schema}': {detail}")]
    SchemaDefinition { schema: String, detail: String },

    /// A value does not satisfy the shape contract of its field type.
    #[error("type mismatch for {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    /// Lookup of a field name that the schema does not declare.
    #[error("unknown field '{name}' in '{schema}'")]
    UnknownField { schema: String, name: String },

    /// Malformed input or unencodable value for one codec.
    #[error("{codec} codec: {detail}")]
    Codec { codec: CodecKind, detail: String },

    /// A broken internal contract. Never caused by caller input.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl ModelError {
    pub fn schema_definition(schema: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaDefinition {
            schema: schema.into(),
            detail: detail.into(),
        }
    }

    pub fn type_mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn codec(codec: CodecKind, detail: impl Into<String>) -> Self {
        Self::Codec {
            codec,
            detail: detail.into(),
        }
    }

    /// Re-labels a type mismatch with the field it occurred in. Other
    /// variants pass through.
    #[must_use]
    pub fn in_context(self, context: impl Into<String>) -> Self {
        match self {
            Self::TypeMismatch {
                expected, found, ..
            } => Self::TypeMismatch {
                context: context.into(),
                expected,
                found,
            },
            other => other,
        }
    }
}

impl From<ValueTypeError> for ModelError {
    fn from(value: ValueTypeError) -> Self {
        Self::TypeMismatch {
            context: "value".to_string(),
            expected: value.expected,
            found: value.found.to_string(),
        }
    }
}
