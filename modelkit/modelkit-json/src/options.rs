use std::collections::HashMap;

use modelkit_core::ScalarType;

/// How null field values are written.
///
/// By default a null field is left out of the object. A substitution gives
/// the JSON value written instead for every null field of that scalar kind;
/// `include_nulls` writes an explicit `null` for the remaining ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonOptions {
    pub null_substitutions: HashMap<ScalarType, serde_json::Value>,
    pub include_nulls: bool,
}

impl JsonOptions {
    pub fn with_null_substitution(
        mut self,
        kind: ScalarType,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.null_substitutions.insert(kind, value.into());
        self
    }

    pub fn with_include_nulls(mut self, include_nulls: bool) -> Self {
        self.include_nulls = include_nulls;
        self
    }

    pub(crate) fn null_for(&self, kind: Option<ScalarType>) -> Option<serde_json::Value> {
        kind.and_then(|k| self.null_substitutions.get(&k).cloned())
            .or_else(|| self.include_nulls.then_some(serde_json::Value::Null))
    }
}
