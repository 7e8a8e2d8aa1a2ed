//! Bidirectional case <-> external value mapping for one enumeration.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    enum_type::{EnumType, EnumValue, SpecialValue},
    error::ModelError,
    scalar::ScalarType,
    value::{Value, ValueKey},
};

/// Which per-case override an [`EnumCodec`] honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRule {
    /// Binary wire codes (`EnumCase::wire`), always 32-bit integers.
    Wire,
    /// Persisted values (`EnumCase::persistent`) with their declared kind.
    Persistent,
}

/// Whether the external values come from the cases or from ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCodecMode {
    Ordinal,
    Special,
}

/// Immutable lookup tables built once per enumeration and rule.
#[derive(Debug, Clone)]
pub struct EnumCodec {
    enum_type: EnumType,
    mode: EnumCodecMode,
    target: ScalarType,
    to_external: Vec<Option<ValueKey>>,
    to_case: HashMap<ValueKey, usize>,
}

impl EnumCodec {
    /// Fails when the cases disagree on special-vs-ordinal mode or on the
    /// target kind, or when two cases map to the same external value.
    pub fn build(enum_type: &EnumType, rule: SpecialRule) -> Result<Self, ModelError> {
        let mut mode = None;
        let mut target = ScalarType::I32;
        let mut to_external = Vec::with_capacity(enum_type.len());
        let mut to_case = HashMap::with_capacity(enum_type.len());

        for (ordinal, case) in enum_type.cases().iter().enumerate() {
            let special = match rule {
                SpecialRule::Wire => case.wire.map(|code| SpecialValue::new(ScalarType::I32, code)),
                SpecialRule::Persistent => case.persistent.clone(),
            };
            let case_mode = if special.is_some() {
                EnumCodecMode::Special
            } else {
                EnumCodecMode::Ordinal
            };
            match mode {
                None => {
                    mode = Some(case_mode);
                    if let Some(s) = &special {
                        target = s.target;
                    }
                }
                Some(m) if m != case_mode => {
                    return Err(ModelError::schema_definition(
                        enum_type.name(),
                        format!("case '{}' mixes special and ordinal values", case.name),
                    ));
                }
                Some(_) => {}
            }

            let external = match special {
                Some(s) => {
                    if s.target != target {
                        return Err(ModelError::schema_definition(
                            enum_type.name(),
                            format!(
                                "case '{}' targets {:?}, other cases target {:?}",
                                case.name, s.target, target
                            ),
                        ));
                    }
                    let value = s.value().ok_or_else(|| {
                        ModelError::schema_definition(
                            enum_type.name(),
                            format!("case '{}' has a non-scalar special value", case.name),
                        )
                    })?;
                    target.check(&value).map_err(|e| {
                        ModelError::schema_definition(
                            enum_type.name(),
                            format!("case '{}': {e}", case.name),
                        )
                    })?;
                    value
                }
                None => Value::I32(ordinal as i32),
            };

            if external.is_null() {
                to_external.push(None);
                continue;
            }
            let key = external.key();
            if to_case.insert(key.clone(), ordinal).is_some() {
                return Err(ModelError::schema_definition(
                    enum_type.name(),
                    format!("duplicate external value {external} on case '{}'", case.name),
                ));
            }
            to_external.push(Some(key));
        }

        let mode = mode.unwrap_or(EnumCodecMode::Ordinal);
        debug!(
            enum_type = enum_type.name(),
            ?rule,
            ?mode,
            ?target,
            "enum codec built"
        );
        Ok(Self {
            enum_type: enum_type.clone(),
            mode,
            target,
            to_external,
            to_case,
        })
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    pub fn mode(&self) -> EnumCodecMode {
        self.mode
    }

    /// Scalar kind the external values are encoded as.
    pub fn target(&self) -> ScalarType {
        self.target
    }

    /// `None` for a case whose special value is absent, or for a value of
    /// another enumeration.
    pub fn to_external(&self, case: &EnumValue) -> Option<Value> {
        if *case.enum_type() != self.enum_type {
            return None;
        }
        self.to_external.get(case.ordinal())?.as_ref()?.to_scalar()
    }

    pub fn to_case(&self, external: &Value) -> Option<EnumValue> {
        let ordinal = *self.to_case.get(&external.key())?;
        self.enum_type.value(ordinal)
    }
}
