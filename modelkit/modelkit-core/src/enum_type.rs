//! Runtime descriptors for enumerated field types.
//!
//! A Rust enum participates by implementing [`ModelEnum`]. Each case may
//! supply a "special" external value for the binary wire surface and/or for
//! persistence; cases that do not fall back to their ordinal. The runtime
//! form ([`EnumType`] / [`EnumValue`]) is what records actually store.

use std::{
    any::TypeId,
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;

use crate::{
    scalar::ScalarType,
    value::{Value, ValueKey},
};

/// External value a case substitutes for its ordinal, together with the
/// scalar kind it is encoded as.
///
/// Stored in key form so enum descriptors stay `Send + Sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialValue {
    pub target: ScalarType,
    value: ValueKey,
}

impl SpecialValue {
    pub fn new(target: ScalarType, value: impl Into<Value>) -> Self {
        Self {
            target,
            value: value.into().key(),
        }
    }

    /// `None` if a non-scalar value was supplied.
    pub fn value(&self) -> Option<Value> {
        self.value.to_scalar()
    }
}

/// Implemented by Rust enums usable as field types.
pub trait ModelEnum: Copy + Eq + 'static {
    /// Unique name of the enumeration.
    const TYPE_NAME: &'static str;

    /// All cases in declaration order; a case's position is its ordinal.
    fn cases() -> &'static [Self];

    fn name(self) -> &'static str;

    /// Override for the binary wire code. `None` means "use the ordinal".
    fn wire_value(self) -> Option<i32> {
        None
    }

    /// Override for the persisted value. `None` means "use the ordinal".
    fn persistent_value(self) -> Option<SpecialValue> {
        None
    }

    fn ordinal(self) -> usize {
        Self::cases()
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }

    /// Built on first use and shared afterwards.
    fn enum_type() -> EnumType {
        descriptor_of::<Self>()
    }
}

fn describe<E: ModelEnum>() -> EnumType {
    EnumType::new(
        E::TYPE_NAME,
        E::cases()
            .iter()
            .map(|c| EnumCase {
                name: c.name().to_string(),
                wire: c.wire_value(),
                persistent: c.persistent_value(),
            })
            .collect(),
    )
}

/// One descriptor per Rust enum type for the whole process.
fn descriptor_of<E: ModelEnum>() -> EnumType {
    static DESCRIPTORS: OnceLock<RwLock<HashMap<TypeId, EnumType>>> = OnceLock::new();
    let descriptors = DESCRIPTORS.get_or_init(Default::default);
    let id = TypeId::of::<E>();
    let cached = descriptors.read().get(&id).cloned();
    if let Some(ty) = cached {
        return ty;
    }
    let built = describe::<E>();
    descriptors.write().entry(id).or_insert(built).clone()
}

/// One case of an [`EnumType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCase {
    pub name: String,
    pub wire: Option<i32>,
    pub persistent: Option<SpecialValue>,
}

impl EnumCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wire: None,
            persistent: None,
        }
    }

    pub fn with_wire(mut self, code: i32) -> Self {
        self.wire = Some(code);
        self
    }

    pub fn with_persistent(mut self, value: SpecialValue) -> Self {
        self.persistent = Some(value);
        self
    }
}

struct EnumTypeInner {
    name: String,
    cases: Vec<EnumCase>,
}

/// Shared, immutable description of an enumeration.
#[derive(Clone)]
pub struct EnumType(Arc<EnumTypeInner>);

impl EnumType {
    pub fn new(name: impl Into<String>, cases: Vec<EnumCase>) -> Self {
        Self(Arc::new(EnumTypeInner {
            name: name.into(),
            cases,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn cases(&self) -> &[EnumCase] {
        &self.0.cases
    }

    pub fn len(&self) -> usize {
        self.0.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.cases.is_empty()
    }

    pub fn value(&self, ordinal: usize) -> Option<EnumValue> {
        (ordinal < self.len()).then(|| EnumValue {
            enum_type: self.clone(),
            ordinal,
        })
    }

    pub fn ptr_eq(&self, other: &EnumType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn value_by_name(&self, name: &str) -> Option<EnumValue> {
        self.0
            .cases
            .iter()
            .position(|c| c.name == name)
            .and_then(|ordinal| self.value(ordinal))
    }
}

/// Same descriptor, or the same name with identical cases.
impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.0.name == other.0.name && self.0.cases == other.0.cases)
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.0.name)
            .field("cases", &self.0.cases.len())
            .finish()
    }
}

/// One case of an enumeration, as stored in a record slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    enum_type: EnumType,
    ordinal: usize,
}

impl EnumValue {
    pub fn of<E: ModelEnum>(case: E) -> Self {
        Self {
            enum_type: E::enum_type(),
            ordinal: case.ordinal(),
        }
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.enum_type.cases()[self.ordinal].name
    }

    /// Convert back to the Rust enum it was created from.
    pub fn to<E: ModelEnum>(&self) -> Option<E> {
        if self.enum_type.name() != E::TYPE_NAME {
            return None;
        }
        E::cases().get(self.ordinal).copied()
    }
}

/// Two-state enumeration used where a boolean must be stored as an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanEnum {
    False,
    True,
}

impl BooleanEnum {
    pub fn from_option(value: Option<bool>) -> Self {
        if value.unwrap_or(false) {
            Self::True
        } else {
            Self::False
        }
    }

    pub fn get(self) -> bool {
        self == Self::True
    }

    pub fn to_int(self) -> i32 {
        i32::from(self.get())
    }
}

impl ModelEnum for BooleanEnum {
    const TYPE_NAME: &'static str = "BooleanEnum";

    fn cases() -> &'static [Self] {
        &[Self::False, Self::True]
    }

    fn name(self) -> &'static str {
        match self {
            Self::False => "FALSE",
            Self::True => "TRUE",
        }
    }
}
