use std::{cmp::Ordering, fmt};

use crate::{
    error::ModelError,
    field::{
        FieldType,
        syntax::{Syntax, SyntaxSet},
    },
    scalar::ZeroSubstitution,
    value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimaryKeyRole {
    #[default]
    None,
    PartOfKey,
}

/// Registration request for one field, consumed by
/// [`SchemaBuilder::create_field`](crate::SchemaBuilder::create_field).
///
/// Defaults: persisted unless nested, column named after the field, visible
/// to every syntax, [`ZeroSubstitution::Default`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) persisted: Option<bool>,
    pub(crate) column: Option<String>,
    pub(crate) syntaxes: SyntaxSet,
    pub(crate) substitution: ZeroSubstitution,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            persisted: None,
            column: None,
            syntaxes: SyntaxSet::ALL,
            substitution: ZeroSubstitution::Default,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn persisted(mut self, persisted: bool) -> Self {
        self.persisted = Some(persisted);
        self
    }

    pub fn transient(self) -> Self {
        self.persisted(false)
    }

    pub fn syntaxes(mut self, syntaxes: SyntaxSet) -> Self {
        self.syntaxes = syntaxes;
        self
    }

    pub fn hidden_from(mut self, syntax: Syntax) -> Self {
        self.syntaxes = self.syntaxes.without(syntax);
        self
    }

    pub fn substitution(mut self, substitution: ZeroSubstitution) -> Self {
        self.substitution = substitution;
        self
    }
}

/// One named, indexed field of a schema. Immutable once registered, apart
/// from the primary-key role which the builder may set before `finish`.
#[derive(Clone)]
pub struct FieldDefinition {
    schema_id: u64,
    index: usize,
    name: String,
    field_type: FieldType,
    persisted: bool,
    column: String,
    primary_key: PrimaryKeyRole,
    syntaxes: SyntaxSet,
    substitution: ZeroSubstitution,
}

impl FieldDefinition {
    pub(crate) fn from_spec(
        schema_id: u64,
        entity: &str,
        index: usize,
        spec: FieldSpec,
    ) -> Result<Self, ModelError> {
        let nested = spec.field_type.is_mutable();
        if nested && spec.persisted == Some(true) {
            return Err(ModelError::schema_definition(
                entity,
                format!(
                    "field '{}' of type {} cannot be persisted",
                    spec.name,
                    spec.field_type.type_name()
                ),
            ));
        }
        let column = spec.column.unwrap_or_else(|| spec.name.clone());
        Ok(Self {
            schema_id,
            index,
            persisted: spec.persisted.unwrap_or(!nested),
            name: spec.name,
            field_type: spec.field_type,
            column,
            primary_key: PrimaryKeyRole::None,
            syntaxes: spec.syntaxes,
            substitution: spec.substitution,
        })
    }

    pub(crate) fn set_primary_key_role(&mut self, role: PrimaryKeyRole) {
        self.primary_key = role;
    }

    pub(crate) fn schema_id(&self) -> u64 {
        self.schema_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Storage column name; defaults to the field name.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn primary_key(&self) -> PrimaryKeyRole {
        self.primary_key
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key == PrimaryKeyRole::PartOfKey
    }

    pub fn syntaxes(&self) -> SyntaxSet {
        self.syntaxes
    }

    pub fn is_visible(&self, syntax: Syntax) -> bool {
        self.syntaxes.contains(syntax)
    }

    pub fn substitution(&self) -> ZeroSubstitution {
        self.substitution
    }

    pub fn equals_value(&self, a: &Value, b: &Value) -> bool {
        self.field_type.equals(a, b)
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.field_type.compare(a, b)
    }

    pub fn compare_for_display(&self, a: &Value, b: &Value) -> Ordering {
        self.field_type.compare_for_display(a, b)
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("type", &self.field_type)
            .field("persisted", &self.persisted)
            .field("column", &self.column)
            .field("primary_key", &self.primary_key)
            .field("syntaxes", &self.syntaxes)
            .field("substitution", &self.substitution)
            .finish()
    }
}
