//! Entity schemas: ordered field layout, lookups and record factories.
//!
//! A schema is declared first and finished once through a
//! [`SchemaBuilder`]. The two phases let schemas reference themselves or each
//! other through nested record/list fields. Until `finish` succeeds a schema
//! has no fields and refuses to create records or lists; afterwards it is
//! immutable and freely shareable across threads.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::debug;

use crate::{
    error::ModelError,
    field::{FieldDefinition, FieldSpec, PrimaryKeyRole, syntax::Syntax},
    record::Record,
    record_list::RecordList,
};

pub type SchemaRef = Arc<SchemaDefinition>;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Default)]
struct Layout {
    fields: Vec<FieldDefinition>,
    by_name: HashMap<String, usize>,
    persisted: Vec<usize>,
    primary_key: Vec<usize>,
}

pub struct SchemaDefinition {
    id: u64,
    entity: String,
    location: Option<String>,
    layout: OnceLock<Layout>,
}

impl SchemaDefinition {
    pub fn declare(entity: impl Into<String>) -> SchemaRef {
        Self::declare_in(entity, None::<String>)
    }

    /// `location` names the storage table/collection; defaults to the entity.
    pub fn declare_in(entity: impl Into<String>, location: Option<impl Into<String>>) -> SchemaRef {
        Arc::new(Self {
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
            entity: entity.into(),
            location: location.map(Into::into),
            layout: OnceLock::new(),
        })
    }

    pub fn builder(self: &Arc<Self>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Arc::clone(self),
            layout: Layout::default(),
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or(&self.entity)
    }

    pub fn is_finished(&self) -> bool {
        self.layout.get().is_some()
    }

    fn layout(&self) -> &Layout {
        static EMPTY: OnceLock<Layout> = OnceLock::new();
        self.layout
            .get()
            .unwrap_or_else(|| EMPTY.get_or_init(Layout::default))
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.layout().fields
    }

    pub fn field_count(&self) -> usize {
        self.layout().fields.len()
    }

    /// Fails with [`ModelError::UnknownField`] when absent.
    pub fn field(&self, name: &str) -> Result<&FieldDefinition, ModelError> {
        self.find_field(name)
            .ok_or_else(|| ModelError::UnknownField {
                schema: self.entity.clone(),
                name: name.to_string(),
            })
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDefinition> {
        let layout = self.layout();
        layout.by_name.get(name).map(|&i| &layout.fields[i])
    }

    /// Direct positional access.
    ///
    /// # Panics
    ///
    /// If `index` is not a field index of this schema.
    pub fn field_at(&self, index: usize) -> &FieldDefinition {
        &self.layout().fields[index]
    }

    pub fn persisted_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        let layout = self.layout();
        layout.persisted.iter().map(|&i| &layout.fields[i])
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &FieldDefinition> {
        let layout = self.layout();
        layout.primary_key.iter().map(|&i| &layout.fields[i])
    }

    pub fn has_primary_key(&self) -> bool {
        !self.layout().primary_key.is_empty()
    }

    /// Fields visible to `syntax`, in schema order.
    pub fn fields_for(&self, syntax: Syntax) -> impl Iterator<Item = &FieldDefinition> {
        self.fields().iter().filter(move |f| f.is_visible(syntax))
    }

    pub fn hidden_fields(&self, syntax: Syntax) -> impl Iterator<Item = &FieldDefinition> {
        self.fields().iter().filter(move |f| !f.is_visible(syntax))
    }

    pub(crate) fn owns(&self, field: &FieldDefinition) -> bool {
        field.schema_id() == self.id
    }

    fn require_finished(&self) -> Result<&Layout, ModelError> {
        self.layout.get().ok_or_else(|| {
            ModelError::schema_definition(&self.entity, "schema is not finished")
        })
    }

    /// New record with every slot null. Fails until the schema is finished,
    /// so the slot count and the primary key are fixed before the first
    /// record exists.
    pub fn create_record(self: &Arc<Self>) -> Result<Record, ModelError> {
        let slots = self.require_finished()?.fields.len();
        Ok(Record::new(Arc::clone(self), slots))
    }

    /// Fails until the schema is finished.
    pub fn create_list(self: &Arc<Self>) -> Result<RecordList, ModelError> {
        self.require_finished()?;
        Ok(RecordList::new(Arc::clone(self)))
    }

    /// Fails until the schema is finished, and with a type mismatch on the
    /// first record of another schema.
    pub fn create_list_from(
        self: &Arc<Self>,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<RecordList, ModelError> {
        let list = self.create_list()?;
        for record in records {
            list.push(record)?;
        }
        Ok(list)
    }
}

impl fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("entity", &self.entity)
            .field("location", &self.location())
            .field("fields", &self.fields())
            .finish()
    }
}

/// Registration phase of one schema. Field order is append-only and fixes
/// the positional layout.
pub struct SchemaBuilder {
    schema: SchemaRef,
    layout: Layout,
}

impl SchemaBuilder {
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Appends a field at the next index and returns that index.
    pub fn create_field(&mut self, spec: FieldSpec) -> Result<usize, ModelError> {
        let index = self.layout.fields.len();
        if self.layout.by_name.contains_key(&spec.name) {
            return Err(ModelError::schema_definition(
                &self.schema.entity,
                format!("duplicate field name '{}'", spec.name),
            ));
        }
        let field = FieldDefinition::from_spec(self.schema.id, &self.schema.entity, index, spec)?;
        self.layout.by_name.insert(field.name().to_string(), index);
        if field.is_persisted() {
            self.layout.persisted.push(index);
        }
        self.layout.fields.push(field);
        Ok(index)
    }

    /// Like [`create_field`](Self::create_field) but asserts the index a
    /// generator assigned.
    pub fn create_field_at(&mut self, index: usize, spec: FieldSpec) -> Result<usize, ModelError> {
        let next = self.layout.fields.len();
        if index != next {
            return Err(ModelError::schema_definition(
                &self.schema.entity,
                format!("field '{}' declared at index {index}, next index is {next}", spec.name),
            ));
        }
        self.create_field(spec)
    }

    /// Idempotent per field. The key keeps schema order regardless of the
    /// order roles are assigned in.
    pub fn set_primary_key(&mut self, index: usize, role: PrimaryKeyRole) -> Result<(), ModelError> {
        let Some(field) = self.layout.fields.get_mut(index) else {
            return Err(ModelError::schema_definition(
                &self.schema.entity,
                format!("no field at index {index}"),
            ));
        };
        if field.field_type().is_mutable() && role == PrimaryKeyRole::PartOfKey {
            return Err(ModelError::schema_definition(
                &self.schema.entity,
                format!("nested field '{}' cannot be part of the key", field.name()),
            ));
        }
        field.set_primary_key_role(role);
        let key = &mut self.layout.primary_key;
        match (role, key.binary_search(&index)) {
            (PrimaryKeyRole::PartOfKey, Err(pos)) => key.insert(pos, index),
            (PrimaryKeyRole::None, Ok(pos)) => {
                key.remove(pos);
            }
            _ => {}
        }
        Ok(())
    }

    pub fn set_primary_key_by_name(
        &mut self,
        name: &str,
        role: PrimaryKeyRole,
    ) -> Result<(), ModelError> {
        let index = *self.layout.by_name.get(name).ok_or_else(|| ModelError::UnknownField {
            schema: self.schema.entity.clone(),
            name: name.to_string(),
        })?;
        self.set_primary_key(index, role)
    }

    /// Publishes the layout. A schema can only be finished once.
    pub fn finish(self) -> Result<SchemaRef, ModelError> {
        let Self { schema, layout } = self;
        let (fields, persisted, primary_key) =
            (layout.fields.len(), layout.persisted.len(), layout.primary_key.len());
        schema.layout.set(layout).map_err(|_| {
            ModelError::schema_definition(&schema.entity, "schema is already finished")
        })?;
        debug!(
            entity = %schema.entity,
            fields,
            persisted,
            primary_key,
            "schema finished"
        );
        Ok(schema)
    }
}
