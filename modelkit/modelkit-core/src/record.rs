//! One entity instance: a fixed-size positional slot array bound to a schema.

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{
    codec::text::TextOptions,
    error::ModelError,
    field::FieldDefinition,
    render,
    schema::SchemaRef,
    value::Value,
};

struct RecordInner {
    schema: SchemaRef,
    slots: RwLock<Box<[Value]>>,
}

/// Shared handle to one record. Cloning the handle shares the record;
/// use [`shallow_copy`](Self::shallow_copy) or the graph copier to duplicate.
///
/// Handles are `Send + Sync`. Each access locks the slot array on its own,
/// so concurrent readers are safe; a sequence of writes from several
/// threads is not atomic as a whole.
#[derive(Clone)]
pub struct Record(Arc<RecordInner>);

/// One field whose values differ between two records.
#[derive(Debug, Clone)]
pub struct FieldDiff {
    pub field: String,
    pub this: Value,
    pub other: Value,
}

impl Record {
    pub(crate) fn new(schema: SchemaRef, slots: usize) -> Self {
        Self(Arc::new(RecordInner {
            schema,
            slots: RwLock::new(vec![Value::Null; slots].into_boxed_slice()),
        }))
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.0.schema
    }

    /// The field must belong to this record's schema.
    pub fn get(&self, field: &FieldDefinition) -> Value {
        debug_assert!(self.0.schema.owns(field), "field of another schema");
        self.get_at(field.index())
    }

    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn get_at(&self, index: usize) -> Value {
        self.0.slots.read()[index].clone()
    }

    pub fn get_by_name(&self, name: &str) -> Result<Value, ModelError> {
        let field = self.0.schema.field(name)?;
        Ok(self.get(field))
    }

    /// Type-checks non-null values against the field type.
    pub fn set(&self, field: &FieldDefinition, value: impl Into<Value>) -> Result<(), ModelError> {
        debug_assert!(self.0.schema.owns(field), "field of another schema");
        let value = value.into();
        field
            .field_type()
            .check(&value)
            .map_err(|e| e.in_context(self.field_path(field)))?;
        self.set_unchecked(field.index(), value);
        Ok(())
    }

    pub fn set_at(&self, index: usize, value: impl Into<Value>) -> Result<(), ModelError> {
        let schema = Arc::clone(&self.0.schema);
        let field = schema.fields().get(index).ok_or_else(|| ModelError::UnknownField {
            schema: schema.entity_name().to_string(),
            name: format!("#{index}"),
        })?;
        self.set(field, value)
    }

    pub fn set_by_name(&self, name: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        let schema = Arc::clone(&self.0.schema);
        self.set(schema.field(name)?, value)
    }

    pub(crate) fn set_unchecked(&self, index: usize, value: Value) {
        self.0.slots.write()[index] = value;
    }

    pub fn is_null(&self, field: &FieldDefinition) -> bool {
        self.0.slots.read()[field.index()].is_null()
    }

    fn field_path(&self, field: &FieldDefinition) -> String {
        format!("{}.{}", self.0.schema.entity_name(), field.name())
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Equality over primary-key fields only. False when the schema has no
    /// key, when either side has a null key field, or when the schemas
    /// differ.
    pub fn entity_equals(&self, other: &Record) -> bool {
        if !Arc::ptr_eq(&self.0.schema, &other.0.schema) || !self.0.schema.has_primary_key() {
            return false;
        }
        let (a, b) = (self.0.slots.read_recursive(), other.0.slots.read_recursive());
        self.0.schema.primary_key().all(|f| {
            let (x, y) = (&a[f.index()], &b[f.index()]);
            !x.is_null() && !y.is_null() && f.equals_value(x, y)
        })
    }

    /// `h = 31 * h + field_hash` over the key fields in schema order, seeded
    /// at 1. Consistent with [`entity_equals`](Self::entity_equals).
    pub fn entity_hash(&self) -> i32 {
        let slots = self.0.slots.read();
        self.0.schema.primary_key().fold(1i32, |h, f| {
            h.wrapping_mul(31)
                .wrapping_add(f.field_type().hash(&slots[f.index()]))
        })
    }

    /// New record of the same schema sharing every slot value.
    pub fn shallow_copy(&self) -> Record {
        Record(Arc::new(RecordInner {
            schema: Arc::clone(&self.0.schema),
            slots: RwLock::new(self.0.slots.read().clone()),
        }))
    }

    /// Copies the given fields from `from`, which must share this schema.
    pub fn copy_fields<'a>(
        &self,
        from: &Record,
        fields: impl IntoIterator<Item = &'a FieldDefinition>,
    ) -> Result<(), ModelError> {
        self.require_same_schema(from)?;
        if self.ptr_eq(from) {
            return Ok(());
        }
        let source = from.0.slots.read().clone();
        let mut target = self.0.slots.write();
        for field in fields {
            target[field.index()] = source[field.index()].clone();
        }
        Ok(())
    }

    fn require_same_schema(&self, other: &Record) -> Result<(), ModelError> {
        if Arc::ptr_eq(&self.0.schema, &other.0.schema) {
            return Ok(());
        }
        Err(ModelError::type_mismatch(
            "record",
            self.0.schema.entity_name(),
            other.0.schema.entity_name(),
        ))
    }

    /// Fields whose values differ under field-type equality, in schema order.
    pub fn diff(&self, other: &Record) -> Result<Vec<FieldDiff>, ModelError> {
        self.require_same_schema(other)?;
        let (a, b) = (self.0.slots.read_recursive(), other.0.slots.read_recursive());
        Ok(self
            .0
            .schema
            .fields()
            .iter()
            .filter(|f| !f.equals_value(&a[f.index()], &b[f.index()]))
            .map(|f| FieldDiff {
                field: f.name().to_string(),
                this: a[f.index()].clone(),
                other: b[f.index()].clone(),
            })
            .collect())
    }

    /// Every field equal; false for records of different schemas.
    pub fn values_equal(&self, other: &Record) -> bool {
        self.diff(other).is_ok_and(|d| d.is_empty())
    }

    pub fn to_value_map(&self) -> HashMap<String, Value> {
        let slots = self.0.slots.read();
        self.0
            .schema
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), slots[f.index()].clone()))
            .collect()
    }

    /// Sets only the fields present as keys; other slots are left as they
    /// are and unknown keys are ignored.
    pub fn from_value_map(&self, values: &HashMap<String, Value>) -> Result<(), ModelError> {
        let schema = Arc::clone(&self.0.schema);
        for field in schema.fields() {
            if let Some(v) = values.get(field.name()) {
                self.set(field, v.clone())?;
            }
        }
        Ok(())
    }

    /// `Entity<key1, key2>`.
    pub fn to_short_string(&self) -> String {
        let options = TextOptions::default();
        let slots = self.0.slots.read();
        let key = self
            .0
            .schema
            .primary_key()
            .map(|f| f.field_type().to_display_string(&slots[f.index()], false, &options))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}<{key}>", self.0.schema.entity_name())
    }

    /// Nested rendering of the whole graph below this record. Records already
    /// rendered are printed by identity only, which also cuts cycles.
    pub fn to_string_deep(&self, full: bool) -> String {
        render::render_record(self, full)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::identity(self.0.schema.entity_name(), self.addr()))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_string())
    }
}
