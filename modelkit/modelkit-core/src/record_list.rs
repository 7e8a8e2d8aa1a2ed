//! Homogeneous, schema-tagged, ordered sequence of records.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fmt,
    num::NonZeroUsize,
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    error::ModelError,
    field::FieldDefinition,
    partition,
    record::Record,
    render,
    schema::SchemaRef,
    value::{Value, ValueKey},
};

struct ListInner {
    schema: SchemaRef,
    items: RwLock<Vec<Record>>,
}

/// Shared handle to one list. Elements are never null and always belong to
/// the list's schema. Like [`Record`], the handle is `Send + Sync`.
#[derive(Clone)]
pub struct RecordList(Arc<ListInner>);

/// One level of a multi-field sort.
#[derive(Debug, Clone, Copy)]
pub struct SortKey<'a> {
    pub field: &'a FieldDefinition,
    pub descending: bool,
}

impl<'a> SortKey<'a> {
    pub fn asc(field: &'a FieldDefinition) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: &'a FieldDefinition) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

impl RecordList {
    pub(crate) fn new(schema: SchemaRef) -> Self {
        Self::with_items(schema, Vec::new())
    }

    fn with_items(schema: SchemaRef, items: Vec<Record>) -> Self {
        Self(Arc::new(ListInner {
            schema,
            items: RwLock::new(items),
        }))
    }

    fn derived(&self, items: Vec<Record>) -> Self {
        Self::with_items(Arc::clone(&self.0.schema), items)
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.0.schema
    }

    pub fn len(&self) -> usize {
        self.0.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.read().is_empty()
    }

    fn check(&self, record: &Record) -> Result<(), ModelError> {
        if Arc::ptr_eq(record.schema(), &self.0.schema) {
            return Ok(());
        }
        Err(ModelError::type_mismatch(
            format!("list<{}>", self.0.schema.entity_name()),
            self.0.schema.entity_name(),
            record.schema().entity_name(),
        ))
    }

    pub fn push(&self, record: Record) -> Result<(), ModelError> {
        self.check(&record)?;
        self.0.items.write().push(record);
        Ok(())
    }

    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert(&self, index: usize, record: Record) -> Result<(), ModelError> {
        self.check(&record)?;
        self.0.items.write().insert(index, record);
        Ok(())
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn set(&self, index: usize, record: Record) -> Result<Record, ModelError> {
        self.check(&record)?;
        Ok(std::mem::replace(&mut self.0.items.write()[index], record))
    }

    pub(crate) fn set_unchecked(&self, index: usize, record: Record) {
        self.0.items.write()[index] = record;
    }

    pub fn get(&self, index: usize) -> Option<Record> {
        self.0.items.read().get(index).cloned()
    }

    pub fn last(&self) -> Option<Record> {
        self.0.items.read().last().cloned()
    }

    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn remove(&self, index: usize) -> Record {
        self.0.items.write().remove(index)
    }

    pub fn clear(&self) {
        self.0.items.write().clear();
    }

    /// Snapshot of the element handles.
    pub fn records(&self) -> Vec<Record> {
        self.0.items.read().clone()
    }

    pub fn ptr_eq(&self, other: &RecordList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// New list of the same schema sharing the element records.
    pub fn shallow_copy(&self) -> RecordList {
        self.derived(self.records())
    }

    /// Stable sort on `fields` in order, all in the same direction.
    pub fn sort_stable(&self, fields: &[&FieldDefinition], descending: bool) {
        let keys: Vec<SortKey<'_>> = fields
            .iter()
            .map(|&field| SortKey { field, descending })
            .collect();
        self.sort_by_keys(&keys);
    }

    /// Lexicographic over `keys` with the display ordering of each field; the
    /// first non-equal key decides and full ties keep input order. Nulls sort
    /// first ascending and therefore last descending.
    pub fn sort_by_keys(&self, keys: &[SortKey<'_>]) {
        let mut decorated: Vec<(Vec<Value>, Record)> = self
            .records()
            .into_iter()
            .map(|r| (keys.iter().map(|k| r.get(k.field)).collect(), r))
            .collect();
        decorated.sort_by(|(a, _), (b, _)| {
            keys.iter()
                .zip(a.iter().zip(b))
                .map(|(key, (x, y))| {
                    let o = key.field.compare_for_display(x, y);
                    if key.descending { o.reverse() } else { o }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        *self.0.items.write() = decorated.into_iter().map(|(_, r)| r).collect();
    }

    /// Records whose `field` value appears in `order` come first, in that
    /// order; the rest follow in their current order.
    pub fn sort_by_custom_order(&self, field: &FieldDefinition, order: &[Value]) {
        let rank: HashMap<ValueKey, usize> = order
            .iter()
            .enumerate()
            .rev()
            .map(|(i, v)| (v.key(), i))
            .collect();
        let mut items = self.records();
        items.sort_by_cached_key(|r| rank.get(&r.get(field).key()).copied().unwrap_or(usize::MAX));
        *self.0.items.write() = items;
    }

    pub fn partition_fixed(&self, size: NonZeroUsize) -> Vec<RecordList> {
        partition::partition_fixed(&self.0.items.read(), size)
            .into_iter()
            .map(|chunk| self.derived(chunk))
            .collect()
    }

    pub fn partition_even(&self, size: NonZeroUsize) -> Vec<RecordList> {
        partition::partition_even(&self.0.items.read(), size)
            .into_iter()
            .map(|chunk| self.derived(chunk))
            .collect()
    }

    /// First record per distinct `field` value; nulls count as one value.
    pub fn dedupe(&self, field: &FieldDefinition) -> RecordList {
        let mut seen = HashSet::new();
        self.derived(
            self.0
                .items
                .read()
                .iter()
                .filter(|r| seen.insert(r.get(field).key()))
                .cloned()
                .collect(),
        )
    }

    /// Records whose `field` equals one of `values`.
    pub fn filter(&self, field: &FieldDefinition, values: &[Value]) -> RecordList {
        self.derived(
            self.0
                .items
                .read()
                .iter()
                .filter(|r| {
                    let v = r.get(field);
                    values.iter().any(|x| field.equals_value(&v, x))
                })
                .cloned()
                .collect(),
        )
    }

    pub fn filter_not_null(&self, field: &FieldDefinition) -> RecordList {
        self.derived(
            self.0
                .items
                .read()
                .iter()
                .filter(|r| !r.is_null(field))
                .cloned()
                .collect(),
        )
    }

    /// Sets `field` to `value` on every element.
    pub fn fill(&self, field: &FieldDefinition, value: impl Into<Value>) -> Result<(), ModelError> {
        let value = value.into();
        for record in self.records() {
            record.set(field, value.clone())?;
        }
        Ok(())
    }

    /// Map from `field` value to record; later records win on equal values.
    pub fn index_by(&self, field: &FieldDefinition) -> HashMap<ValueKey, Record> {
        self.0
            .items
            .read()
            .iter()
            .map(|r| (r.get(field).key(), r.clone()))
            .collect()
    }

    pub fn extract_values(&self, field: &FieldDefinition) -> Vec<Value> {
        self.0.items.read().iter().map(|r| r.get(field)).collect()
    }

    /// Distinct `field` values in first-occurrence order.
    pub fn distinct_values(&self, field: &FieldDefinition) -> Vec<Value> {
        let mut seen = HashSet::new();
        self.extract_values(field)
            .into_iter()
            .filter(|v| seen.insert(v.key()))
            .collect()
    }

    /// Keeps at most `limit` elements.
    pub fn truncate(&self, limit: usize) {
        self.0.items.write().truncate(limit);
    }

    /// Keeps elements in `start..end`, both clamped to the length.
    pub fn retain_range(&self, start: usize, end: usize) {
        let mut items = self.0.items.write();
        let end = end.min(items.len());
        let start = start.min(end);
        items.truncate(end);
        items.drain(..start);
    }

    pub fn to_string_deep(&self, full: bool) -> String {
        render::render_list(self, full)
    }
}

impl fmt::Debug for RecordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]",
            render::identity(self.0.schema.entity_name(), self.addr()),
            self.len()
        )
    }
}
