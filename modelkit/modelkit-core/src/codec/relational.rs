//! Relational parameter binding.
//!
//! The engine only describes how one value binds to one positional parameter
//! or column; an adapter per store implements [`ParameterSink`] and
//! [`ColumnSource`]. Only persisted fields take part, in schema order.

use crate::{
    error::ModelError,
    record::Record,
    schema::SchemaRef,
    timestamp::Timestamp,
};

/// Column kind a scalar binds as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    BigInt,
    Double,
    Varchar,
    Timestamp,
    VarBinary,
}

/// Write side: positional, typed parameter setters.
pub trait ParameterSink {
    fn set_null(&mut self, index: usize, sql_type: SqlType) -> Result<(), ModelError>;
    fn set_i32(&mut self, index: usize, value: i32) -> Result<(), ModelError>;
    fn set_i64(&mut self, index: usize, value: i64) -> Result<(), ModelError>;
    fn set_f64(&mut self, index: usize, value: f64) -> Result<(), ModelError>;
    fn set_string(&mut self, index: usize, value: &str) -> Result<(), ModelError>;
    fn set_timestamp(&mut self, index: usize, value: Timestamp) -> Result<(), ModelError>;
    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), ModelError>;
}

/// Read side: positional, typed column getters. `None` is SQL `NULL`.
pub trait ColumnSource {
    fn get_i32(&mut self, index: usize) -> Result<Option<i32>, ModelError>;
    fn get_i64(&mut self, index: usize) -> Result<Option<i64>, ModelError>;
    fn get_f64(&mut self, index: usize) -> Result<Option<f64>, ModelError>;
    fn get_string(&mut self, index: usize) -> Result<Option<String>, ModelError>;
    fn get_timestamp(&mut self, index: usize) -> Result<Option<Timestamp>, ModelError>;
    fn get_bytes(&mut self, index: usize) -> Result<Option<Vec<u8>>, ModelError>;
}

/// Binds every persisted field of `record` starting at parameter `start`.
/// Returns the index after the last bound parameter.
pub fn bind_record(
    record: &Record,
    sink: &mut dyn ParameterSink,
    start: usize,
) -> Result<usize, ModelError> {
    let mut index = start;
    for field in record.schema().persisted_fields() {
        let value = record.get(field);
        field.field_type().encode_relational(sink, index, &value)?;
        index += 1;
    }
    Ok(index)
}

/// Reads a record of `schema` whose persisted fields start at column `start`.
/// Non-persisted fields stay null.
pub fn extract_record(
    schema: &SchemaRef,
    source: &mut dyn ColumnSource,
    start: usize,
) -> Result<Record, ModelError> {
    let record = schema.create_record()?;
    for (offset, field) in schema.persisted_fields().enumerate() {
        let value = field
            .field_type()
            .decode_relational(source, start + offset)?;
        record.set(field, value)?;
    }
    Ok(record)
}
