//! Arrow adapter for `modelkit-core` records.
//!
//! This crate implements the relational parameter contract of
//! [`modelkit_core::codec::relational`] over Arrow columns:
//! 1. Convert the persisted fields of a `SchemaDefinition` to an Arrow `Schema`.
//! 2. Bind a `RecordList` into a `RecordBatch`, one row per record.
//! 3. Extract records back out of a `RecordBatch`.
//!
//! Column types follow the relational binding of each field:
//! - `Integer` → `Int32`, `BigInt` → `Int64`, `Double` → `Float64`;
//! - `Varchar` → `Utf8`, `VarBinary` → `Binary`;
//! - `Timestamp` → millisecond `Timestamp` in UTC.
//!
//! Columns are named after [`FieldDefinition::column`](modelkit_core::FieldDefinition::column)
//! and are always nullable. Nested record and list fields are never persisted
//! and have no column.
//!
//! # Typical Flow
//! ```rust
//! use modelkit_arrow::{record_batch_to_records, records_to_record_batch};
//! use modelkit_core::{FieldSpec, ScalarType, SchemaDefinition};
//!
//! let schema = SchemaDefinition::declare("Point");
//! let mut builder = schema.builder();
//! builder.create_field(FieldSpec::new("x", ScalarType::I32)).unwrap();
//! let schema = builder.finish().unwrap();
//!
//! let list = schema.create_list().unwrap();
//! let point = schema.create_record().unwrap();
//! point.set_by_name("x", 3).unwrap();
//! list.push(point).unwrap();
//!
//! let batch = records_to_record_batch(&list).unwrap();
//! assert_eq!(batch.num_rows(), 1);
//! let back = record_batch_to_records(&schema, &batch).unwrap();
//! assert_eq!(back.len(), 1);
//! ```
pub mod error;
pub mod record_batch;
pub mod schema_convert;

pub use error::ArrowAdapterError;
pub use record_batch::{record_batch_to_records, record_from_batch_row, records_to_record_batch};
pub use schema_convert::{schema_to_arrow, sql_type_to_datatype};

/// Timezone attached to every timestamp column.
pub(crate) const TIMESTAMP_TZ: &str = "+00:00";
