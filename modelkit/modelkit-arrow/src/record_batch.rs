use std::sync::Arc;

use arrow::{
    array::{
        Array, ArrayRef, BinaryArray, BinaryBuilder, Float64Array, Float64Builder, Int32Array,
        Int32Builder, Int64Array, Int64Builder, StringArray, StringBuilder,
        TimestampMillisecondArray, TimestampMillisecondBuilder,
    },
    datatypes::{DataType, TimeUnit},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use modelkit_core::{
    CodecKind, ModelError, Record, RecordList, SchemaRef, SqlType, Timestamp,
    codec::relational::{ColumnSource, ParameterSink, bind_record, extract_record},
};

use crate::{ArrowAdapterError, TIMESTAMP_TZ, schema_convert::schema_to_arrow};

fn relational_error(detail: impl Into<String>) -> ModelError {
    ModelError::codec(CodecKind::Relational, detail)
}

// ---------------------------------------------------------------------------
// Write side: records → RecordBatch
// ---------------------------------------------------------------------------

/// One Arrow builder per persisted field.
enum ColumnBuilder {
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float64(Float64Builder),
    Utf8(StringBuilder),
    Timestamp(TimestampMillisecondBuilder),
    Binary(BinaryBuilder),
}

impl ColumnBuilder {
    fn for_datatype(data_type: &DataType) -> Option<Self> {
        Some(match data_type {
            DataType::Int32 => Self::Int32(Int32Builder::new()),
            DataType::Int64 => Self::Int64(Int64Builder::new()),
            DataType::Float64 => Self::Float64(Float64Builder::new()),
            DataType::Utf8 => Self::Utf8(StringBuilder::new()),
            DataType::Timestamp(TimeUnit::Millisecond, _) => {
                Self::Timestamp(TimestampMillisecondBuilder::new().with_timezone(TIMESTAMP_TZ))
            }
            DataType::Binary => Self::Binary(BinaryBuilder::new()),
            _ => return None,
        })
    }

    fn append_null(&mut self) {
        match self {
            Self::Int32(b) => b.append_null(),
            Self::Int64(b) => b.append_null(),
            Self::Float64(b) => b.append_null(),
            Self::Utf8(b) => b.append_null(),
            Self::Timestamp(b) => b.append_null(),
            Self::Binary(b) => b.append_null(),
        }
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Int32(b) => Arc::new(b.finish()),
            Self::Int64(b) => Arc::new(b.finish()),
            Self::Float64(b) => Arc::new(b.finish()),
            Self::Utf8(b) => Arc::new(b.finish()),
            Self::Timestamp(b) => Arc::new(b.finish()),
            Self::Binary(b) => Arc::new(b.finish()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Int32(_) => "Int32",
            Self::Int64(_) => "Int64",
            Self::Float64(_) => "Float64",
            Self::Utf8(_) => "Utf8",
            Self::Timestamp(_) => "Timestamp",
            Self::Binary(_) => "Binary",
        }
    }
}

/// [`ParameterSink`] appending each bound parameter to its column.
struct BatchSink {
    columns: Vec<ColumnBuilder>,
}

impl BatchSink {
    fn column(&mut self, index: usize) -> Result<&mut ColumnBuilder, ModelError> {
        let count = self.columns.len();
        self.columns
            .get_mut(index)
            .ok_or_else(|| relational_error(format!("parameter {index} out of {count} columns")))
    }
}

macro_rules! append_to {
    ($sink:expr, $index:expr, $variant:ident, $value:expr, $setter:literal) => {{
        match $sink.column($index)? {
            ColumnBuilder::$variant(b) => {
                b.append_value($value);
                Ok(())
            }
            other => Err(relational_error(format!(
                "{} bound to {} column {}",
                $setter,
                other.kind(),
                $index
            ))),
        }
    }};
}

impl ParameterSink for BatchSink {
    fn set_null(&mut self, index: usize, _sql_type: SqlType) -> Result<(), ModelError> {
        self.column(index)?.append_null();
        Ok(())
    }

    fn set_i32(&mut self, index: usize, value: i32) -> Result<(), ModelError> {
        append_to!(self, index, Int32, value, "i32")
    }

    fn set_i64(&mut self, index: usize, value: i64) -> Result<(), ModelError> {
        append_to!(self, index, Int64, value, "i64")
    }

    fn set_f64(&mut self, index: usize, value: f64) -> Result<(), ModelError> {
        append_to!(self, index, Float64, value, "f64")
    }

    fn set_string(&mut self, index: usize, value: &str) -> Result<(), ModelError> {
        append_to!(self, index, Utf8, value, "string")
    }

    fn set_timestamp(&mut self, index: usize, value: Timestamp) -> Result<(), ModelError> {
        append_to!(self, index, Timestamp, value.millis(), "timestamp")
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), ModelError> {
        append_to!(self, index, Binary, value, "bytes")
    }
}

/// Binds every record of `list` as one row of a batch shaped by
/// [`schema_to_arrow`].
pub fn records_to_record_batch(list: &RecordList) -> Result<RecordBatch, ArrowAdapterError> {
    let schema = Arc::new(schema_to_arrow(list.schema()));
    let columns = schema
        .fields()
        .iter()
        .map(|f| {
            ColumnBuilder::for_datatype(f.data_type()).ok_or_else(|| {
                ArrowAdapterError::UnsupportedColumn {
                    column: f.name().clone(),
                    data_type: f.data_type().clone(),
                    expected: f.data_type().clone(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut sink = BatchSink { columns };

    let records = list.records();
    for record in &records {
        bind_record(record, &mut sink, 0)?;
    }

    let arrays = sink.columns.iter_mut().map(ColumnBuilder::finish).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

// ---------------------------------------------------------------------------
// Read side: RecordBatch → records
// ---------------------------------------------------------------------------

/// [`ColumnSource`] over one row of a batch, columns in persisted-field order.
struct BatchRow<'a> {
    columns: &'a [ArrayRef],
    row: usize,
}

macro_rules! read_from {
    ($row:expr, $index:expr, $Array:ty) => {{
        let column = $row.columns.get($index).ok_or_else(|| {
            relational_error(format!(
                "column {} out of {} columns",
                $index,
                $row.columns.len()
            ))
        })?;
        let array = column.as_any().downcast_ref::<$Array>().ok_or_else(|| {
            relational_error(format!(
                "column {} is {}, expected {}",
                $index,
                column.data_type(),
                stringify!($Array)
            ))
        })?;
        if array.is_null($row.row) {
            None
        } else {
            Some(array.value($row.row))
        }
    }};
}

impl ColumnSource for BatchRow<'_> {
    fn get_i32(&mut self, index: usize) -> Result<Option<i32>, ModelError> {
        Ok(read_from!(self, index, Int32Array))
    }

    fn get_i64(&mut self, index: usize) -> Result<Option<i64>, ModelError> {
        Ok(read_from!(self, index, Int64Array))
    }

    fn get_f64(&mut self, index: usize) -> Result<Option<f64>, ModelError> {
        Ok(read_from!(self, index, Float64Array))
    }

    fn get_string(&mut self, index: usize) -> Result<Option<String>, ModelError> {
        Ok(read_from!(self, index, StringArray).map(str::to_string))
    }

    fn get_timestamp(&mut self, index: usize) -> Result<Option<Timestamp>, ModelError> {
        Ok(read_from!(self, index, TimestampMillisecondArray).map(Timestamp::from_millis))
    }

    fn get_bytes(&mut self, index: usize) -> Result<Option<Vec<u8>>, ModelError> {
        Ok(read_from!(self, index, BinaryArray).map(<[u8]>::to_vec))
    }
}

/// Timestamp columns match on unit only; any timezone is read as UTC.
fn compatible(expected: &DataType, actual: &DataType) -> bool {
    match (expected, actual) {
        (DataType::Timestamp(a, _), DataType::Timestamp(b, _)) => a == b,
        _ => expected == actual,
    }
}

/// Columns of `batch` for the persisted fields of `schema`, looked up by
/// column name and checked against the expected Arrow type.
fn persisted_columns(
    schema: &SchemaRef,
    batch: &RecordBatch,
) -> Result<Vec<ArrayRef>, ArrowAdapterError> {
    schema_to_arrow(schema)
        .fields()
        .iter()
        .map(|field| {
            let column = batch.column_by_name(field.name()).ok_or_else(|| {
                ArrowAdapterError::MissingColumn {
                    column: field.name().clone(),
                }
            })?;
            if !compatible(field.data_type(), column.data_type()) {
                return Err(ArrowAdapterError::UnsupportedColumn {
                    column: field.name().clone(),
                    data_type: column.data_type().clone(),
                    expected: field.data_type().clone(),
                });
            }
            Ok(Arc::clone(column))
        })
        .collect()
}

/// Extracts one record of `schema` per row of `batch`. Columns that do not
/// belong to a persisted field are ignored.
pub fn record_batch_to_records(
    schema: &SchemaRef,
    batch: &RecordBatch,
) -> Result<RecordList, ArrowAdapterError> {
    let columns = persisted_columns(schema, batch)?;
    let list = schema.create_list()?;
    for row in 0..batch.num_rows() {
        let mut source = BatchRow {
            columns: &columns,
            row,
        };
        list.push(extract_record(schema, &mut source, 0)?)?;
    }
    Ok(list)
}

pub fn record_from_batch_row(
    schema: &SchemaRef,
    batch: &RecordBatch,
    row: usize,
) -> Result<Record, ArrowAdapterError> {
    let rows = batch.num_rows();
    if row >= rows {
        return Err(ArrowAdapterError::RowOutOfRange { row, rows });
    }
    let columns = persisted_columns(schema, batch)?;
    let mut source = BatchRow {
        columns: &columns,
        row,
    };
    Ok(extract_record(schema, &mut source, 0)?)
}
