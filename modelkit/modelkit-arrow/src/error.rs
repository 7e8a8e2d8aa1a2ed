use arrow::{datatypes::DataType, error::ArrowError};
use modelkit_core::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArrowAdapterError {
    #[error(transparent)]
    Arrow(#[from] ArrowError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("column '{column}' has unsupported type {data_type}, expected {expected}")]
    UnsupportedColumn {
        column: String,
        data_type: DataType,
        expected: DataType,
    },
    #[error("column '{column}' not found in record batch")]
    MissingColumn { column: String },
    #[error("row {row} out of range for a batch of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
}
