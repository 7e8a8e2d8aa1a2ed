use modelkit_core::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonCodecError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("field '{field}': expected {expected}, found {found}")]
    UnexpectedJson {
        field: String,
        expected: &'static str,
        found: String,
    },
    #[error("field '{field}': {value} has no JSON number representation")]
    NonFiniteNumber { field: String, value: f64 },
    #[error("cyclic reference to {entity}")]
    Cycle { entity: String },
}
