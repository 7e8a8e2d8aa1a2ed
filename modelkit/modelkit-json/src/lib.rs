//! JSON encoding of `modelkit-core` records.
//!
//! Only fields visible to [`Syntax::Json`](modelkit_core::Syntax) take part.
//! Conventions:
//! - objects are keyed by field name, in schema order;
//! - enums are written as their wire code;
//! - timestamps as epoch milliseconds, binary as a lowercase hex string;
//! - nested records and lists are written inline, and a reference cycle is an
//!   error;
//! - null fields are left out unless [`JsonOptions`] says otherwise.
//!
//! # Typical Flow
//! ```rust
//! use modelkit_core::{FieldSpec, ScalarType, SchemaDefinition};
//! use modelkit_json::JsonCodec;
//!
//! let schema = SchemaDefinition::declare("Point");
//! let mut builder = schema.builder();
//! builder.create_field(FieldSpec::new("x", ScalarType::I32)).unwrap();
//! let schema = builder.finish().unwrap();
//!
//! let codec = JsonCodec::default();
//! let point = codec.record_from_str(&schema, r#"{"x": 3}"#).unwrap().unwrap();
//! assert_eq!(codec.record_to_string(&point).unwrap(), r#"{"x":3}"#);
//! ```

mod decode;
mod encode;
pub mod error;
mod options;

pub use error::JsonCodecError;
pub use options::JsonOptions;

/// Encoder/decoder for one set of [`JsonOptions`].
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    options: JsonOptions,
}

impl JsonCodec {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }
}
