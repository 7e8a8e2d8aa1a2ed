//! Schema-typed records with binary, text, relational, JSON and Arrow codecs.
//!
//! This crate re-exports [`modelkit_core`] at its root and the optional
//! adapters as modules:
//! - [`json`] (feature `json`): [`modelkit_json`];
//! - [`arrow`] (feature `arrow`): [`modelkit_arrow`].
//!
//! Both features are enabled by default.
//!
//! # Typical Flow
//! ```rust
//! use modelkit::{FieldSpec, ScalarType, SchemaDefinition, codec::binary};
//!
//! let schema = SchemaDefinition::declare("Point");
//! let mut builder = schema.builder();
//! builder.create_field(FieldSpec::new("x", ScalarType::I32)).unwrap();
//! builder.create_field(FieldSpec::new("y", ScalarType::I32)).unwrap();
//! let schema = builder.finish().unwrap();
//!
//! let point = schema.create_record().unwrap();
//! point.set_by_name("x", 1).unwrap();
//! point.set_by_name("y", 2).unwrap();
//!
//! let bytes = binary::encode_record(&point).unwrap();
//! let back = binary::decode_record(&schema, bytes).unwrap();
//! assert!(point.diff(&back).unwrap().is_empty());
//! ```

pub use modelkit_core::*;

#[cfg(feature = "arrow")]
pub use modelkit_arrow as arrow;
#[cfg(feature = "json")]
pub use modelkit_json as json;
