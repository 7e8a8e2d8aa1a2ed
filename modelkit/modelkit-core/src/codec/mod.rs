//! The three independent encode/decode surfaces.
//!
//! Each surface is driven by the field's [`FieldType`](crate::FieldType);
//! per-kind work is delegated to [`ScalarCodec`](crate::scalar::ScalarCodec).

pub mod binary;
pub mod relational;
pub mod text;
