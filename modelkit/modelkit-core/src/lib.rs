//! Schema-typed record engine.
//!
//! Entities are described by a [`SchemaDefinition`] of ordered, typed
//! fields and instantiated as positional [`Record`]s. Values travel through
//! three independent codecs ([`codec::binary`], [`codec::text`],
//! [`codec::relational`]), each driven by the field's [`FieldType`].
//! [`GraphCopier`] duplicates record graphs with shared references and
//! cycles intact.

pub mod codec;
mod enum_codec;
mod enum_type;
mod error;
mod field;
mod graph_copy;
mod id;
pub mod partition;
mod record;
mod record_list;
mod render;
pub mod scalar;
mod schema;
mod sequence;
mod timestamp;
mod value;

pub use codec::{relational::SqlType, text::TextOptions};
pub use enum_codec::{EnumCodec, EnumCodecMode, SpecialRule};
pub use enum_type::{BooleanEnum, EnumCase, EnumType, EnumValue, ModelEnum, SpecialValue};
pub use error::{CodecKind, ModelError, ValueTypeError};
pub use field::{
    EnumField, FieldDefinition, FieldSpec, FieldType, PrimaryKeyRole,
    syntax::{Syntax, SyntaxSet},
};
pub use graph_copy::{GraphCopier, GraphNode};
pub use id::{Id, Version};
pub use record::{FieldDiff, Record};
pub use record_list::{RecordList, SortKey};
pub use scalar::{ScalarType, ZeroSubstitution};
pub use schema::{SchemaBuilder, SchemaDefinition, SchemaRef};
pub use sequence::{Node, ScalarArray, Sequence};
pub use timestamp::{DEFAULT_TIMESTAMP_FORMAT, Timestamp};
pub use value::{Value, ValueKey};
