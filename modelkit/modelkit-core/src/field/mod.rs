mod definition;
mod field_type;
pub mod syntax;

pub use definition::{FieldDefinition, FieldSpec, PrimaryKeyRole};
pub use field_type::{EnumField, FieldType};
