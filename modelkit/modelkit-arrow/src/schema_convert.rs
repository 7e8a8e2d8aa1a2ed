use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use modelkit_core::{FieldDefinition, SchemaDefinition, SqlType};

// ---------------------------------------------------------------------------
// Convert persisted fields to an Arrow schema
// ---------------------------------------------------------------------------

/// Arrow schema of the persisted fields of `schema`, one nullable column per
/// field named after its column, in schema order.
pub fn schema_to_arrow(schema: &SchemaDefinition) -> Schema {
    Schema::new(
        schema
            .persisted_fields()
            .filter_map(field_to_arrow)
            .collect::<Vec<_>>(),
    )
}

fn field_to_arrow(field: &FieldDefinition) -> Option<Field> {
    let sql_type = field.field_type().scalar_type()?.sql_type();
    Some(Field::new(field.column(), sql_type_to_datatype(sql_type), true))
}

pub fn sql_type_to_datatype(sql_type: SqlType) -> DataType {
    match sql_type {
        SqlType::Integer => DataType::Int32,
        SqlType::BigInt => DataType::Int64,
        SqlType::Double => DataType::Float64,
        SqlType::Varchar => DataType::Utf8,
        SqlType::Timestamp => {
            DataType::Timestamp(TimeUnit::Millisecond, Some(Arc::from(crate::TIMESTAMP_TZ)))
        }
        SqlType::VarBinary => DataType::Binary,
    }
}
