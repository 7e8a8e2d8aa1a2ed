use arrow::datatypes::{DataType, TimeUnit};
use modelkit_arrow::{schema_to_arrow, sql_type_to_datatype};
use modelkit_core::{
    FieldSpec, FieldType, ModelEnum, ScalarType, SchemaDefinition, SpecialValue, SqlType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Basic,
    Gold,
}

impl ModelEnum for Tier {
    const TYPE_NAME: &'static str = "Tier";

    fn cases() -> &'static [Self] {
        &[Self::Basic, Self::Gold]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Gold => "GOLD",
        }
    }

    fn persistent_value(self) -> Option<SpecialValue> {
        let code = match self {
            Self::Basic => "B",
            Self::Gold => "G",
        };
        Some(SpecialValue::new(ScalarType::String, code))
    }
}

#[test]
fn sql_types_map_to_arrow_types() {
    assert_eq!(sql_type_to_datatype(SqlType::Integer), DataType::Int32);
    assert_eq!(sql_type_to_datatype(SqlType::BigInt), DataType::Int64);
    assert_eq!(sql_type_to_datatype(SqlType::Double), DataType::Float64);
    assert_eq!(sql_type_to_datatype(SqlType::Varchar), DataType::Utf8);
    assert_eq!(sql_type_to_datatype(SqlType::VarBinary), DataType::Binary);
    assert_eq!(
        sql_type_to_datatype(SqlType::Timestamp),
        DataType::Timestamp(TimeUnit::Millisecond, Some("+00:00".into()))
    );
}

#[test]
fn persisted_fields_become_nullable_columns() {
    let schema = SchemaDefinition::declare("Account");
    let mut b = schema.builder();
    for spec in [
        FieldSpec::new("id", ScalarType::Id),
        FieldSpec::new("name", ScalarType::String).column("full_name"),
        FieldSpec::new("active", ScalarType::Bool),
        FieldSpec::new("version", ScalarType::Version),
        FieldSpec::new("tier", FieldType::enum_of::<Tier>().expect("Tier")),
        FieldSpec::new("cache", ScalarType::Bytes).transient(),
        FieldSpec::new("parent", FieldType::record(&schema)),
        FieldSpec::new("children", FieldType::list(&schema)),
    ] {
        b.create_field(spec).expect("field registers");
    }
    let schema = b.finish().expect("schema finishes");

    let arrow_schema = schema_to_arrow(&schema);
    let columns: Vec<(&str, &DataType)> = arrow_schema
        .fields()
        .iter()
        .map(|f| (f.name().as_str(), f.data_type()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", &DataType::Int64),
            ("full_name", &DataType::Utf8),
            ("active", &DataType::Int32),
            ("version", &DataType::Int64),
            ("tier", &DataType::Utf8),
        ]
    );
    assert!(arrow_schema.fields().iter().all(|f| f.is_nullable()));
}

#[test]
fn unfinished_schema_has_no_columns() {
    let schema = SchemaDefinition::declare("Draft");
    assert!(schema_to_arrow(&schema).fields().is_empty());
}
