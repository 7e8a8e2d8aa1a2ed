#![allow(dead_code)]

use std::collections::BTreeMap;

use modelkit_core::{
    CodecKind, FieldDefinition, FieldSpec, FieldType, ModelEnum, ModelError, PrimaryKeyRole,
    Record, ScalarType, SchemaDefinition, SchemaRef, SpecialValue, SqlType, Syntax, Timestamp,
    codec::relational::{ColumnSource, ParameterSink},
};

// ── enums ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl ModelEnum for Color {
    const TYPE_NAME: &'static str = "Color";

    fn cases() -> &'static [Self] {
        &[Self::Red, Self::Green, Self::Blue]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
        }
    }
}

/// Wire codes and persisted codes both diverge from the ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Suspended,
    Closed,
}

impl ModelEnum for Status {
    const TYPE_NAME: &'static str = "Status";

    fn cases() -> &'static [Self] {
        &[Self::Active, Self::Suspended, Self::Closed]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Closed => "CLOSED",
        }
    }

    fn wire_value(self) -> Option<i32> {
        Some(match self {
            Self::Active => 10,
            Self::Suspended => 20,
            Self::Closed => 30,
        })
    }

    fn persistent_value(self) -> Option<SpecialValue> {
        let code = match self {
            Self::Active => "A",
            Self::Suspended => "S",
            Self::Closed => "C",
        };
        Some(SpecialValue::new(ScalarType::String, code))
    }
}

// ── schemas ──────────────────────────────────────────────────────────────────

/// `Person` with one field per scalar kind, two enums, a self-referencing
/// `parent` record and a `friends` list. Keyed on `id`.
pub fn person_schema() -> SchemaRef {
    let schema = SchemaDefinition::declare_in("Person", Some("people"));
    let mut b = schema.builder();
    for spec in [
        FieldSpec::new("id", ScalarType::Id),
        FieldSpec::new("name", ScalarType::String).column("full_name"),
        FieldSpec::new("age", ScalarType::I32),
        FieldSpec::new("balance", ScalarType::I64),
        FieldSpec::new("score", ScalarType::F64),
        FieldSpec::new("born", ScalarType::Timestamp),
        FieldSpec::new("avatar", ScalarType::Bytes),
        FieldSpec::new("version", ScalarType::Version),
        FieldSpec::new("active", ScalarType::Bool),
        FieldSpec::new("color", FieldType::enum_of::<Color>().expect("Color is consistent")),
        FieldSpec::new("status", FieldType::enum_of::<Status>().expect("Status is consistent")),
        FieldSpec::new("note", ScalarType::String)
            .transient()
            .hidden_from(Syntax::Wire),
        FieldSpec::new("parent", FieldType::record(&schema)),
        FieldSpec::new("friends", FieldType::list(&schema)),
    ] {
        b.create_field(spec).expect("field registers");
    }
    b.set_primary_key_by_name("id", PrimaryKeyRole::PartOfKey)
        .expect("id exists");
    b.finish().expect("schema finishes")
}

/// Two-field schema keyed on `k`.
pub fn keyed_schema() -> SchemaRef {
    let schema = SchemaDefinition::declare("Item");
    let mut b = schema.builder();
    b.create_field(FieldSpec::new("k", ScalarType::I32))
        .expect("k registers");
    b.create_field(FieldSpec::new("label", ScalarType::String))
        .expect("label registers");
    b.set_primary_key(0, PrimaryKeyRole::PartOfKey)
        .expect("k is field 0");
    b.finish().expect("schema finishes")
}

pub fn field<'a>(schema: &'a SchemaRef, name: &str) -> &'a FieldDefinition {
    schema.field(name).expect("field exists")
}

pub fn item(schema: &SchemaRef, k: i32, label: &str) -> Record {
    let r = schema.create_record().expect("record");
    r.set(field(schema, "k"), k).expect("k is i32");
    r.set(field(schema, "label"), label).expect("label is text");
    r
}

pub fn labels(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get_by_name("label").expect("label").to_string())
        .collect()
}

// ── relational row ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null(SqlType),
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    Ts(Timestamp),
    Bytes(Vec<u8>),
}

/// Positional parameter/column store used in place of a database.
#[derive(Debug, Default)]
pub struct MemoryRow {
    pub cells: BTreeMap<usize, Cell>,
}

fn wrong_cell(index: usize, cell: &Cell, wanted: &str) -> ModelError {
    ModelError::codec(
        CodecKind::Relational,
        format!("column {index} holds {cell:?}, wanted {wanted}"),
    )
}

macro_rules! getter {
    ($name:ident, $variant:ident, $ty:ty) => {
        fn $name(&mut self, index: usize) -> Result<Option<$ty>, ModelError> {
            match self.cells.get(&index) {
                None | Some(Cell::Null(_)) => Ok(None),
                Some(Cell::$variant(v)) => Ok(Some(v.clone())),
                Some(other) => Err(wrong_cell(index, other, stringify!($variant))),
            }
        }
    };
}

impl ParameterSink for MemoryRow {
    fn set_null(&mut self, index: usize, sql_type: SqlType) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::Null(sql_type));
        Ok(())
    }

    fn set_i32(&mut self, index: usize, value: i32) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::I32(value));
        Ok(())
    }

    fn set_i64(&mut self, index: usize, value: i64) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::I64(value));
        Ok(())
    }

    fn set_f64(&mut self, index: usize, value: f64) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::F64(value));
        Ok(())
    }

    fn set_string(&mut self, index: usize, value: &str) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::Str(value.to_string()));
        Ok(())
    }

    fn set_timestamp(&mut self, index: usize, value: Timestamp) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::Ts(value));
        Ok(())
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), ModelError> {
        self.cells.insert(index, Cell::Bytes(value.to_vec()));
        Ok(())
    }
}

impl ColumnSource for MemoryRow {
    getter!(get_i32, I32, i32);
    getter!(get_i64, I64, i64);
    getter!(get_f64, F64, f64);
    getter!(get_string, Str, String);
    getter!(get_timestamp, Ts, Timestamp);
    getter!(get_bytes, Bytes, Vec<u8>);
}
