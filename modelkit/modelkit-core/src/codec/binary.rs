//! Compact big-endian binary wire format.
//!
//! Only fields visible to [`Syntax::Wire`] are written, in schema order.
//! Layout per kind:
//!
//! * `i32`, `id`, `version`: 4-byte int (`id`/`version` keep the low 32 bits);
//! * `i64`: 8-byte int; `f64`, `timestamp`: 8-byte float (timestamp as millis);
//! * `string`, `bytes`: 4-byte length (`-1` for null) + payload;
//! * `bool`: 1 byte (`-1` for null);
//! * enum: the wire code as a 4-byte int, `0` for null;
//! * nested record: 4-byte length (`-1` for null) + encoded sub-record;
//! * nested list: 4-byte count (`-1` for null) + one length-prefixed
//!   sub-record per element.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    error::{CodecKind, ModelError},
    field::syntax::Syntax,
    record::Record,
    record_list::RecordList,
    schema::SchemaRef,
};

fn eof_err(what: &str) -> ModelError {
    ModelError::codec(CodecKind::Binary, format!("unexpected end of input reading {what}"))
}

/// Output buffer plus the chain of records currently being written.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
    active: Vec<usize>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn put_i64(&mut self, v: i64) {
        self.buf.put_i64(v);
    }

    pub fn put_f64(&mut self, v: f64) {
        self.buf.put_f64(v);
    }

    /// `None` is written as length `-1`.
    pub fn put_len_prefixed(&mut self, payload: Option<&[u8]>) -> Result<(), ModelError> {
        match payload {
            None => self.put_i32(-1),
            Some(p) => {
                self.put_i32(wire_len(p.len())?);
                self.buf.put_slice(p);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }

    /// Fields of `record`, without any framing.
    pub fn write_record(&mut self, record: &Record) -> Result<(), ModelError> {
        let addr = record.addr();
        if self.active.contains(&addr) {
            return Err(ModelError::codec(
                CodecKind::Binary,
                format!("cyclic reference to {}", record.to_short_string()),
            ));
        }
        self.active.push(addr);
        let result = record.schema().fields_for(Syntax::Wire).try_for_each(|field| {
            let value = record.get(field);
            field.field_type().encode_binary(self, &value)
        });
        self.active.pop();
        result
    }

    pub(crate) fn write_nested_record(&mut self, record: Option<&Record>) -> Result<(), ModelError> {
        let Some(record) = record else {
            self.put_i32(-1);
            return Ok(());
        };
        let start = self.buf.len();
        self.put_i32(0);
        self.write_record(record)?;
        let len = wire_len(self.buf.len() - start - 4)?;
        self.buf[start..start + 4].copy_from_slice(&len.to_be_bytes());
        Ok(())
    }

    pub(crate) fn write_nested_list(&mut self, list: Option<&RecordList>) -> Result<(), ModelError> {
        let Some(list) = list else {
            self.put_i32(-1);
            return Ok(());
        };
        let records = list.records();
        self.put_i32(wire_len(records.len())?);
        for record in &records {
            self.write_nested_record(Some(record))?;
        }
        Ok(())
    }
}

fn wire_len(len: usize) -> Result<i32, ModelError> {
    i32::try_from(len).map_err(|_| {
        ModelError::codec(CodecKind::Binary, format!("length {len} exceeds wire limit"))
    })
}

/// Cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn get_i8(&mut self) -> Result<i8, ModelError> {
        self.buf.try_get_i8().map_err(|_| eof_err("i8"))
    }

    pub fn get_i32(&mut self) -> Result<i32, ModelError> {
        self.buf.try_get_i32().map_err(|_| eof_err("i32"))
    }

    pub fn get_i64(&mut self) -> Result<i64, ModelError> {
        self.buf.try_get_i64().map_err(|_| eof_err("i64"))
    }

    pub fn get_f64(&mut self) -> Result<f64, ModelError> {
        self.buf.try_get_f64().map_err(|_| eof_err("f64"))
    }

    pub fn get_len_prefixed(&mut self) -> Result<Option<Bytes>, ModelError> {
        let len = self.get_i32()?;
        if len == -1 {
            return Ok(None);
        }
        let len = usize::try_from(len).map_err(|_| {
            ModelError::codec(CodecKind::Binary, format!("negative length {len}"))
        })?;
        if self.buf.remaining() < len {
            return Err(eof_err("length-prefixed payload"));
        }
        Ok(Some(self.buf.split_to(len)))
    }

    pub fn read_record(&mut self, schema: &SchemaRef) -> Result<Record, ModelError> {
        let record = schema.create_record()?;
        for field in schema.fields_for(Syntax::Wire) {
            let value = field
                .field_type()
                .decode_binary(self, field.substitution())?;
            record.set(field, value)?;
        }
        Ok(record)
    }

    pub(crate) fn read_nested_record(
        &mut self,
        schema: &SchemaRef,
    ) -> Result<Option<Record>, ModelError> {
        let Some(payload) = self.get_len_prefixed()? else {
            return Ok(None);
        };
        decode_record(schema, payload).map(Some)
    }

    pub(crate) fn read_nested_list(
        &mut self,
        schema: &SchemaRef,
    ) -> Result<Option<RecordList>, ModelError> {
        let count = self.get_i32()?;
        if count == -1 {
            return Ok(None);
        }
        let count = usize::try_from(count).map_err(|_| {
            ModelError::codec(CodecKind::Binary, format!("negative element count {count}"))
        })?;
        let list = schema.create_list()?;
        for index in 0..count {
            let record = self.read_nested_record(schema)?.ok_or_else(|| {
                ModelError::codec(
                    CodecKind::Binary,
                    format!("null element {index} in list of {}", schema.entity_name()),
                )
            })?;
            list.push(record)?;
        }
        Ok(Some(list))
    }
}

/// Encodes the `Wire`-visible fields of `record`. Fails on reference cycles.
pub fn encode_record(record: &Record) -> Result<Bytes, ModelError> {
    let mut out = WireWriter::new();
    out.write_record(record)?;
    Ok(out.finish())
}

/// Decodes a record of `schema`; trailing bytes are an error.
pub fn decode_record(schema: &SchemaRef, input: Bytes) -> Result<Record, ModelError> {
    let mut reader = WireReader::new(input);
    let record = reader.read_record(schema)?;
    if reader.remaining() != 0 {
        return Err(ModelError::codec(
            CodecKind::Binary,
            format!(
                "{} trailing bytes after {}",
                reader.remaining(),
                schema.entity_name()
            ),
        ));
    }
    Ok(record)
}

/// Encodes a list as a count followed by length-prefixed records.
pub fn encode_list(list: &RecordList) -> Result<Bytes, ModelError> {
    let mut out = WireWriter::new();
    out.write_nested_list(Some(list))?;
    Ok(out.finish())
}

pub fn decode_list(schema: &SchemaRef, input: Bytes) -> Result<RecordList, ModelError> {
    let mut reader = WireReader::new(input);
    let list = reader
        .read_nested_list(schema)?
        .ok_or_else(|| ModelError::codec(CodecKind::Binary, "null list at top level"))?;
    if reader.remaining() != 0 {
        return Err(ModelError::codec(
            CodecKind::Binary,
            format!("{} trailing bytes after list", reader.remaining()),
        ));
    }
    Ok(list)
}
