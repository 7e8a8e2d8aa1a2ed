//! Deep debug rendering of record graphs.

use std::collections::HashSet;

use crate::{
    codec::text::TextOptions, record::Record, record_list::RecordList, value::Value,
};

pub(crate) fn identity(entity: &str, addr: usize) -> String {
    format!("{entity}@{addr:x}")
}

struct Renderer {
    written: HashSet<usize>,
    full: bool,
    options: TextOptions,
}

pub(crate) fn render_record(record: &Record, full: bool) -> String {
    Renderer::new(full).record(record)
}

pub(crate) fn render_list(list: &RecordList, full: bool) -> String {
    Renderer::new(full).list(list)
}

impl Renderer {
    fn new(full: bool) -> Self {
        Self {
            written: HashSet::new(),
            full,
            options: TextOptions::default(),
        }
    }

    /// `Entity@addr{a=1, b=...}`; a record seen before renders as
    /// `Entity@addr` only.
    fn record(&mut self, record: &Record) -> String {
        let mut out = identity(record.schema().entity_name(), record.addr());
        if !self.written.insert(record.addr()) {
            return out;
        }
        let fields = record
            .schema()
            .fields()
            .iter()
            .map(|f| {
                let value = record.get(f);
                let rendered = match &value {
                    Value::Record(r) => self.record(r),
                    Value::List(l) => self.list(l),
                    _ => f.field_type().to_display_string(&value, self.full, &self.options),
                };
                format!("{}={rendered}", f.name())
            })
            .collect::<Vec<_>>();
        out.push('{');
        out.push_str(&fields.join(", "));
        out.push('}');
        out
    }

    /// `size=N[first,\nsecond]`.
    fn list(&mut self, list: &RecordList) -> String {
        if !self.written.insert(list.addr()) {
            return format!("{}[]", identity(list.schema().entity_name(), list.addr()));
        }
        let items = list
            .records()
            .iter()
            .map(|r| self.record(r))
            .collect::<Vec<_>>();
        format!("size={}[{}]", items.len(), items.join(",\n"))
    }
}
