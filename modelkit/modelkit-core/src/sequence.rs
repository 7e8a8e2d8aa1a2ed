//! Untyped containers the graph copier can walk besides records and lists.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{error::ModelError, record::Record, record_list::RecordList, value::Value};

/// Any object the graph copier knows how to duplicate.
#[derive(Clone)]
pub enum Node {
    Record(Record),
    List(RecordList),
    Sequence(Sequence),
    Scalars(ScalarArray),
}

impl Node {
    pub(crate) fn addr(&self) -> usize {
        match self {
            Node::Record(r) => r.addr(),
            Node::List(l) => l.addr(),
            Node::Sequence(s) => s.addr(),
            Node::Scalars(a) => a.addr(),
        }
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        self.addr() == other.addr()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Record(r) => fmt::Debug::fmt(r, f),
            Node::List(l) => fmt::Debug::fmt(l, f),
            Node::Sequence(s) => fmt::Debug::fmt(s, f),
            Node::Scalars(a) => fmt::Debug::fmt(a, f),
        }
    }
}

/// Ordered, heterogeneous collection of node references; slots may be empty.
#[derive(Clone, Default)]
pub struct Sequence(Arc<RwLock<Vec<Option<Node>>>>);

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Option<Node>>) -> Self {
        Self(Arc::new(RwLock::new(nodes.into_iter().collect())))
    }

    pub fn push(&self, node: Option<Node>) {
        self.0.write().push(node);
    }

    pub fn get(&self, index: usize) -> Option<Node> {
        self.0.read().get(index).cloned().flatten()
    }

    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn set(&self, index: usize, node: Option<Node>) {
        self.0.write()[index] = node;
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn items(&self) -> Vec<Option<Node>> {
        self.0.read().clone()
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn shallow_copy(&self) -> Sequence {
        Self::from_nodes(self.items())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence@{:x}[{}]", self.addr(), self.len())
    }
}

/// Fixed-size array of scalar values, copied element-wise.
#[derive(Clone)]
pub struct ScalarArray(Arc<RwLock<Box<[Value]>>>);

impl ScalarArray {
    /// Fails if any element is a record or a list.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Result<Self, ModelError> {
        let values: Box<[Value]> = values.into_iter().collect();
        if let Some(v) = values
            .iter()
            .find(|v| matches!(v, Value::Record(_) | Value::List(_)))
        {
            return Err(ModelError::type_mismatch(
                "scalar array",
                "scalar or enum",
                v.variant_name(),
            ));
        }
        Ok(Self(Arc::new(RwLock::new(values))))
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> Result<(), ModelError> {
        if matches!(value, Value::Record(_) | Value::List(_)) {
            return Err(ModelError::type_mismatch(
                "scalar array",
                "scalar or enum",
                value.variant_name(),
            ));
        }
        self.0.write()[index] = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.read().to_vec()
    }

    pub fn ptr_eq(&self, other: &ScalarArray) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn shallow_copy(&self) -> ScalarArray {
        Self(Arc::new(RwLock::new(self.0.read().clone())))
    }
}

impl fmt::Debug for ScalarArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.read().iter()).finish()
    }
}

macro_rules! impl_node_conversion {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(v: $ty) -> Self {
                    Node::$variant(v)
                }
            }
        )*
    };
}

impl_node_conversion! {
    Record => Record,
    RecordList => List,
    Sequence => Sequence,
    ScalarArray => Scalars,
}
