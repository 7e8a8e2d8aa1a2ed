//! Deep copy of record graphs that may share sub-objects or contain cycles.
//!
//! Breadth-first: every original is shallow-copied once and its translation
//! registered before any child is visited; child slots of copies are filled
//! in a final patch pass once every node has a translation.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::{
    error::ModelError,
    record::Record,
    record_list::RecordList,
    sequence::{Node, ScalarArray, Sequence},
    value::Value,
};

/// Types the copier accepts as a root and returns as a result.
pub trait GraphNode: Clone {
    fn into_node(self) -> Node;

    fn from_node(node: Node) -> Option<Self>;
}

impl GraphNode for Node {
    fn into_node(self) -> Node {
        self
    }

    fn from_node(node: Node) -> Option<Self> {
        Some(node)
    }
}

macro_rules! impl_graph_node {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl GraphNode for $ty {
                fn into_node(self) -> Node {
                    Node::$variant(self)
                }

                fn from_node(node: Node) -> Option<Self> {
                    match node {
                        Node::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_graph_node! {
    Record => Record,
    RecordList => List,
    Sequence => Sequence,
    ScalarArray => Scalars,
}

/// A child slot of a copy still pointing at an original.
enum Patch {
    RecordField {
        copy: Record,
        index: usize,
        original: usize,
    },
    ListItem {
        copy: RecordList,
        index: usize,
        original: usize,
    },
    SequenceItem {
        copy: Sequence,
        index: usize,
        original: usize,
    },
}

#[derive(Default)]
pub struct GraphCopier {
    pending: VecDeque<Node>,
    translations: HashMap<usize, Node>,
    patches: Vec<Patch>,
}

impl GraphCopier {
    /// Copy of `root` and everything reachable from it. Shared references in
    /// the original map to one shared copy; no copy aliases an original.
    pub fn deep_copy<T: GraphNode>(root: &T) -> Result<T, ModelError> {
        let root = root.clone().into_node();
        let root_addr = root.addr();
        let mut copier = Self::default();
        copier.pending.push_back(root);
        while let Some(original) = copier.pending.pop_front() {
            copier.visit(original);
        }
        let patches = copier.patches.len();
        copier.apply_patches()?;
        trace!(nodes = copier.translations.len(), patches, "graph copied");

        copier
            .translations
            .remove(&root_addr)
            .and_then(T::from_node)
            .ok_or_else(|| ModelError::Invariant("root has no translation".to_string()))
    }

    fn visit(&mut self, original: Node) {
        let addr = original.addr();
        if self.translations.contains_key(&addr) {
            return;
        }
        match &original {
            Node::Record(r) => {
                let copy = r.shallow_copy();
                self.translations.insert(addr, Node::Record(copy.clone()));
                for field in r.schema().fields() {
                    if !field.field_type().is_mutable() {
                        continue;
                    }
                    let child = match r.get_at(field.index()) {
                        Value::Record(child) => Node::Record(child),
                        Value::List(child) => Node::List(child),
                        _ => continue,
                    };
                    self.patches.push(Patch::RecordField {
                        copy: copy.clone(),
                        index: field.index(),
                        original: child.addr(),
                    });
                    self.pending.push_back(child);
                }
            }
            Node::List(l) => {
                let copy = l.shallow_copy();
                self.translations.insert(addr, Node::List(copy.clone()));
                for (index, child) in l.records().into_iter().enumerate() {
                    self.patches.push(Patch::ListItem {
                        copy: copy.clone(),
                        index,
                        original: child.addr(),
                    });
                    self.pending.push_back(Node::Record(child));
                }
            }
            Node::Sequence(s) => {
                let copy = s.shallow_copy();
                self.translations.insert(addr, Node::Sequence(copy.clone()));
                for (index, child) in s.items().into_iter().enumerate() {
                    let Some(child) = child else { continue };
                    self.patches.push(Patch::SequenceItem {
                        copy: copy.clone(),
                        index,
                        original: child.addr(),
                    });
                    self.pending.push_back(child);
                }
            }
            Node::Scalars(a) => {
                self.translations.insert(addr, Node::Scalars(a.shallow_copy()));
            }
        }
    }

    fn translation(&self, original: usize) -> Result<&Node, ModelError> {
        self.translations.get(&original).ok_or_else(|| {
            ModelError::Invariant(format!("no translation for node at {original:#x}"))
        })
    }

    fn apply_patches(&mut self) -> Result<(), ModelError> {
        for patch in std::mem::take(&mut self.patches) {
            match patch {
                Patch::RecordField {
                    copy,
                    index,
                    original,
                } => {
                    let value = match self.translation(original)? {
                        Node::Record(r) => Value::Record(r.clone()),
                        Node::List(l) => Value::List(l.clone()),
                        other => {
                            return Err(ModelError::Invariant(format!(
                                "record field translated to {other:?}"
                            )));
                        }
                    };
                    copy.set_unchecked(index, value);
                }
                Patch::ListItem {
                    copy,
                    index,
                    original,
                } => match self.translation(original)? {
                    Node::Record(r) => copy.set_unchecked(index, r.clone()),
                    other => {
                        return Err(ModelError::Invariant(format!(
                            "list element translated to {other:?}"
                        )));
                    }
                },
                Patch::SequenceItem {
                    copy,
                    index,
                    original,
                } => {
                    let node = self.translation(original)?.clone();
                    copy.set(index, Some(node));
                }
            }
        }
        Ok(())
    }
}
