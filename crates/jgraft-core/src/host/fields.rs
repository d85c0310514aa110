//! Generic field access over host nodes
//!
//! Every node kind declares which of its fields hold child trees or child
//! lists. The graph builder uses [`TreeKind::fields`](super::TreeKind::fields)
//! to walk statements and expressions without one case per kind, and the
//! splicer writes replacements back with
//! [`TreeKind::set_field`](super::TreeKind::set_field).

use super::list::NodeList;
use super::tree::Tree;
use thiserror::Error;

/// Value read from (or written to) a child-valued field
#[derive(Debug, Clone)]
pub enum FieldValue {
    Tree(Option<Tree>),
    List(NodeList),
}

/// A named child-valued field of a host node
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("{kind} has no child field '{field}'")]
    Unknown { kind: &'static str, field: String },

    #[error("field '{field}' holds {expected}, got {found}")]
    Mismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> &str {
        match self {
            FieldError::Unknown { field, .. } => field,
            FieldError::Mismatch { field, .. } => field,
        }
    }
}

impl FieldValue {
    fn describe(&self) -> &'static str {
        match self {
            FieldValue::Tree(Some(_)) => "a tree",
            FieldValue::Tree(None) => "nothing",
            FieldValue::List(_) => "a list",
        }
    }
}

/// Storage shapes a child-valued field can have
pub(crate) trait Slot {
    fn collect(&self, name: &'static str, out: &mut Vec<Field>);
    fn assign(&mut self, name: &'static str, value: FieldValue) -> Result<(), FieldError>;
}

impl Slot for Tree {
    fn collect(&self, name: &'static str, out: &mut Vec<Field>) {
        out.push(Field {
            name,
            value: FieldValue::Tree(Some(self.clone())),
        });
    }

    fn assign(&mut self, name: &'static str, value: FieldValue) -> Result<(), FieldError> {
        match value {
            FieldValue::Tree(Some(tree)) => {
                *self = tree;
                Ok(())
            }
            other => Err(FieldError::Mismatch {
                field: name,
                expected: "a tree",
                found: other.describe(),
            }),
        }
    }
}

impl Slot for Option<Tree> {
    fn collect(&self, name: &'static str, out: &mut Vec<Field>) {
        if let Some(tree) = self {
            tree.collect(name, out);
        }
    }

    fn assign(&mut self, name: &'static str, value: FieldValue) -> Result<(), FieldError> {
        match value {
            FieldValue::Tree(tree) => {
                *self = tree;
                Ok(())
            }
            other => Err(FieldError::Mismatch {
                field: name,
                expected: "an optional tree",
                found: other.describe(),
            }),
        }
    }
}

impl Slot for NodeList {
    fn collect(&self, name: &'static str, out: &mut Vec<Field>) {
        out.push(Field {
            name,
            value: FieldValue::List(self.clone()),
        });
    }

    fn assign(&mut self, name: &'static str, value: FieldValue) -> Result<(), FieldError> {
        match value {
            FieldValue::List(list) => {
                *self = list;
                Ok(())
            }
            other => Err(FieldError::Mismatch {
                field: name,
                expected: "a list",
                found: other.describe(),
            }),
        }
    }
}

impl Slot for Option<NodeList> {
    fn collect(&self, name: &'static str, out: &mut Vec<Field>) {
        if let Some(list) = self {
            list.collect(name, out);
        }
    }

    fn assign(&mut self, name: &'static str, value: FieldValue) -> Result<(), FieldError> {
        match value {
            FieldValue::List(list) => {
                *self = Some(list);
                Ok(())
            }
            other => Err(FieldError::Mismatch {
                field: name,
                expected: "a list",
                found: other.describe(),
            }),
        }
    }
}
