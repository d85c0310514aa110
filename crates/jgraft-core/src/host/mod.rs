//! Host tree model
//!
//! The front end hands the core a tree of shared, identity-bearing nodes
//! whose child sequences are persistent cons lists. Nothing in this module
//! knows about wrapper nodes, comments or printing; it is the representation
//! those layers are written against.

mod fields;
mod flags;
mod list;
mod log;
mod maker;
mod ops;
mod tree;

pub use fields::{Field, FieldError, FieldValue};
pub use flags::Flags;
pub use list::{Element, Iter, NodeList};
pub use log::{DiagnosticHost, DiagnosticKind, DiagnosticLog, HostDiagnostic};
pub use maker::TreeMaker;
pub use ops::{BinaryOp, BoundKind, LambdaParams, LiteralKind, PrimitiveKind, UnaryOp, prec};
pub use tree::*;
