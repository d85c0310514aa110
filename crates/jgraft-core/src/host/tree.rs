//! Host tree nodes
//!
//! A [`Tree`] is a shared handle to one node. Handles are compared by
//! identity only: two structurally equal nodes are different nodes. The kind
//! sits behind a `RefCell` so the splicer can write one field of an otherwise
//! immutable node.

use super::fields::{Field, FieldError, FieldValue, Slot};
use super::flags::Flags;
use super::list::NodeList;
use super::ops::{BinaryOp, BoundKind, LambdaParams, LiteralKind, PrimitiveKind, UnaryOp};
use biome_text_size::{TextRange, TextSize};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub type Tree = Rc<JTree>;

pub struct JTree {
    span: Cell<Option<TextRange>>,
    kind: RefCell<TreeKind>,
}

impl JTree {
    pub fn new(kind: impl Into<TreeKind>) -> Tree {
        Rc::new(Self {
            span: Cell::new(None),
            kind: RefCell::new(kind.into()),
        })
    }

    pub fn with_span(kind: impl Into<TreeKind>, span: Option<TextRange>) -> Tree {
        let tree = Self::new(kind);
        tree.span.set(span);
        tree
    }

    /// Source range, `None` for synthesized nodes
    pub fn span(&self) -> Option<TextRange> {
        self.span.get()
    }

    pub fn set_span(&self, span: Option<TextRange>) {
        self.span.set(span);
    }

    pub fn start(&self) -> Option<TextSize> {
        self.span().map(|span| span.start())
    }

    pub fn end(&self) -> Option<TextSize> {
        self.span().map(|span| span.end())
    }

    pub fn kind(&self) -> Ref<'_, TreeKind> {
        self.kind.borrow()
    }

    pub fn kind_mut(&self) -> RefMut<'_, TreeKind> {
        self.kind.borrow_mut()
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().name()
    }
}

impl fmt::Debug for JTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span() {
            Some(span) => write!(f, "{}@{:?}", self.kind_name(), span),
            None => write!(f, "{}@synthetic", self.kind_name()),
        }
    }
}

/// Identity key for host nodes in hash sets and maps
#[derive(Clone)]
pub struct TreeKey(Tree);

impl TreeKey {
    pub fn new(tree: &Tree) -> Self {
        Self(tree.clone())
    }

    pub fn tree(&self) -> &Tree {
        &self.0
    }
}

impl PartialEq for TreeKey {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TreeKey {}

impl Hash for TreeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for TreeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeKey({:p})", Rc::as_ptr(&self.0))
    }
}

/// Declares the node kinds together with their child-valued fields.
///
/// The bracketed list names, in source order, the fields that hold child
/// trees or child lists; it is the descriptor table behind `fields` and
/// `set_field`. Update it whenever a node struct gains a child field.
macro_rules! tree_kinds {
    ($($variant:ident [$($field:ident),*]),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TreeKind {
            $($variant($variant),)*
        }

        impl TreeKind {
            pub fn name(&self) -> &'static str {
                match self {
                    $(TreeKind::$variant(_) => stringify!($variant),)*
                }
            }

            /// Child-valued fields in source order; absent optional fields are left out
            pub fn fields(&self) -> Vec<Field> {
                #[allow(unused_mut)]
                let mut out = Vec::new();
                match self {
                    $(TreeKind::$variant(_node) => {
                        $(Slot::collect(&_node.$field, stringify!($field), &mut out);)*
                    })*
                }
                out
            }

            /// Overwrite one child-valued field by name
            pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
                match self {
                    $(TreeKind::$variant(_node) => {
                        $(if name == stringify!($field) {
                            return Slot::assign(&mut _node.$field, stringify!($field), value);
                        })*
                        let _ = value;
                        Err(FieldError::Unknown {
                            kind: stringify!($variant),
                            field: name.to_string(),
                        })
                    })*
                }
            }
        }

        $(impl From<$variant> for TreeKind {
            fn from(node: $variant) -> Self {
                TreeKind::$variant(node)
            }
        })*
    };
}

tree_kinds! {
    CompilationUnit [package, defs],
    PackageDecl [annotations, pid],
    Import [qualid],
    ClassDecl [mods, typarams, extending, implementing, defs],
    MethodDecl [mods, typarams, restype, params, thrown, default_value, body],
    VariableDecl [mods, vartype, init],
    Modifiers [annotations],
    Annotation [annotation_type, args],
    TypeParameter [bounds],
    Block [stats],
    Skip [],
    DoWhileLoop [body, cond],
    WhileLoop [cond, body],
    ForLoop [init, cond, step, body],
    EnhancedForLoop [var, expr, body],
    LabeledStatement [body],
    Switch [selector, cases],
    Case [pats, stats],
    Synchronized [lock, body],
    Try [resources, body, catchers, finalizer],
    Catch [param, body],
    If [cond, then_part, else_part],
    ExpressionStatement [expr],
    Break [],
    Continue [],
    Return [expr],
    Throw [expr],
    Assert [cond, detail],
    Conditional [cond, true_part, false_part],
    MethodInvocation [meth, typeargs, args],
    NewClass [encl, typeargs, clazz, args, def],
    NewArray [elemtype, dims, elems],
    Parens [expr],
    Assign [lhs, rhs],
    AssignOp [lhs, rhs],
    Unary [arg],
    Binary [lhs, rhs],
    TypeCast [clazz, expr],
    InstanceOf [expr, clazz],
    ArrayAccess [indexed, index],
    FieldAccess [selected],
    Ident [],
    Literal [],
    Lambda [params, body],
    MemberReference [expr, typeargs],
    PrimitiveType [],
    ArrayType [elemtype],
    TypeApply [clazz, arguments],
    Wildcard [inner],
    TypeUnion [alternatives],
    Erroneous [errs],
}

/// Root of one source file; `defs` holds imports followed by type declarations
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub package: Option<Tree>,
    pub defs: NodeList,
    pub source_file: String,
}

#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub annotations: NodeList,
    pub pid: Tree,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub qualid: Tree,
    pub is_static: bool,
}

/// Class, interface, enum or annotation type; told apart by modifier flags
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub mods: Tree,
    pub name: String,
    pub typarams: NodeList,
    pub extending: Option<Tree>,
    pub implementing: NodeList,
    pub defs: NodeList,
}

/// Method or constructor; constructors are named [`MethodDecl::CONSTRUCTOR_NAME`]
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub mods: Tree,
    pub name: String,
    pub restype: Option<Tree>,
    pub typarams: NodeList,
    pub params: NodeList,
    pub thrown: NodeList,
    pub body: Option<Tree>,
    pub default_value: Option<Tree>,
}

impl MethodDecl {
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";

    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME
    }
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub mods: Tree,
    pub name: String,
    pub vartype: Option<Tree>,
    pub init: Option<Tree>,
}

#[derive(Debug, Clone)]
pub struct Modifiers {
    pub flags: Flags,
    pub annotations: NodeList,
}

/// Annotation; arguments are `Assign(Ident(key), value)` nodes
#[derive(Debug, Clone)]
pub struct Annotation {
    pub annotation_type: Tree,
    pub args: NodeList,
}

#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: NodeList,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub flags: Flags,
    pub stats: NodeList,
}

#[derive(Debug, Clone)]
pub struct Skip;

#[derive(Debug, Clone)]
pub struct DoWhileLoop {
    pub body: Tree,
    pub cond: Tree,
}

#[derive(Debug, Clone)]
pub struct WhileLoop {
    pub cond: Tree,
    pub body: Tree,
}

#[derive(Debug, Clone)]
pub struct ForLoop {
    pub init: NodeList,
    pub cond: Option<Tree>,
    pub step: NodeList,
    pub body: Tree,
}

#[derive(Debug, Clone)]
pub struct EnhancedForLoop {
    pub var: Tree,
    pub expr: Tree,
    pub body: Tree,
}

#[derive(Debug, Clone)]
pub struct LabeledStatement {
    pub label: String,
    pub body: Tree,
}

#[derive(Debug, Clone)]
pub struct Switch {
    pub selector: Tree,
    pub cases: NodeList,
}

/// One `case` or `default` label; `default` has no patterns
#[derive(Debug, Clone)]
pub struct Case {
    pub pats: NodeList,
    pub stats: NodeList,
}

#[derive(Debug, Clone)]
pub struct Synchronized {
    pub lock: Tree,
    pub body: Tree,
}

#[derive(Debug, Clone)]
pub struct Try {
    pub resources: NodeList,
    pub body: Tree,
    pub catchers: NodeList,
    pub finalizer: Option<Tree>,
}

#[derive(Debug, Clone)]
pub struct Catch {
    pub param: Tree,
    pub body: Tree,
}

#[derive(Debug, Clone)]
pub struct If {
    pub cond: Tree,
    pub then_part: Tree,
    pub else_part: Option<Tree>,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expr: Tree,
}

#[derive(Debug, Clone)]
pub struct Break {
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Continue {
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub expr: Option<Tree>,
}

#[derive(Debug, Clone)]
pub struct Throw {
    pub expr: Tree,
}

#[derive(Debug, Clone)]
pub struct Assert {
    pub cond: Tree,
    pub detail: Option<Tree>,
}

#[derive(Debug, Clone)]
pub struct Conditional {
    pub cond: Tree,
    pub true_part: Tree,
    pub false_part: Tree,
}

#[derive(Debug, Clone)]
pub struct MethodInvocation {
    pub typeargs: NodeList,
    pub meth: Tree,
    pub args: NodeList,
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub encl: Option<Tree>,
    pub typeargs: NodeList,
    pub clazz: Tree,
    pub args: NodeList,
    pub def: Option<Tree>,
}

/// `new T[d]...[]`, `new T[]{...}` or a bare `{...}` initializer
#[derive(Debug, Clone)]
pub struct NewArray {
    pub elemtype: Option<Tree>,
    pub dims: NodeList,
    pub elems: Option<NodeList>,
}

#[derive(Debug, Clone)]
pub struct Parens {
    pub expr: Tree,
}

#[derive(Debug, Clone)]
pub struct Assign {
    pub lhs: Tree,
    pub rhs: Tree,
}

#[derive(Debug, Clone)]
pub struct AssignOp {
    pub op: BinaryOp,
    pub lhs: Tree,
    pub rhs: Tree,
}

#[derive(Debug, Clone)]
pub struct Unary {
    pub op: UnaryOp,
    pub arg: Tree,
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub op: BinaryOp,
    pub lhs: Tree,
    pub rhs: Tree,
}

#[derive(Debug, Clone)]
pub struct TypeCast {
    pub clazz: Tree,
    pub expr: Tree,
}

#[derive(Debug, Clone)]
pub struct InstanceOf {
    pub expr: Tree,
    pub clazz: Tree,
}

#[derive(Debug, Clone)]
pub struct ArrayAccess {
    pub indexed: Tree,
    pub index: Tree,
}

#[derive(Debug, Clone)]
pub struct FieldAccess {
    pub selected: Tree,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
}

/// Literal value; strings and chars are stored unescaped
#[derive(Debug, Clone)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub params: NodeList,
    pub body: Tree,
    pub style: LambdaParams,
}

#[derive(Debug, Clone)]
pub struct MemberReference {
    pub expr: Tree,
    pub typeargs: NodeList,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PrimitiveType {
    pub kind: PrimitiveKind,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub elemtype: Tree,
}

#[derive(Debug, Clone)]
pub struct TypeApply {
    pub clazz: Tree,
    pub arguments: NodeList,
}

#[derive(Debug, Clone)]
pub struct Wildcard {
    pub kind: BoundKind,
    pub inner: Option<Tree>,
}

#[derive(Debug, Clone)]
pub struct TypeUnion {
    pub alternatives: NodeList,
}

/// Source the front end could not make sense of; `text` is the raw source
#[derive(Debug, Clone)]
pub struct Erroneous {
    pub errs: NodeList,
    pub text: String,
}
