//! AST node definitions for the Luma language.
//!
//! The tree is a family of sealed sum types; every consumer matches
//! exhaustively, so adding a node kind is a compile error at each phase
//! boundary until it is handled. Nodes that errors can point at carry a
//! [`Span`].

use lumac_lex::TypeKw;
use lumac_util::{Span, Symbol};
use std::fmt;

/// Root node: an ordered list of function definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

/// Function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name; also its export name in the emitted module.
    pub name: Symbol,

    /// Parameters in declaration order.
    pub params: Vec<Param>,

    /// Declared return type.
    pub ret_ty: Ty,

    /// Function body.
    pub body: Block,

    /// Location of the function name.
    pub span: Span,
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub ty: Ty,
}

/// Block of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `return expr;`
    Return(ReturnStmt),

    /// `if (cond) { ... } else { ... }`
    If(IfStmt),

    /// `while (cond) { ... }`
    While(WhileStmt),

    /// `let name: ty = init;`
    Let(LetStmt),

    /// `name op expr;` where op is `=`, `+=`, `-=`, `*=`, or `/=`
    Assign(AssignStmt),

    /// `free(ptr);`
    Free(FreeStmt),

    /// Bare expression statement
    Expr(Expr),
}

/// Return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

/// If statement with optional else block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

/// While loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// Variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Symbol,
    pub ty: Ty,
    pub init: Expr,
    pub span: Span,
}

/// Variable assignment, simple or compound.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: Symbol,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

/// Heap deallocation statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeStmt {
    pub ptr: Expr,
    pub span: Span,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
}

impl AssignOp {
    /// The underlying binary operator of a compound assignment, or `None`
    /// for plain `=`.
    pub fn compound_op(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
        };
        f.write_str(s)
    }
}

/// Expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(NumberLit),

    /// String literal (parsed but not lowered by the generator)
    Str(StrLit),

    /// Variable reference
    Ident(IdentExpr),

    /// Binary operation
    Binary(Box<BinaryExpr>),

    /// `alloc(ty, count)` - typed heap allocation
    Alloc(Box<AllocExpr>),

    /// `sizeof(ty)` - byte size of a type
    Sizeof(SizeofExpr),

    /// `&expr` - address-of
    AddrOf(Box<AddrOfExpr>),

    /// `@expr` - pointer dereference
    Deref(Box<DerefExpr>),
}

impl Expr {
    /// The source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(n) => n.span,
            Expr::Str(s) => s.span,
            Expr::Ident(i) => i.span,
            Expr::Binary(b) => b.span,
            Expr::Alloc(a) => a.span,
            Expr::Sizeof(s) => s.span,
            Expr::AddrOf(a) => a.span,
            Expr::Deref(d) => d.span,
        }
    }
}

/// Numeric literal.
///
/// Stored as `f64` whether the token was an integer or a float; the
/// generator truncates to `i32` when lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLit {
    pub value: f64,
    pub span: Span,
}

/// String literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: Symbol,
    pub span: Span,
}

/// Variable reference.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr {
    pub name: Symbol,
    pub span: Span,
}

/// Binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

/// Typed heap allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocExpr {
    /// Element type being allocated.
    pub ty: Ty,
    /// Element count expression.
    pub count: Expr,
    pub span: Span,
}

/// Byte size of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeofExpr {
    pub ty: Ty,
    pub span: Span,
}

/// Address-of expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AddrOfExpr {
    pub expr: Expr,
    pub span: Span,
}

/// Pointer dereference expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DerefExpr {
    pub ptr: Expr,
    pub span: Span,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// Type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    I32,
    I64,
    F32,
    F64,
    /// The `string` type; tokens exist but no codegen is defined for it.
    Str,
    /// `ptr<T>` - a byte offset into linear memory.
    Ptr(Box<Ty>),
}

impl From<TypeKw> for Ty {
    fn from(kw: TypeKw) -> Self {
        match kw {
            TypeKw::I32 => Ty::I32,
            TypeKw::I64 => Ty::I64,
            TypeKw::F32 => Ty::F32,
            TypeKw::F64 => Ty::F64,
            TypeKw::String => Ty::Str,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::I32 => f.write_str("i32"),
            Ty::I64 => f.write_str("i64"),
            Ty::F32 => f.write_str("f32"),
            Ty::F64 => f.write_str("f64"),
            Ty::Str => f.write_str("string"),
            Ty::Ptr(inner) => write!(f, "ptr<{}>", inner),
        }
    }
}
