//! Source-language syntax tree consumed by the lowerer.
//!
//! These nodes mirror the structural shape an external parser produces for a
//! statically-typed, C-family source language: expressions, literals, and the
//! syntactic type forms that composite literals and conversions dispatch on.
//! The lowerer never inspects positions, trivia, or resolved types.

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Ident {
        name: String,
    },
    BasicLit {
        kind: LitKind,
        value: String,
    },
    Paren {
        inner: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// Inner literals of a nested composite may omit their type.
    CompositeLit {
        type_expr: Option<Box<Expr>>,
        elems: Vec<Expr>,
    },
    Selector {
        value: Box<Expr>,
        field: String,
    },
    Index {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        value: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        ellipsis: bool,
    },
    /// Pointer type or pointer dereference, depending on position.
    Star {
        operand: Box<Expr>,
    },
    ArrayType {
        len: Option<Box<Expr>>,
        elem: Box<Expr>,
    },
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType {
        elem: Box<Expr>,
    },
    FuncType,
    StructType,
    InterfaceType,
}

impl Expr {
    /// Variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Ident { .. } => "identifier",
            Expr::BasicLit { .. } => "literal",
            Expr::Paren { .. } => "parenthesized expression",
            Expr::Unary { .. } => "unary expression",
            Expr::Binary { .. } => "binary expression",
            Expr::KeyValue { .. } => "key-value expression",
            Expr::CompositeLit { .. } => "composite literal",
            Expr::Selector { .. } => "selector",
            Expr::Index { .. } => "index expression",
            Expr::Slice { .. } => "slice expression",
            Expr::Call { .. } => "call",
            Expr::Star { .. } => "star expression",
            Expr::ArrayType { .. } => "array type",
            Expr::MapType { .. } => "map type",
            Expr::ChanType { .. } => "channel type",
            Expr::FuncType => "function type",
            Expr::StructType => "struct type",
            Expr::InterfaceType => "interface type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    Str,
    RawStr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// Unary `+`
    Pos,
    /// Unary `-`
    Neg,
    /// Bitwise complement `^`
    Invert,
    /// Address-of `&`
    Addr,
    /// Channel receive `<-`
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    /// Bit clear `&^`
    AndNot,
    LogAnd,
    LogOr,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
}
