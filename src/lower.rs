//! Rewrites source expressions into target expressions.
//!
//! Lowering is a pure, total function over the supported subset of source
//! forms: a node either maps to exactly one target node or the traversal
//! aborts with an error naming the offending construct. No state is carried
//! between invocations, so equal inputs always produce structurally equal
//! outputs.

use thiserror::Error;

use crate::ast::{self, BinOp, LitKind, UnaryOp};
use crate::pyast as py;
use crate::zero::zero_value;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LowerError {
    #[error("Unsupported construct: {construct}")]
    Unsupported { construct: String },
    #[error("Malformed syntax tree: {detail}")]
    Malformed { detail: String },
}

pub type LowerResult<T> = Result<T, LowerError>;

fn unsupported(construct: impl Into<String>) -> LowerError {
    LowerError::Unsupported {
        construct: construct.into(),
    }
}

fn malformed(detail: impl Into<String>) -> LowerError {
    LowerError::Malformed {
        detail: detail.into(),
    }
}

/// Lowers one source expression to one target expression.
pub fn lower_expr(expr: &ast::Expr) -> LowerResult<py::Expr> {
    match expr {
        ast::Expr::Ident { name } => Ok(lower_ident(name)),
        ast::Expr::BasicLit { kind, value } => lower_basic_lit(*kind, value),
        ast::Expr::Paren { inner } => lower_expr(inner),
        ast::Expr::Unary { op, operand } => lower_unary(*op, operand),
        ast::Expr::Binary { left, op, right } => lower_binary(left, *op, right),
        ast::Expr::CompositeLit { type_expr, elems } => {
            lower_composite_lit(type_expr.as_deref(), elems)
        }
        ast::Expr::Selector { value, field } => Ok(py::Expr::Attribute {
            value: Box::new(lower_expr(value)?),
            attr: field.clone(),
        }),
        ast::Expr::Index { value, index } => Ok(py::Expr::Subscript {
            value: Box::new(lower_expr(value)?),
            slice: py::Slice::Index {
                value: Box::new(lower_expr(index)?),
            },
        }),
        // The capacity bound of a three-index slice has no counterpart in the
        // two-bound target slice and is dropped.
        ast::Expr::Slice {
            value,
            low,
            high,
            max: _,
        } => Ok(py::Expr::Subscript {
            value: Box::new(lower_expr(value)?),
            slice: py::Slice::Range {
                lower: lower_opt(low.as_deref())?.map(Box::new),
                upper: lower_opt(high.as_deref())?.map(Box::new),
            },
        }),
        ast::Expr::Call {
            func,
            args,
            ellipsis,
        } => lower_call(func, args, *ellipsis),
        ast::Expr::Star { .. } => Err(unsupported("pointer dereference")),
        ast::Expr::KeyValue { .. } => {
            Err(unsupported("key-value expression outside a composite literal"))
        }
        ast::Expr::ArrayType { .. }
        | ast::Expr::MapType { .. }
        | ast::Expr::ChanType { .. }
        | ast::Expr::FuncType
        | ast::Expr::StructType
        | ast::Expr::InterfaceType => {
            Err(unsupported(format!("{} in value position", expr.kind())))
        }
    }
}

/// Absent child expressions lower to absent output, so optional slice bounds
/// pass through.
pub fn lower_opt(expr: Option<&ast::Expr>) -> LowerResult<Option<py::Expr>> {
    expr.map(lower_expr).transpose()
}

pub fn lower_exprs(exprs: &[ast::Expr]) -> LowerResult<Vec<py::Expr>> {
    exprs.iter().map(lower_expr).collect()
}

/// Aggregates several source expressions into a single target expression:
/// one expression stays itself, any other count becomes a tuple. This is the
/// only place that builds tuples.
pub fn lower_exprs_tuple(exprs: &[ast::Expr]) -> LowerResult<py::Expr> {
    let mut lowered = lower_exprs(exprs)?;
    if lowered.len() == 1 {
        Ok(lowered.remove(0))
    } else {
        Ok(py::Expr::Tuple { elts: lowered })
    }
}

/// Maps the operator of a compound assignment. Quotient becomes floor
/// division, and the bit-clear operator has no augmented counterpart.
pub fn augmented_op(op: BinOp) -> LowerResult<py::Operator> {
    match op {
        BinOp::Add => Ok(py::Operator::Add),
        BinOp::Sub => Ok(py::Operator::Sub),
        BinOp::Mul => Ok(py::Operator::Mult),
        BinOp::Quo => Ok(py::Operator::FloorDiv),
        BinOp::Rem => Ok(py::Operator::Mod),
        BinOp::BitAnd => Ok(py::Operator::BitAnd),
        BinOp::BitOr => Ok(py::Operator::BitOr),
        BinOp::BitXor => Ok(py::Operator::BitXor),
        BinOp::Shl => Ok(py::Operator::LShift),
        BinOp::Shr => Ok(py::Operator::RShift),
        other => Err(unsupported(format!(
            "augmented assignment operator {other:?}"
        ))),
    }
}

fn lower_ident(name: &str) -> py::Expr {
    match name {
        "true" => py::Expr::NameConstant {
            value: py::Singleton::True,
        },
        "false" => py::Expr::NameConstant {
            value: py::Singleton::False,
        },
        "nil" => py::Expr::NameConstant {
            value: py::Singleton::None,
        },
        _ => py::Expr::Name {
            id: name.to_string(),
        },
    }
}

fn lower_basic_lit(kind: LitKind, value: &str) -> LowerResult<py::Expr> {
    match kind {
        LitKind::Int | LitKind::Float => Ok(py::Expr::Num {
            value: value.to_string(),
        }),
        LitKind::Char | LitKind::Str => Ok(py::Expr::Str {
            value: value.to_string(),
        }),
        LitKind::Imag => Err(unsupported("imaginary literal")),
        LitKind::RawStr => Err(unsupported("raw string literal")),
    }
}

fn lower_unary(op: UnaryOp, operand: &ast::Expr) -> LowerResult<py::Expr> {
    let target_op = match op {
        UnaryOp::Not => py::UnaryOperator::Not,
        UnaryOp::Pos => py::UnaryOperator::UAdd,
        UnaryOp::Neg => py::UnaryOperator::USub,
        UnaryOp::Invert => py::UnaryOperator::Invert,
        // The target has no address concept; references are implicit.
        UnaryOp::Addr => return lower_expr(operand),
        UnaryOp::Recv => return Err(unsupported("channel receive")),
    };
    Ok(py::Expr::UnaryOp {
        op: target_op,
        operand: Box::new(lower_expr(operand)?),
    })
}

fn comparator(op: BinOp) -> Option<py::CmpOp> {
    match op {
        BinOp::Eql => Some(py::CmpOp::Eq),
        BinOp::Lss => Some(py::CmpOp::Lt),
        BinOp::Gtr => Some(py::CmpOp::Gt),
        BinOp::Neq => Some(py::CmpOp::NotEq),
        BinOp::Leq => Some(py::CmpOp::LtE),
        BinOp::Geq => Some(py::CmpOp::GtE),
        _ => None,
    }
}

fn bin_op(op: BinOp) -> Option<py::Operator> {
    match op {
        BinOp::Add => Some(py::Operator::Add),
        BinOp::Sub => Some(py::Operator::Sub),
        BinOp::Mul => Some(py::Operator::Mult),
        // Integer division; the target's `/` would produce a float.
        BinOp::Quo => Some(py::Operator::FloorDiv),
        BinOp::Rem => Some(py::Operator::Mod),
        BinOp::BitAnd => Some(py::Operator::BitAnd),
        BinOp::BitOr => Some(py::Operator::BitOr),
        BinOp::BitXor => Some(py::Operator::BitXor),
        BinOp::Shl => Some(py::Operator::LShift),
        BinOp::Shr => Some(py::Operator::RShift),
        _ => None,
    }
}

fn bool_op(op: BinOp) -> Option<py::BoolOperator> {
    match op {
        BinOp::LogAnd => Some(py::BoolOperator::And),
        BinOp::LogOr => Some(py::BoolOperator::Or),
        _ => None,
    }
}

fn lower_binary(left: &ast::Expr, op: BinOp, right: &ast::Expr) -> LowerResult<py::Expr> {
    if let Some(cmp) = comparator(op) {
        return Ok(py::Expr::Compare {
            left: Box::new(lower_expr(left)?),
            ops: vec![cmp],
            comparators: vec![lower_expr(right)?],
        });
    }
    if let Some(target_op) = bin_op(op) {
        return Ok(py::Expr::BinOp {
            left: Box::new(lower_expr(left)?),
            op: target_op,
            right: Box::new(lower_expr(right)?),
        });
    }
    if let Some(target_op) = bool_op(op) {
        return Ok(py::Expr::BoolOp {
            op: target_op,
            left: Box::new(lower_expr(left)?),
            right: Box::new(lower_expr(right)?),
        });
    }
    if op == BinOp::AndNot {
        // a &^ b clears the bits of b in a: a & ~b
        return Ok(py::Expr::BinOp {
            left: Box::new(lower_expr(left)?),
            op: py::Operator::BitAnd,
            right: Box::new(py::Expr::UnaryOp {
                op: py::UnaryOperator::Invert,
                operand: Box::new(lower_expr(right)?),
            }),
        });
    }
    Err(unsupported(format!("binary operator {op:?}")))
}

fn lower_composite_lit(
    type_expr: Option<&ast::Expr>,
    elems: &[ast::Expr],
) -> LowerResult<py::Expr> {
    let Some(type_expr) = type_expr else {
        return Err(malformed("composite literal without a type"));
    };
    match type_expr {
        ast::Expr::Ident { name } => lower_struct_lit(name, elems),
        ast::Expr::ArrayType { .. } => Ok(py::Expr::List {
            elts: lower_exprs(elems)?,
        }),
        ast::Expr::MapType { .. } => lower_map_lit(elems),
        other => Err(unsupported(format!("composite literal of {}", other.kind()))),
    }
}

fn lower_struct_lit(name: &str, elems: &[ast::Expr]) -> LowerResult<py::Expr> {
    let keyed = matches!(elems.first(), Some(ast::Expr::KeyValue { .. }));
    let mut args = Vec::new();
    let mut keywords = Vec::new();
    for elem in elems {
        match elem {
            ast::Expr::KeyValue { key, value } if keyed => {
                let ast::Expr::Ident { name: field } = key.as_ref() else {
                    return Err(malformed("struct literal key is not an identifier"));
                };
                keywords.push(py::Keyword {
                    arg: field.clone(),
                    value: lower_expr(value)?,
                });
            }
            ast::Expr::KeyValue { .. } => {
                return Err(malformed(
                    "struct literal mixes keyed and positional elements",
                ));
            }
            _ if keyed => {
                return Err(malformed(
                    "struct literal mixes keyed and positional elements",
                ));
            }
            _ => args.push(lower_expr(elem)?),
        }
    }
    Ok(py::Expr::Call {
        func: Box::new(lower_ident(name)),
        args,
        keywords,
    })
}

fn lower_map_lit(elems: &[ast::Expr]) -> LowerResult<py::Expr> {
    let mut keys = Vec::with_capacity(elems.len());
    let mut values = Vec::with_capacity(elems.len());
    for elem in elems {
        let ast::Expr::KeyValue { key, value } = elem else {
            return Err(malformed("map literal element is not key-value"));
        };
        keys.push(lower_expr(key)?);
        values.push(lower_expr(value)?);
    }
    Ok(py::Expr::Dict { keys, values })
}

fn lower_call(func: &ast::Expr, args: &[ast::Expr], ellipsis: bool) -> LowerResult<py::Expr> {
    if ellipsis {
        return Err(unsupported("variadic call argument"));
    }
    if let ast::Expr::Ident { name } = func
        && name == "make"
    {
        return lower_make(args);
    }
    if is_type_expr(func) {
        // A conversion; the target is dynamically typed, so the value passes
        // through unchanged.
        let [arg] = args else {
            return Err(malformed(format!(
                "conversion takes one argument, found {}",
                args.len()
            )));
        };
        return lower_expr(arg);
    }
    Ok(py::Expr::Call {
        func: Box::new(lower_expr(func)?),
        args: lower_exprs(args)?,
        keywords: Vec::new(),
    })
}

fn lower_make(args: &[ast::Expr]) -> LowerResult<py::Expr> {
    let Some(type_arg) = args.first() else {
        return Err(malformed("make without a type argument"));
    };
    match type_arg {
        ast::Expr::ArrayType { elem, .. } => {
            let Some(length) = args.get(1) else {
                return Err(malformed("make of a slice needs a length"));
            };
            // One comprehension iteration per element: zero values with
            // object identity must not be shared.
            Ok(py::Expr::ListComp {
                elt: Box::new(zero_value(elem)?),
                generators: vec![py::Comprehension {
                    target: py::Expr::Name {
                        id: "_".to_string(),
                    },
                    iter: py::Expr::Call {
                        func: Box::new(py::Expr::Name {
                            id: "range".to_string(),
                        }),
                        args: vec![lower_expr(length)?],
                        keywords: Vec::new(),
                    },
                    ifs: Vec::new(),
                }],
            })
        }
        ast::Expr::MapType { .. } => Ok(py::Expr::Dict {
            keys: Vec::new(),
            values: Vec::new(),
        }),
        other => Err(unsupported(format!("make of {}", other.kind()))),
    }
}

fn is_type_expr(expr: &ast::Expr) -> bool {
    matches!(
        expr,
        ast::Expr::ArrayType { .. }
            | ast::Expr::MapType { .. }
            | ast::Expr::ChanType { .. }
            | ast::Expr::FuncType
            | ast::Expr::StructType
            | ast::Expr::InterfaceType
    )
}
