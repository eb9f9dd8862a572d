//! Zero values for source types.
//!
//! `make` of a slice and fixed-length array zeroing need an expression that
//! evaluates to the default value of the element type. The mapping is purely
//! syntactic: named numeric types count to zero, a named non-builtin type is
//! assumed to construct with no arguments, and reference-like types default
//! to the target's null constant.

use crate::ast;
use crate::lower::{LowerError, LowerResult, lower_expr};
use crate::pyast as py;

pub fn zero_value(type_expr: &ast::Expr) -> LowerResult<py::Expr> {
    match type_expr {
        ast::Expr::Ident { name } => Ok(zero_for_named(name)),
        ast::Expr::ArrayType {
            len: Some(len),
            elem,
        } => Ok(py::Expr::ListComp {
            elt: Box::new(zero_value(elem)?),
            generators: vec![py::Comprehension {
                target: py::Expr::Name {
                    id: "_".to_string(),
                },
                iter: py::Expr::Call {
                    func: Box::new(py::Expr::Name {
                        id: "range".to_string(),
                    }),
                    args: vec![lower_expr(len)?],
                    keywords: Vec::new(),
                },
                ifs: Vec::new(),
            }],
        }),
        ast::Expr::ArrayType { len: None, .. }
        | ast::Expr::Star { .. }
        | ast::Expr::MapType { .. }
        | ast::Expr::ChanType { .. }
        | ast::Expr::FuncType
        | ast::Expr::InterfaceType => Ok(py::Expr::NameConstant {
            value: py::Singleton::None,
        }),
        other => Err(LowerError::Unsupported {
            construct: format!("zero value of {}", other.kind()),
        }),
    }
}

fn zero_for_named(name: &str) -> py::Expr {
    match name {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "uintptr" | "byte" | "rune" | "float32" | "float64" => py::Expr::Num {
            value: "0".to_string(),
        },
        "bool" => py::Expr::NameConstant {
            value: py::Singleton::False,
        },
        "string" => py::Expr::Str {
            value: "\"\"".to_string(),
        },
        // A named type defaults to its no-argument constructor.
        _ => py::Expr::Call {
            func: Box::new(py::Expr::Name {
                id: name.to_string(),
            }),
            args: Vec::new(),
            keywords: Vec::new(),
        },
    }
}
