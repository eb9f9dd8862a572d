use anyhow::Result;

use go2py::ast::{self, BinOp, LitKind, UnaryOp};
use go2py::lower::{augmented_op, lower_expr, lower_exprs_tuple};
use go2py::printer::Writer;
use go2py::pyast as py;

fn ident(name: &str) -> ast::Expr {
    ast::Expr::Ident {
        name: name.to_string(),
    }
}

fn int_lit(value: &str) -> ast::Expr {
    ast::Expr::BasicLit {
        kind: LitKind::Int,
        value: value.to_string(),
    }
}

fn binary(left: ast::Expr, op: BinOp, right: ast::Expr) -> ast::Expr {
    ast::Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn key_value(key: ast::Expr, value: ast::Expr) -> ast::Expr {
    ast::Expr::KeyValue {
        key: Box::new(key),
        value: Box::new(value),
    }
}

/// Lowers one source expression and prints the result.
fn translate(expr: &ast::Expr) -> Result<String> {
    let lowered = lower_expr(expr)?;
    render_expr(&lowered)
}

fn render_expr(expr: &py::Expr) -> Result<String> {
    let mut buf = Vec::new();
    Writer::new(&mut buf).write_expr(expr)?;
    Ok(String::from_utf8(buf)?)
}

fn render_module(module: &py::Module) -> Result<String> {
    let mut buf = Vec::new();
    Writer::new(&mut buf).write_module(module)?;
    Ok(String::from_utf8(buf)?)
}

#[test]
fn arithmetic_translates_with_minimal_parentheses() -> Result<()> {
    let bare = binary(
        int_lit("1"),
        BinOp::Add,
        binary(int_lit("2"), BinOp::Mul, int_lit("3")),
    );
    assert_eq!(translate(&bare)?, "1 + 2 * 3");

    let grouped = binary(
        ast::Expr::Paren {
            inner: Box::new(binary(int_lit("1"), BinOp::Add, int_lit("2"))),
        },
        BinOp::Mul,
        int_lit("3"),
    );
    assert_eq!(translate(&grouped)?, "(1 + 2) * 3");
    Ok(())
}

#[test]
fn logical_chain_translates_to_and_or() -> Result<()> {
    let source = binary(
        binary(ident("a"), BinOp::LogAnd, ident("b")),
        BinOp::LogOr,
        ident("c"),
    );
    assert_eq!(translate(&source)?, "a and b or c");
    Ok(())
}

#[test]
fn bit_clear_translates_to_and_of_complement() -> Result<()> {
    let source = binary(ident("x"), BinOp::AndNot, ident("y"));
    assert_eq!(translate(&source)?, "x & ~y");
    Ok(())
}

#[test]
fn quotient_translates_to_floor_division() -> Result<()> {
    let source = binary(ident("total"), BinOp::Quo, ident("count"));
    assert_eq!(translate(&source)?, "total // count");
    Ok(())
}

#[test]
fn struct_literals_translate_to_constructor_calls() -> Result<()> {
    let keyed = ast::Expr::CompositeLit {
        type_expr: Some(Box::new(ident("Point"))),
        elems: vec![
            key_value(ident("X"), int_lit("1")),
            key_value(ident("Y"), int_lit("2")),
        ],
    };
    assert_eq!(translate(&keyed)?, "Point(X=1, Y=2)");

    let positional = ast::Expr::CompositeLit {
        type_expr: Some(Box::new(ident("Point"))),
        elems: vec![int_lit("1"), int_lit("2")],
    };
    assert_eq!(translate(&positional)?, "Point(1, 2)");
    Ok(())
}

#[test]
fn container_literals_translate_to_displays() -> Result<()> {
    let slice_lit = ast::Expr::CompositeLit {
        type_expr: Some(Box::new(ast::Expr::ArrayType {
            len: None,
            elem: Box::new(ident("int")),
        })),
        elems: vec![int_lit("1"), int_lit("2"), int_lit("3")],
    };
    assert_eq!(translate(&slice_lit)?, "[1, 2, 3]");

    let map_lit = ast::Expr::CompositeLit {
        type_expr: Some(Box::new(ast::Expr::MapType {
            key: Box::new(ident("string")),
            value: Box::new(ident("int")),
        })),
        elems: vec![key_value(
            ast::Expr::BasicLit {
                kind: LitKind::Str,
                value: "\"a\"".to_string(),
            },
            int_lit("1"),
        )],
    };
    assert_eq!(translate(&map_lit)?, "{\"a\": 1}");
    Ok(())
}

#[test]
fn make_translates_to_comprehension_or_empty_dict() -> Result<()> {
    let slice = ast::Expr::Call {
        func: Box::new(ident("make")),
        args: vec![
            ast::Expr::ArrayType {
                len: None,
                elem: Box::new(ident("int")),
            },
            int_lit("3"),
        ],
        ellipsis: false,
    };
    assert_eq!(translate(&slice)?, "[0 for _ in range(3)]");

    let map = ast::Expr::Call {
        func: Box::new(ident("make")),
        args: vec![ast::Expr::MapType {
            key: Box::new(ident("string")),
            value: Box::new(ident("int")),
        }],
        ellipsis: false,
    };
    assert_eq!(translate(&map)?, "{}");
    Ok(())
}

#[test]
fn make_of_named_struct_elements_builds_fresh_zeros() -> Result<()> {
    let source = ast::Expr::Call {
        func: Box::new(ident("make")),
        args: vec![
            ast::Expr::ArrayType {
                len: None,
                elem: Box::new(ident("Point")),
            },
            ident("n"),
        ],
        ellipsis: false,
    };
    assert_eq!(translate(&source)?, "[Point() for _ in range(n)]");
    Ok(())
}

#[test]
fn indexing_and_slicing_translate_to_subscripts() -> Result<()> {
    let index = ast::Expr::Index {
        value: Box::new(ident("a")),
        index: Box::new(ident("i")),
    };
    assert_eq!(translate(&index)?, "a[i]");

    let from = ast::Expr::Slice {
        value: Box::new(ident("a")),
        low: Some(Box::new(int_lit("1"))),
        high: None,
        max: None,
    };
    assert_eq!(translate(&from)?, "a[1:]");

    let to = ast::Expr::Slice {
        value: Box::new(ident("a")),
        low: None,
        high: Some(Box::new(ident("n"))),
        max: None,
    };
    assert_eq!(translate(&to)?, "a[:n]");

    let full = ast::Expr::Slice {
        value: Box::new(ident("a")),
        low: None,
        high: None,
        max: None,
    };
    assert_eq!(translate(&full)?, "a[:]");
    Ok(())
}

#[test]
fn selector_chains_translate_to_attributes() -> Result<()> {
    let source = ast::Expr::Call {
        func: Box::new(ast::Expr::Selector {
            value: Box::new(ast::Expr::Selector {
                value: Box::new(ident("shape")),
                field: "origin".to_string(),
            }),
            field: "distance".to_string(),
        }),
        args: vec![ident("other")],
        ellipsis: false,
    };
    assert_eq!(translate(&source)?, "shape.origin.distance(other)");
    Ok(())
}

#[test]
fn address_of_vanishes_in_translation() -> Result<()> {
    let source = ast::Expr::Unary {
        op: UnaryOp::Addr,
        operand: Box::new(ast::Expr::CompositeLit {
            type_expr: Some(Box::new(ident("Point"))),
            elems: vec![int_lit("1"), int_lit("2")],
        }),
    };
    assert_eq!(translate(&source)?, "Point(1, 2)");
    Ok(())
}

#[test]
fn uniform_left_associative_trees_print_without_parentheses() -> Result<()> {
    // Left-grouped chains of one operator stay bare; each right-grouping
    // introduces exactly one pair.
    let mut left_grouped = ident("a");
    for name in ["b", "c", "d"] {
        left_grouped = binary(left_grouped, BinOp::Sub, ident(name));
    }
    assert_eq!(translate(&left_grouped)?, "a - b - c - d");

    let mut right_grouped = ident("d");
    for name in ["c", "b", "a"] {
        right_grouped = binary(ident(name), BinOp::Sub, right_grouped);
    }
    assert_eq!(translate(&right_grouped)?, "a - (b - (c - d))");
    Ok(())
}

#[test]
fn multiple_results_translate_to_one_tuple() -> Result<()> {
    let lowered = lower_exprs_tuple(&[ident("quot"), ident("rem")])?;
    let module = py::Module {
        body: vec![py::Stmt::Return {
            value: Some(lowered),
        }],
    };
    assert_eq!(render_module(&module)?, "return quot, rem\n");
    Ok(())
}

#[test]
fn augmented_assignment_translates_end_to_end() -> Result<()> {
    let stmt = py::Stmt::AugAssign {
        target: py::Expr::Name {
            id: "n".to_string(),
        },
        op: augmented_op(BinOp::Quo)?,
        value: py::Expr::Num {
            value: "2".to_string(),
        },
    };
    let module = py::Module { body: vec![stmt] };
    assert_eq!(render_module(&module)?, "n //= 2\n");
    Ok(())
}

#[test]
fn translated_function_renders_as_an_indented_block() -> Result<()> {
    let below = lower_expr(&binary(ident("x"), BinOp::Lss, ident("lo")))?;
    let above = lower_expr(&binary(ident("x"), BinOp::Gtr, ident("hi")))?;
    let module = py::Module {
        body: vec![py::Stmt::FunctionDef {
            name: "clamp".to_string(),
            args: py::Arguments {
                args: vec!["x".to_string(), "lo".to_string(), "hi".to_string()],
                defaults: Vec::new(),
            },
            body: vec![py::Stmt::If {
                test: below,
                body: vec![py::Stmt::Return {
                    value: Some(lower_expr(&ident("lo"))?),
                }],
                orelse: vec![py::Stmt::If {
                    test: above,
                    body: vec![py::Stmt::Return {
                        value: Some(lower_expr(&ident("hi"))?),
                    }],
                    orelse: vec![py::Stmt::Return {
                        value: Some(lower_expr(&ident("x"))?),
                    }],
                }],
            }],
        }],
    };
    let expected = "\ndef clamp(x, lo, hi):\n    if x < lo:\n        return lo\n    elif x > hi:\n        return hi\n    else:\n        return x\n";
    assert_eq!(render_module(&module)?, expected);
    Ok(())
}

#[test]
fn unsupported_constructs_abort_with_a_named_cause() {
    let recv = ast::Expr::Unary {
        op: UnaryOp::Recv,
        operand: Box::new(ident("ch")),
    };
    let err = lower_expr(&recv).expect_err("expected failure");
    assert_eq!(
        err.to_string(),
        "Unsupported construct: channel receive"
    );

    let variadic = ast::Expr::Call {
        func: Box::new(ident("append")),
        args: vec![ident("xs")],
        ellipsis: true,
    };
    let err = lower_expr(&variadic).expect_err("expected failure");
    assert!(err.to_string().contains("variadic call argument"));
}
