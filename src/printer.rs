//! Renders the target syntax tree as indented source text.
//!
//! The writer owns nothing but the output sink and an indentation counter.
//! Expressions are parenthesized by comparing each child's precedence
//! against the context it is printed in, so the emitted text re-parses to a
//! tree with the same grouping while carrying no redundant parentheses.

use std::io::{self, Write};

use thiserror::Error;

use crate::pyast::{
    Arguments, BoolOperator, CmpOp, Comprehension, ExceptHandler, Expr, Keyword, Module, Operator,
    Singleton, Slice, Stmt, UnaryOperator,
};

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Printer invariant violated: {detail}")]
    Invariant { detail: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type PrintResult<T> = Result<T, PrintError>;

fn invariant(detail: impl Into<String>) -> PrintError {
    PrintError::Invariant {
        detail: detail.into(),
    }
}

pub struct Writer<W> {
    out: W,
    indent_level: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent_level: 0,
        }
    }

    pub fn write_module(&mut self, module: &Module) -> PrintResult<()> {
        for stmt in &module.body {
            self.write_stmt(stmt)?;
            self.newline()?;
        }
        Ok(())
    }

    pub fn write_stmt(&mut self, stmt: &Stmt) -> PrintResult<()> {
        match stmt {
            Stmt::FunctionDef { name, args, body } => self.function_def(name, args, body),
            Stmt::ClassDef { name, bases, body } => self.class_def(name, bases, body),
            Stmt::While { test, body } => self.while_stmt(test, body),
            Stmt::Assign { targets, value } => self.assign(targets, value),
            Stmt::AugAssign { target, op, value } => self.aug_assign(target, *op, value),
            Stmt::Return { value } => self.ret(value.as_ref()),
            Stmt::Pass => self.write("pass"),
            Stmt::Break => self.write("break"),
            Stmt::Continue => self.write("continue"),
            Stmt::Delete { targets } => self.delete(targets),
            Stmt::Expr { value } => self.write_expr(value),
            Stmt::If { test, body, orelse } => self.if_stmt(test, body, orelse),
            Stmt::For { target, iter, body } => self.for_stmt(target, iter, body),
            Stmt::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.try_stmt(body, handlers, orelse, finalbody),
            Stmt::Comment { text } => {
                self.write("#")?;
                self.write(text)
            }
            Stmt::DocString { lines } => self.docstring(lines),
        }
    }

    fn write_stmts(&mut self, stmts: &[Stmt]) -> PrintResult<()> {
        for (i, stmt) in stmts.iter().enumerate() {
            if i > 0 {
                self.newline()?;
            }
            self.write_stmt(stmt)?;
        }
        Ok(())
    }

    fn function_def(&mut self, name: &str, args: &Arguments, body: &[Stmt]) -> PrintResult<()> {
        self.newline()?;
        self.write("def ")?;
        self.write(name)?;
        self.write("(")?;
        self.arg_list(args)?;
        self.write(")")?;
        self.write(":")?;
        self.indent()?;
        self.write_stmts(body)?;
        self.dedent();
        Ok(())
    }

    fn class_def(&mut self, name: &str, bases: &[Expr], body: &[Stmt]) -> PrintResult<()> {
        self.newline()?;
        self.write("class ")?;
        self.write(name)?;
        if !bases.is_empty() {
            self.write("(")?;
            for (i, base) in bases.iter().enumerate() {
                if i > 0 {
                    self.write(", ")?;
                }
                self.write_expr(base)?;
            }
            self.write(")")?;
        }
        self.write(":")?;
        self.indent()?;
        self.write_stmts(body)?;
        self.dedent();
        Ok(())
    }

    /// The last `defaults.len()` arguments render as `name=default`.
    fn arg_list(&mut self, args: &Arguments) -> PrintResult<()> {
        if args.defaults.len() > args.args.len() {
            return Err(invariant("more argument defaults than arguments"));
        }
        let default_offset = args.args.len() - args.defaults.len();
        for (i, arg) in args.args.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.write(arg)?;
            if i >= default_offset {
                self.write("=")?;
                self.write_expr(&args.defaults[i - default_offset])?;
            }
        }
        Ok(())
    }

    fn assign(&mut self, targets: &[Expr], value: &Expr) -> PrintResult<()> {
        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.write_expr(target)?;
        }
        self.write(" = ")?;
        self.write_expr(value)
    }

    fn aug_assign(&mut self, target: &Expr, op: Operator, value: &Expr) -> PrintResult<()> {
        self.write_expr(target)?;
        self.write(aug_op_text(op))?;
        self.write_expr(value)
    }

    fn ret(&mut self, value: Option<&Expr>) -> PrintResult<()> {
        match value {
            Some(value) => {
                self.write("return ")?;
                self.write_expr(value)
            }
            None => self.write("return"),
        }
    }

    fn delete(&mut self, targets: &[Expr]) -> PrintResult<()> {
        self.write("del ")?;
        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.write_expr(target)?;
        }
        Ok(())
    }

    fn while_stmt(&mut self, test: &Expr, body: &[Stmt]) -> PrintResult<()> {
        self.write("while ")?;
        self.write_expr(test)?;
        self.write(":")?;
        self.indent()?;
        self.write_stmts(body)?;
        self.dedent();
        Ok(())
    }

    fn for_stmt(&mut self, target: &Expr, iter: &Expr, body: &[Stmt]) -> PrintResult<()> {
        self.write("for ")?;
        self.write_expr(target)?;
        self.write(" in ")?;
        self.write_expr(iter)?;
        self.write(":")?;
        self.indent()?;
        self.write_stmts(body)?;
        self.dedent();
        Ok(())
    }

    fn if_stmt(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> PrintResult<()> {
        self.write("if ")?;
        self.write_expr(test)?;
        self.write(":")?;
        self.indent()?;
        self.write_stmts(body)?;
        self.dedent();
        if !orelse.is_empty() {
            self.newline()?;
            // An else branch holding exactly one if collapses to elif.
            if let [Stmt::If { test, body, orelse }] = orelse {
                self.write("el")?;
                return self.if_stmt(test, body, orelse);
            }
            self.write("else:")?;
            self.indent()?;
            self.write_stmts(orelse)?;
            self.dedent();
        }
        Ok(())
    }

    fn try_stmt(
        &mut self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
    ) -> PrintResult<()> {
        self.write("try:")?;
        self.indent()?;
        self.write_stmts(body)?;
        self.dedent();
        for handler in handlers {
            self.newline()?;
            self.write("except")?;
            if let Some(typ) = &handler.typ {
                self.write(" ")?;
                self.write_expr(typ)?;
                if let Some(name) = &handler.name {
                    self.write(" as ")?;
                    self.write(name)?;
                }
            }
            self.write(":")?;
            self.indent()?;
            self.write_stmts(&handler.body)?;
            self.dedent();
        }
        if !orelse.is_empty() {
            self.newline()?;
            self.write("else:")?;
            self.indent()?;
            self.write_stmts(orelse)?;
            self.dedent();
        }
        if !finalbody.is_empty() {
            self.newline()?;
            self.write("finally:")?;
            self.indent()?;
            self.write_stmts(finalbody)?;
            self.dedent();
        }
        Ok(())
    }

    fn docstring(&mut self, lines: &[String]) -> PrintResult<()> {
        self.write("\"\"\"")?;
        self.newline()?;
        for line in lines {
            self.write(line)?;
            self.newline()?;
        }
        self.write("\"\"\"")
    }

    pub fn write_expr(&mut self, expr: &Expr) -> PrintResult<()> {
        self.write_expr_prec(expr, 0)
    }

    fn write_expr_prec(&mut self, expr: &Expr, parent_prec: u8) -> PrintResult<()> {
        let prec = expr.precedence();
        let paren = prec < parent_prec;
        if paren {
            self.write("(")?;
        }
        match expr {
            Expr::Name { id } => self.write(id)?,
            Expr::NameConstant { value } => self.name_constant(*value)?,
            Expr::Num { value } => self.write(value)?,
            Expr::Str { value } => self.write(value)?,
            Expr::BinOp { left, op, right } => self.bin_op(left, *op, right)?,
            Expr::BoolOp { op, left, right } => self.bool_op(*op, left, right, prec)?,
            Expr::UnaryOp { op, operand } => self.unary_op(*op, operand, prec)?,
            Expr::Compare {
                left,
                ops,
                comparators,
            } => self.compare(left, ops, comparators, prec)?,
            Expr::Call {
                func,
                args,
                keywords,
            } => self.call(func, args, keywords, prec)?,
            Expr::Attribute { value, attr } => {
                self.write_expr_prec(value, prec)?;
                self.write(".")?;
                self.write(attr)?;
            }
            Expr::Subscript { value, slice } => {
                self.write_expr_prec(value, prec)?;
                self.write("[")?;
                self.slice(slice)?;
                self.write("]")?;
            }
            Expr::List { elts } => self.list(elts, prec)?,
            Expr::Dict { keys, values } => self.dict(keys, values, prec)?,
            Expr::Tuple { elts } => self.tuple(elts, parent_prec)?,
            Expr::ListComp { elt, generators } => self.list_comp(elt, generators)?,
            Expr::Starred { value } => {
                self.write("*")?;
                self.write_expr_prec(value, prec)?;
            }
            Expr::Lambda { args, body } => {
                self.write("lambda ")?;
                self.arg_list(args)?;
                self.write(": ")?;
                self.write_expr_prec(body, prec)?;
            }
        }
        if paren {
            self.write(")")?;
        }
        Ok(())
    }

    fn bin_op(&mut self, left: &Expr, op: Operator, right: &Expr) -> PrintResult<()> {
        let prec = op.precedence();
        // Power groups to the right; everything else groups to the left. An
        // equal-precedence operand on the non-grouping side keeps its
        // parentheses so the text re-parses with the same shape.
        let paren_left = left.precedence() == prec && op == Operator::Pow;
        if paren_left {
            self.write("(")?;
        }
        self.write_expr_prec(left, prec)?;
        if paren_left {
            self.write(")")?;
        }
        self.write(op_text(op))?;
        let paren_right = right.precedence() == prec && op != Operator::Pow;
        if paren_right {
            self.write("(")?;
        }
        self.write_expr_prec(right, prec)?;
        if paren_right {
            self.write(")")?;
        }
        Ok(())
    }

    fn bool_op(&mut self, op: BoolOperator, left: &Expr, right: &Expr, prec: u8) -> PrintResult<()> {
        self.write_expr_prec(left, prec)?;
        self.write(match op {
            BoolOperator::And => " and ",
            BoolOperator::Or => " or ",
        })?;
        self.write_expr_prec(right, prec)
    }

    fn unary_op(&mut self, op: UnaryOperator, operand: &Expr, prec: u8) -> PrintResult<()> {
        self.write(match op {
            UnaryOperator::Invert => "~",
            UnaryOperator::Not => "not ",
            UnaryOperator::UAdd => "+",
            UnaryOperator::USub => "-",
        })?;
        self.write_expr_prec(operand, prec)
    }

    fn compare(
        &mut self,
        left: &Expr,
        ops: &[CmpOp],
        comparators: &[Expr],
        prec: u8,
    ) -> PrintResult<()> {
        if ops.is_empty() {
            return Err(invariant("comparison without operators"));
        }
        if ops.len() != comparators.len() {
            return Err(invariant(format!(
                "comparison has {} operators but {} comparators",
                ops.len(),
                comparators.len()
            )));
        }
        self.write_expr_prec(left, prec)?;
        for (op, comparator) in ops.iter().zip(comparators) {
            self.write(cmp_op_text(*op))?;
            self.write_expr_prec(comparator, prec)?;
        }
        Ok(())
    }

    fn call(
        &mut self,
        func: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
        prec: u8,
    ) -> PrintResult<()> {
        self.write_expr_prec(func, prec)?;
        self.write("(")?;
        let mut first = true;
        for arg in args {
            if !first {
                self.write(", ")?;
            }
            self.write_expr_prec(arg, prec)?;
            first = false;
        }
        for keyword in keywords {
            if keyword.arg.is_empty() {
                return Err(invariant("keyword argument without a name"));
            }
            if !first {
                self.write(", ")?;
            }
            self.write(&keyword.arg)?;
            self.write("=")?;
            self.write_expr_prec(&keyword.value, prec)?;
            first = false;
        }
        self.write(")")
    }

    fn tuple(&mut self, elts: &[Expr], parent_prec: u8) -> PrintResult<()> {
        // The empty tuple always needs its parentheses, even where no
        // precedence conflict forces them.
        let paren = parent_prec > 0;
        if !paren && elts.is_empty() {
            self.write("(")?;
        }
        for (i, elt) in elts.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            // Elements bind just above the bare tuple, so a nested tuple
            // keeps its parentheses.
            self.write_expr_prec(elt, 1)?;
        }
        if elts.len() == 1 {
            self.write(",")?;
        }
        if !paren && elts.is_empty() {
            self.write(")")?;
        }
        Ok(())
    }

    fn list(&mut self, elts: &[Expr], prec: u8) -> PrintResult<()> {
        self.write("[")?;
        for (i, elt) in elts.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.write_expr_prec(elt, prec)?;
        }
        self.write("]")
    }

    fn dict(&mut self, keys: &[Expr], values: &[Expr], prec: u8) -> PrintResult<()> {
        if keys.len() != values.len() {
            return Err(invariant(format!(
                "dict has {} keys but {} values",
                keys.len(),
                values.len()
            )));
        }
        self.write("{")?;
        for (i, (key, value)) in keys.iter().zip(values).enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.write_expr_prec(key, prec)?;
            self.write(": ")?;
            self.write_expr_prec(value, prec)?;
        }
        self.write("}")
    }

    fn list_comp(&mut self, elt: &Expr, generators: &[Comprehension]) -> PrintResult<()> {
        self.write("[")?;
        self.write_expr(elt)?;
        for generator in generators {
            self.write(" for ")?;
            self.write_expr(&generator.target)?;
            self.write(" in ")?;
            self.write_expr(&generator.iter)?;
            for if_clause in &generator.ifs {
                self.write(" if ")?;
                self.write_expr(if_clause)?;
            }
        }
        self.write("]")
    }

    fn slice(&mut self, slice: &Slice) -> PrintResult<()> {
        match slice {
            Slice::Index { value } => self.write_expr(value),
            Slice::Range { lower, upper } => {
                if let Some(lower) = lower {
                    self.write_expr(lower)?;
                }
                self.write(":")?;
                if let Some(upper) = upper {
                    self.write_expr(upper)?;
                }
                Ok(())
            }
        }
    }

    fn name_constant(&mut self, value: Singleton) -> PrintResult<()> {
        self.write(match value {
            Singleton::None => "None",
            Singleton::True => "True",
            Singleton::False => "False",
        })
    }

    fn indent(&mut self) -> PrintResult<()> {
        self.indent_level += 1;
        self.newline()
    }

    fn dedent(&mut self) {
        self.indent_level -= 1;
    }

    fn newline(&mut self) -> PrintResult<()> {
        self.write("\n")?;
        for _ in 0..self.indent_level {
            self.write("    ")?;
        }
        Ok(())
    }

    fn write(&mut self, text: &str) -> PrintResult<()> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }
}

fn op_text(op: Operator) -> &'static str {
    match op {
        Operator::Add => " + ",
        Operator::Sub => " - ",
        Operator::Mult => " * ",
        Operator::MatMult => " @ ",
        Operator::Div => " / ",
        Operator::Mod => " % ",
        Operator::Pow => " ** ",
        Operator::LShift => " << ",
        Operator::RShift => " >> ",
        Operator::BitOr => " | ",
        Operator::BitXor => " ^ ",
        Operator::BitAnd => " & ",
        Operator::FloorDiv => " // ",
    }
}

fn cmp_op_text(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => " == ",
        CmpOp::NotEq => " != ",
        CmpOp::Lt => " < ",
        CmpOp::LtE => " <= ",
        CmpOp::Gt => " > ",
        CmpOp::GtE => " >= ",
        CmpOp::Is => " is ",
        CmpOp::IsNot => " is not ",
        CmpOp::In => " in ",
        CmpOp::NotIn => " not in ",
    }
}

fn aug_op_text(op: Operator) -> &'static str {
    match op {
        Operator::Add => " += ",
        Operator::Sub => " -= ",
        Operator::Mult => " *= ",
        Operator::MatMult => " @= ",
        Operator::Div => " /= ",
        Operator::Mod => " %= ",
        Operator::Pow => " **= ",
        Operator::LShift => " <<= ",
        Operator::RShift => " >>= ",
        Operator::BitOr => " |= ",
        Operator::BitXor => " ^= ",
        Operator::BitAnd => " &= ",
        Operator::FloorDiv => " //= ",
    }
}
