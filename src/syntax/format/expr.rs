use crate::ast::visit::{self, Visit};
use crate::ast::*;
use crate::span::Spanned;

use super::FormatCtx;

impl FormatCtx {
    /// Emit `expr`, parenthesized if it binds looser than `prec`.
    pub(super) fn emit_expr(&mut self, expr: &Spanned<Expr>, prec: Precedence, indent: &str) {
        let parens = expr.node.precedence() < prec;
        if parens {
            self.output.push('(');
        }
        self.emit_expr_inner(&expr.node, indent);
        if parens {
            self.output.push(')');
        }
    }

    /// Emit an expression where a bare `in` would end a `for` initializer.
    pub(super) fn emit_no_in(&mut self, expr: &Spanned<Expr>, prec: Precedence, indent: &str) {
        if mentions_in(&expr.node) {
            self.output.push('(');
            self.emit_expr(expr, Precedence::Sequence, indent);
            self.output.push(')');
        } else {
            self.emit_expr(expr, prec, indent);
        }
    }

    fn emit_expr_inner(&mut self, expr: &Expr, indent: &str) {
        match expr {
            Expr::Ident(name) => self.output.push_str(name),
            Expr::This => self.output.push_str("this"),
            Expr::Literal(lit) => self.output.push_str(&lit.raw),
            Expr::Array(items) => self.emit_array(items, indent),
            Expr::Object(props) => self.emit_object(props, indent),
            Expr::Function(func) => self.emit_function(func, indent),
            Expr::Member { object, property } => {
                if is_integer_literal(&object.node) {
                    // `1.toString()` would lex as a malformed number.
                    self.output.push('(');
                    self.emit_expr(object, Precedence::Sequence, indent);
                    self.output.push(')');
                } else {
                    self.emit_expr(object, Precedence::Call, indent);
                }
                match property {
                    MemberProp::Ident(name) => {
                        self.output.push('.');
                        self.output.push_str(&name.node);
                    }
                    MemberProp::Computed(index) => {
                        self.output.push('[');
                        self.emit_expr(index, Precedence::Sequence, indent);
                        self.output.push(']');
                    }
                }
            }
            Expr::Call { callee, args } => {
                self.emit_expr(callee, Precedence::Call, indent);
                self.emit_args(args, indent);
            }
            Expr::New { callee, args } => {
                self.output.push_str("new ");
                if contains_call(&callee.node) {
                    self.output.push('(');
                    self.emit_expr(callee, Precedence::Sequence, indent);
                    self.output.push(')');
                } else {
                    self.emit_expr(callee, Precedence::New, indent);
                }
                self.emit_args(args, indent);
            }
            Expr::Update { op, prefix, arg } => {
                if *prefix {
                    self.output.push_str(op.as_str());
                    self.emit_expr(arg, Precedence::Unary, indent);
                } else {
                    self.emit_expr(arg, Precedence::Call, indent);
                    self.output.push_str(op.as_str());
                }
            }
            Expr::Unary { op, arg } => {
                self.output.push_str(op.as_str());
                if op.is_word() {
                    self.output.push(' ');
                }
                let mark = self.output.len();
                self.emit_expr(arg, Precedence::Unary, indent);
                // `- -a` and `+ +a` must not fuse into `--a` / `++a`.
                let sign = match op {
                    UnaryOp::Neg => Some('-'),
                    UnaryOp::Plus => Some('+'),
                    _ => None,
                };
                if sign.is_some() && self.output[mark..].chars().next() == sign {
                    self.output.insert(mark, ' ');
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                self.emit_expr(lhs, prec, indent);
                self.output.push(' ');
                self.output.push_str(op.as_str());
                self.output.push(' ');
                self.emit_expr(rhs, prec.tighter(), indent);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.emit_expr(test, Precedence::LogicalOr, indent);
                self.output.push_str(" ? ");
                self.emit_expr(consequent, Precedence::Assignment, indent);
                self.output.push_str(" : ");
                self.emit_expr(alternate, Precedence::Assignment, indent);
            }
            Expr::Assign { op, target, value } => {
                self.emit_expr(target, Precedence::Call, indent);
                self.output.push(' ');
                self.output.push_str(op.as_str());
                self.output.push(' ');
                self.emit_expr(value, Precedence::Assignment, indent);
            }
            Expr::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.emit_expr(item, Precedence::Assignment, indent);
                }
            }
        }
    }

    fn emit_args(&mut self, args: &[Spanned<Expr>], indent: &str) {
        self.output.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.emit_expr(arg, Precedence::Assignment, indent);
        }
        self.output.push(')');
    }

    /// Arrays with more than one element put each element on its own line.
    fn emit_array(&mut self, items: &[Option<Spanned<Expr>>], indent: &str) {
        if items.is_empty() {
            self.output.push_str("[]");
            return;
        }
        let multiline = items.len() > 1;
        let inner = self.nested(indent);
        self.output.push('[');
        for (i, item) in items.iter().enumerate() {
            if multiline {
                self.newline();
                self.output.push_str(&inner);
            }
            match item {
                Some(item) => {
                    let item_indent = if multiline { inner.as_str() } else { indent };
                    self.emit_expr(item, Precedence::Assignment, item_indent);
                }
                // A trailing hole needs its own comma to survive.
                None if i + 1 == items.len() => self.output.push(','),
                None => {}
            }
            if i + 1 < items.len() {
                self.output.push(',');
            }
        }
        if multiline {
            self.newline();
            self.output.push_str(indent);
        }
        self.output.push(']');
    }

    /// `{ key: value }` on one line for a single short property, otherwise
    /// one property per line.
    fn emit_object(&mut self, props: &[Property], indent: &str) {
        match props {
            [] => self.output.push_str("{}"),
            [only] if !spans_lines(&only.value) => {
                self.output.push_str("{ ");
                self.emit_property(only, indent);
                self.output.push_str(" }");
            }
            _ => {
                let inner = self.nested(indent);
                self.output.push('{');
                for (i, prop) in props.iter().enumerate() {
                    self.newline();
                    self.output.push_str(&inner);
                    self.emit_property(prop, &inner);
                    if i + 1 < props.len() {
                        self.output.push(',');
                    }
                }
                self.newline();
                self.output.push_str(indent);
                self.output.push('}');
            }
        }
    }

    fn emit_property(&mut self, prop: &Property, indent: &str) {
        let key = match &prop.key.node {
            PropKey::Ident(name) => name,
            PropKey::String(raw) | PropKey::Number(raw) => raw,
        };
        let accessor = match prop.kind {
            PropKind::Init => None,
            PropKind::Get => Some("get "),
            PropKind::Set => Some("set "),
        };
        match (accessor, prop.value.node.as_function()) {
            (Some(word), Some(func)) => {
                self.output.push_str(word);
                self.output.push_str(key);
                self.emit_params(&func.params);
                self.output.push(' ');
                self.emit_block(&func.body.node.stmts, func.body.span, indent);
            }
            _ => {
                self.output.push_str(key);
                self.output.push_str(": ");
                self.emit_expr(&prop.value, Precedence::Assignment, indent);
            }
        }
    }
}

fn is_integer_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal {
            kind: LitKind::Number,
            raw,
        }) => raw.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// A call reachable through the callee's member chain: `new (a().b)`
/// needs the parentheses to keep the call out of the `new`.
fn contains_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } => contains_call(&object.node),
        _ => false,
    }
}

/// Whether the printed form of `expr` contains a line break.
fn spans_lines(expr: &Spanned<Expr>) -> bool {
    let mut finder = LineBreakFinder(false);
    finder.visit_expr(expr);
    finder.0
}

struct LineBreakFinder(bool);

impl Visit for LineBreakFinder {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        if self.0 {
            return;
        }
        match &expr.node {
            Expr::Function(_) => self.0 = true,
            Expr::Array(items) if items.len() > 1 => self.0 = true,
            Expr::Object(props) if props.len() > 1 => self.0 = true,
            _ => visit::walk_expr(self, expr),
        }
    }
}

/// An `in` operator outside any nested function or brackets.
fn mentions_in(expr: &Expr) -> bool {
    match expr {
        Expr::Binary { op: BinOp::In, .. } => true,
        Expr::Binary { lhs, rhs, .. } => mentions_in(&lhs.node) || mentions_in(&rhs.node),
        Expr::Assign { value, .. } => mentions_in(&value.node),
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => mentions_in(&test.node) || mentions_in(&consequent.node) || mentions_in(&alternate.node),
        Expr::Sequence(items) => items.iter().any(|item| mentions_in(&item.node)),
        Expr::Unary { arg, .. } => mentions_in(&arg.node),
        _ => false,
    }
}
