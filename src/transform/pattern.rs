//! Structural matching of expressions against partial templates.
//!
//! A [`Pattern`] names only the parts of a node a rule cares about;
//! everything else is a wildcard. Patterns are plain data, built once per
//! rule and compared against every candidate node.

use crate::ast::*;
use crate::span::Spanned;

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// Matches any expression.
    Any,
    /// Matches an expression that does not match the inner pattern.
    Not(Box<Pattern>),
    Ident(Name),
    /// A function literal.
    Function {
        id: Opt<Name>,
        params: Count,
        /// Last statement of the body; `Absent` matches an empty body.
        last_stmt: Opt<Box<StmtPattern>>,
    },
    /// Non-computed member access `object.property`.
    Member {
        object: Box<Pattern>,
        property: Name,
    },
    Call {
        callee: Box<Pattern>,
        args: Args,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtPattern {
    /// An expression statement.
    Expr(Pattern),
    If {
        test: Pattern,
        alternate: Opt<Box<StmtPattern>>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Name {
    Is(String),
    OneOf(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Count {
    Any,
    Exactly(usize),
}

/// Template for an optional child.
#[derive(Clone, Debug, PartialEq)]
pub enum Opt<T> {
    /// Present or not, anything goes.
    Any,
    /// The child must be missing.
    Absent,
    /// The child must exist and match.
    Present(T),
}

/// Template for an argument list.
#[derive(Clone, Debug, PartialEq)]
pub enum Args {
    Any,
    /// The first arguments match, in order; more may follow.
    Prefix(Vec<Pattern>),
    /// The last arguments match, in order; more may precede.
    Suffix(Vec<Pattern>),
    /// Exactly these arguments.
    Exact(Vec<Pattern>),
}

impl Pattern {
    /// Function literal with exactly `n` parameters.
    pub fn function_with_params(n: usize) -> Pattern {
        Pattern::Function {
            id: Opt::Any,
            params: Count::Exactly(n),
            last_stmt: Opt::Any,
        }
    }

    /// Call of a non-computed method named one of `names`.
    pub fn method_call(names: &[&str], args: Args) -> Pattern {
        Pattern::Call {
            callee: Box::new(Pattern::Member {
                object: Box::new(Pattern::Any),
                property: Name::one_of(names),
            }),
            args,
        }
    }
}

impl Name {
    pub fn is(name: &str) -> Name {
        Name::Is(name.to_string())
    }

    pub fn one_of(names: &[&str]) -> Name {
        Name::OneOf(names.iter().map(|n| n.to_string()).collect())
    }

    fn matches(&self, candidate: &str) -> bool {
        match self {
            Name::Is(name) => name == candidate,
            Name::OneOf(names) => names.iter().any(|n| n == candidate),
        }
    }
}

impl Count {
    fn matches(self, n: usize) -> bool {
        match self {
            Count::Any => true,
            Count::Exactly(k) => n == k,
        }
    }
}

impl<T> Opt<T> {
    fn matches<C>(&self, candidate: Option<&C>, inner: impl FnOnce(&T, &C) -> bool) -> bool {
        match (self, candidate) {
            (Opt::Any, _) => true,
            (Opt::Absent, None) => true,
            (Opt::Absent, Some(_)) | (Opt::Present(_), None) => false,
            (Opt::Present(t), Some(c)) => inner(t, c),
        }
    }
}

/// True iff every part of `pattern` matches the corresponding part of
/// `expr`.
pub fn matches(expr: &Expr, pattern: &Pattern) -> bool {
    match (pattern, expr) {
        (Pattern::Any, _) => true,
        (Pattern::Not(inner), _) => !matches(expr, inner),
        (Pattern::Ident(name), Expr::Ident(candidate)) => name.matches(candidate),
        (
            Pattern::Function {
                id,
                params,
                last_stmt,
            },
            Expr::Function(func),
        ) => {
            id.matches(func.id.as_ref(), |name, id| name.matches(&id.node))
                && params.matches(func.params.len())
                && last_stmt.matches(func.body.node.stmts.last(), |pattern, stmt| {
                    matches_stmt(&stmt.node, pattern)
                })
        }
        (
            Pattern::Member { object, property },
            Expr::Member {
                object: candidate,
                property: MemberProp::Ident(name),
            },
        ) => property.matches(&name.node) && matches(&candidate.node, object),
        (Pattern::Call { callee, args }, Expr::Call {
            callee: candidate,
            args: candidate_args,
        }) => matches(&candidate.node, callee) && matches_args(candidate_args, args),
        _ => false,
    }
}

pub fn matches_stmt(stmt: &Stmt, pattern: &StmtPattern) -> bool {
    match (pattern, stmt) {
        (StmtPattern::Expr(pattern), Stmt::Expr(expr)) => matches(&expr.node, pattern),
        (StmtPattern::If { test, alternate }, Stmt::If {
            test: candidate,
            alternate: candidate_alt,
            ..
        }) => {
            matches(&candidate.node, test)
                && alternate.matches(candidate_alt.as_deref(), |pattern, alt| {
                    matches_stmt(&alt.node, pattern)
                })
        }
        _ => false,
    }
}

fn matches_args(args: &[Spanned<Expr>], pattern: &Args) -> bool {
    let all = |candidates: &[Spanned<Expr>], patterns: &[Pattern]| {
        candidates
            .iter()
            .zip(patterns)
            .all(|(arg, pattern)| matches(&arg.node, pattern))
    };
    match pattern {
        Args::Any => true,
        Args::Prefix(patterns) => args.len() >= patterns.len() && all(args, patterns),
        Args::Suffix(patterns) => {
            args.len() >= patterns.len() && all(&args[args.len() - patterns.len()..], patterns)
        }
        Args::Exact(patterns) => args.len() == patterns.len() && all(args, patterns),
    }
}

#[cfg(test)]
mod tests;
