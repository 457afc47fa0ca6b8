//! Syntax tree for ECMAScript 5 programs.
//!
//! The tree is a closed set of node kinds. Every child is owned by exactly
//! one parent; rewrites move subtrees instead of sharing them.

pub mod visit;

use crate::span::{Span, Spanned};

/// A parsed program: the top-level statement list.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub body: Vec<Spanned<Stmt>>,
    /// Span of the whole source text.
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// A function literal: declaration or expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub id: Option<Spanned<String>>,
    pub params: Vec<Spanned<String>>,
    pub body: Spanned<Block>,
}

impl Function {
    /// An anonymous function expression with the given parameters and body.
    pub fn anonymous(params: Vec<Spanned<String>>, body: Spanned<Block>) -> Self {
        Self {
            id: None,
            params,
            body,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDeclarator {
    pub name: Spanned<String>,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ForInit {
    Var(Vec<VarDeclarator>),
    Expr(Spanned<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ForInTarget {
    Var(VarDeclarator),
    Expr(Spanned<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub param: Spanned<String>,
    pub body: Spanned<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    /// `None` for the `default:` clause.
    pub test: Option<Spanned<Expr>>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Var(Vec<VarDeclarator>),
    Function(Function),
    Block(Block),
    Empty,
    Expr(Spanned<Expr>),
    If {
        test: Spanned<Expr>,
        consequent: Box<Spanned<Stmt>>,
        alternate: Option<Box<Spanned<Stmt>>>,
    },
    For {
        init: Option<ForInit>,
        test: Option<Spanned<Expr>>,
        update: Option<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    ForIn {
        left: ForInTarget,
        right: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    While {
        test: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    DoWhile {
        body: Box<Spanned<Stmt>>,
        test: Spanned<Expr>,
    },
    Return(Option<Spanned<Expr>>),
    Break(Option<Spanned<String>>),
    Continue(Option<Spanned<String>>),
    Throw(Spanned<Expr>),
    Try {
        block: Spanned<Block>,
        handler: Option<CatchClause>,
        finalizer: Option<Spanned<Block>>,
    },
    Switch {
        discriminant: Spanned<Expr>,
        cases: Vec<Spanned<SwitchCase>>,
    },
    Labeled {
        label: Spanned<String>,
        body: Box<Spanned<Stmt>>,
    },
    Debugger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
    Number,
    String,
    Regex,
    Bool,
    Null,
}

/// A literal, kept as its raw source text so the printer reproduces it.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub kind: LitKind,
    pub raw: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropKey {
    Ident(String),
    /// Raw string literal, quotes included.
    String(String),
    /// Raw numeric literal.
    Number(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    Init,
    Get,
    Set,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: Spanned<PropKey>,
    pub kind: PropKind,
    /// For `get`/`set` properties this is always a function expression.
    pub value: Spanned<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemberProp {
    /// `object.name`
    Ident(Spanned<String>),
    /// `object[expr]`
    Computed(Box<Spanned<Expr>>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }

    /// Word operators need a space before their operand.
    pub fn is_word(&self) -> bool {
        matches!(self, UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    In,
    Instanceof,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNotEq => "!==",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::In => "in",
            BinOp::Instanceof => "instanceof",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        }
    }

    /// Operator precedence; all binary operators are left-associative.
    pub fn precedence(&self) -> Precedence {
        match self {
            BinOp::Or => Precedence::LogicalOr,
            BinOp::And => Precedence::LogicalAnd,
            BinOp::BitOr => Precedence::BitwiseOr,
            BinOp::BitXor => Precedence::BitwiseXor,
            BinOp::BitAnd => Precedence::BitwiseAnd,
            BinOp::Eq | BinOp::NotEq | BinOp::StrictEq | BinOp::StrictNotEq => {
                Precedence::Equality
            }
            BinOp::Lt
            | BinOp::Gt
            | BinOp::LtEq
            | BinOp::GtEq
            | BinOp::In
            | BinOp::Instanceof => Precedence::Relational,
            BinOp::Shl | BinOp::Shr | BinOp::UShr => Precedence::Shift,
            BinOp::Add | BinOp::Sub => Precedence::Additive,
            BinOp::Mul | BinOp::Div | BinOp::Rem => Precedence::Multiplicative,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
        }
    }
}

/// Expression precedence levels, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
    Call,
    New,
    Member,
    Primary,
}

impl Precedence {
    /// The next tighter level, used for right operands of binary operators.
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Sequence => Precedence::Assignment,
            Precedence::Assignment => Precedence::Conditional,
            Precedence::Conditional => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::BitwiseOr,
            Precedence::BitwiseOr => Precedence::BitwiseXor,
            Precedence::BitwiseXor => Precedence::BitwiseAnd,
            Precedence::BitwiseAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Shift,
            Precedence::Shift => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary => Precedence::Postfix,
            Precedence::Postfix => Precedence::Call,
            Precedence::Call => Precedence::New,
            Precedence::New => Precedence::Member,
            Precedence::Member | Precedence::Primary => Precedence::Primary,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Ident(String),
    This,
    Literal(Literal),
    /// `None` entries are elisions: `[a, , b]`.
    Array(Vec<Option<Spanned<Expr>>>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Member {
        object: Box<Spanned<Expr>>,
        property: MemberProp,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    New {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        arg: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Conditional {
        test: Box<Spanned<Expr>>,
        consequent: Box<Spanned<Expr>>,
        alternate: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Sequence(Vec<Spanned<Expr>>),
}

impl Expr {
    pub fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    /// `object.name`, a non-computed member access.
    pub fn member(object: Spanned<Expr>, name: &str) -> Expr {
        Expr::Member {
            object: Box::new(object),
            property: MemberProp::Ident(Spanned::dummy(name.to_string())),
        }
    }

    pub fn call(callee: Spanned<Expr>, args: Vec<Spanned<Expr>>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// `object.method(args)`.
    pub fn method_call(object: Spanned<Expr>, method: &str, args: Vec<Spanned<Expr>>) -> Expr {
        Expr::call(Spanned::dummy(Expr::member(object, method)), args)
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Sequence(_) => Precedence::Sequence,
            Expr::Assign { .. } => Precedence::Assignment,
            Expr::Conditional { .. } => Precedence::Conditional,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } => Precedence::Unary,
            Expr::Update { prefix: true, .. } => Precedence::Unary,
            Expr::Update { prefix: false, .. } => Precedence::Postfix,
            Expr::Call { .. } => Precedence::Call,
            Expr::New { .. } => Precedence::New,
            Expr::Member { .. } => Precedence::Member,
            Expr::Ident(_)
            | Expr::This
            | Expr::Literal(_)
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::Function(_) => Precedence::Primary,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Expr::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut Function> {
        match self {
            Expr::Function(func) => Some(func),
            _ => None,
        }
    }

    /// If this is `object.name(args)`, the method name.
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Expr::Call { callee, .. } => match &callee.node {
                Expr::Member {
                    property: MemberProp::Ident(name),
                    ..
                } => Some(&name.node),
                _ => None,
            },
            _ => None,
        }
    }

    /// The subexpression printed first, e.g. the callee of a call chain.
    pub fn leftmost(&self) -> &Expr {
        match self {
            Expr::Call { callee, .. } => callee.node.leftmost(),
            Expr::Member { object, .. } => object.node.leftmost(),
            Expr::Binary { lhs, .. } => lhs.node.leftmost(),
            Expr::Assign { target, .. } => target.node.leftmost(),
            Expr::Conditional { test, .. } => test.node.leftmost(),
            Expr::Update {
                prefix: false, arg, ..
            } => arg.node.leftmost(),
            Expr::Sequence(items) => match items.first() {
                Some(first) => first.node.leftmost(),
                None => self,
            },
            _ => self,
        }
    }
}

impl Stmt {
    /// `return <expr>;`
    pub fn ret(expr: Spanned<Expr>) -> Stmt {
        Stmt::Return(Some(expr))
    }
}
