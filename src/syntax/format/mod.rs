mod expr;
mod stmts;


use crate::ast::visit::{self, Visit};
use crate::ast::*;
use crate::config::PrintOptions;
use crate::lexer::Comment;
use crate::span::{Span, Spanned};

/// Print a program back to source text.
///
/// Layout follows the conventional ES5 code-generator style: one
/// statement per line, `function (a) {` for anonymous functions, `{` on
/// the same line, raw literal text, no trailing newline. Comments are
/// re-attached best-effort: each comment belongs to the innermost block
/// that contained it in the source and is printed before the first
/// statement of that block that followed it.
pub fn format_program(program: &Program, comments: &[Comment], options: &PrintOptions) -> String {
    let comments = if options.comments { comments } else { &[] };
    let mut ctx = FormatCtx::new(program, comments, options);
    let indent = options.indent.repeat(options.base);

    for (i, stmt) in program.body.iter().enumerate() {
        if i > 0 {
            ctx.newline();
        }
        ctx.emit_leading_comments(stmt.span, program.span, &indent);
        ctx.output.push_str(&indent);
        ctx.emit_stmt(stmt, &indent);
        ctx.emit_trailing_comment(stmt.span);
    }
    ctx.emit_remaining_comments(&indent);
    ctx.output
}

pub(super) struct FormatCtx {
    pub(super) output: String,
    pub(super) comments: Vec<CommentEntry>,
    unit: String,
    newline: String,
}

#[derive(Clone)]
pub(super) struct CommentEntry {
    pub(super) text: String,
    pub(super) byte_offset: u32,
    pub(super) trailing: bool,
    /// End of the token before the comment.
    pub(super) prev_end: u32,
    /// Span of the innermost block (or the program) containing the comment.
    pub(super) owner: Span,
    pub(super) used: bool,
}

impl FormatCtx {
    fn new(program: &Program, comments: &[Comment], options: &PrintOptions) -> Self {
        let mut containers = Containers(Vec::new());
        if !comments.is_empty() {
            visit::walk_program(&mut containers, program);
        }
        let entries = comments
            .iter()
            .map(|c| CommentEntry {
                text: c.text.clone(),
                byte_offset: c.span.start,
                trailing: c.trailing,
                prev_end: c.prev_end,
                owner: containers.innermost(c.span.start).unwrap_or(program.span),
                used: false,
            })
            .collect();
        Self {
            output: String::new(),
            comments: entries,
            unit: options.indent.clone(),
            newline: options.newline.clone(),
        }
    }

    pub(super) fn newline(&mut self) {
        self.output.push_str(&self.newline);
    }

    pub(super) fn nested(&self, indent: &str) -> String {
        format!("{}{}", indent, self.unit)
    }

    /// Emit comments of block `owner` that appear before `span`, one per
    /// line, each followed by a line break.
    pub(super) fn emit_leading_comments(&mut self, span: Span, owner: Span, indent: &str) {
        if span.is_dummy() {
            return;
        }
        for i in 0..self.comments.len() {
            let entry = &self.comments[i];
            if entry.used || entry.owner != owner || entry.byte_offset >= span.start {
                continue;
            }
            let text = entry.text.clone();
            self.comments[i].used = true;
            self.output.push_str(indent);
            self.output.push_str(&text);
            self.newline();
        }
    }

    /// Emit a comment that followed the statement ending at `span.end` on
    /// the same line.
    pub(super) fn emit_trailing_comment(&mut self, span: Span) {
        if span.is_dummy() {
            return;
        }
        for i in 0..self.comments.len() {
            let entry = &self.comments[i];
            if entry.used || !entry.trailing || entry.prev_end != span.end {
                continue;
            }
            let text = entry.text.clone();
            self.comments[i].used = true;
            self.output.push(' ');
            self.output.push_str(&text);
            break;
        }
    }

    /// Emit the remaining comments of block `owner` before its closing
    /// brace, each on its own line.
    pub(super) fn emit_closing_comments(&mut self, owner: Span, indent: &str) {
        for i in 0..self.comments.len() {
            if self.comments[i].used || self.comments[i].owner != owner {
                continue;
            }
            let text = self.comments[i].text.clone();
            self.comments[i].used = true;
            self.newline();
            self.output.push_str(indent);
            self.output.push_str(&text);
        }
    }

    /// Emit any remaining unused comments (e.g., at end of file).
    fn emit_remaining_comments(&mut self, indent: &str) {
        for i in 0..self.comments.len() {
            if self.comments[i].used {
                continue;
            }
            self.comments[i].used = true;
            if !self.output.is_empty() {
                self.newline();
            }
            self.output.push_str(indent);
            self.output.push_str(&self.comments[i].text.clone());
        }
    }

    /// `{`, the statements one level deeper, `}`. An empty block prints as
    /// `{` and `}` on separate lines.
    pub(super) fn emit_block(&mut self, stmts: &[Spanned<Stmt>], span: Span, indent: &str) {
        let inner = self.nested(indent);
        self.output.push('{');
        for stmt in stmts {
            self.newline();
            self.emit_leading_comments(stmt.span, span, &inner);
            self.output.push_str(&inner);
            self.emit_stmt(stmt, &inner);
            self.emit_trailing_comment(stmt.span);
        }
        if !span.is_dummy() {
            self.emit_closing_comments(span, &inner);
        }
        self.newline();
        self.output.push_str(indent);
        self.output.push('}');
    }
}

/// Spans of every block-like node that can own comments.
struct Containers(Vec<Span>);

impl Containers {
    fn innermost(&self, offset: u32) -> Option<Span> {
        self.0
            .iter()
            .filter(|span| span.contains(offset))
            .min_by_key(|span| span.len())
            .copied()
    }
}

impl Visit for Containers {
    fn visit_block(&mut self, block: &Spanned<Block>) {
        if !block.span.is_dummy() {
            self.0.push(block.span);
        }
        visit::walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        if matches!(stmt.node, Stmt::Block(_) | Stmt::Switch { .. }) && !stmt.span.is_dummy() {
            self.0.push(stmt.span);
        }
        visit::walk_stmt(self, stmt);
    }
}
