//! Turns template text into a tree of [`Node`]s.
//!
//! Parsing never fails: unclosed `{{` is kept as text and mismatched block
//! directives only show up when rendering.

use log::trace;

use crate::utils::split_quoted;

/// The AST of Stache
pub mod ast;


use self::ast::*;

/// Splits a template into alternating literal text and directive bodies.
///
/// Even indices are text (possibly empty), odd indices are what sits
/// between `{{` and `}}`. The closing `}}` is searched quote-aware so a
/// quoted filter argument may contain it.
pub fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        let open = match rest.find("{{") {
            Some(i) => i,
            None => {
                tokens.push(rest);
                break;
            }
        };

        let parts = split_quoted("}}", &rest[open + 2..], Some(2));
        if parts.len() < 2 {
            // no closing delimiter: what's left, `{{` included, is text
            tokens.push(rest);
            break;
        }
        tokens.push(&rest[..open]);
        tokens.push(parts[0]);
        rest = parts[1];
    }

    tokens
}

/// What a directive body asks for
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tag<'a> {
    If(&'a str),
    ElseIf(&'a str),
    Else,
    EndIf,
    For(&'a str),
    EndFor,
    Variable,
}

pub fn classify(directive: &str) -> Tag<'_> {
    let body = directive.trim();
    match body {
        "endif" => return Tag::EndIf,
        "endfor" => return Tag::EndFor,
        "else" => return Tag::Else,
        _ => (),
    }

    if let Some(expr) = body.strip_prefix("elseif:") {
        Tag::ElseIf(expr)
    } else if let Some(expr) = body.strip_prefix("if:") {
        Tag::If(expr)
    } else if let Some(expr) = body.strip_prefix("for:") {
        Tag::For(expr)
    } else {
        Tag::Variable
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BlockKind {
    If,
    ElseIf,
    Else,
    For,
}

/// A block still collecting its body
#[derive(Debug)]
struct OpenBlock {
    kind: BlockKind,
    block: Block,
}

/// Builds the tree with an explicit stack of open blocks: nodes always go
/// into the innermost open block, or the root when none is open.
#[derive(Debug, Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<OpenBlock>,
}

impl TreeBuilder {
    fn current_body(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(open) => &mut open.block.body,
            None => &mut self.root,
        }
    }

    fn open(&mut self, kind: BlockKind, source: &str, expr: &str) {
        self.stack.push(OpenBlock { kind, block: Block::new(source, expr) });
    }

    /// Closes the innermost block, whatever it is. A no-op at the top level.
    fn close(&mut self) {
        if let Some(OpenBlock { kind, block }) = self.stack.pop() {
            let node = match kind {
                BlockKind::If => Node::If(block),
                BlockKind::ElseIf => Node::ElseIf(block),
                BlockKind::Else => Node::Else(block),
                BlockKind::For => Node::For(block),
            };
            self.current_body().push(node);
        }
    }

    fn push_directive(&mut self, directive: &str) {
        match classify(directive) {
            Tag::EndIf | Tag::EndFor => self.close(),
            Tag::Else => {
                self.close();
                self.open(BlockKind::Else, directive, "");
            }
            Tag::ElseIf(expr) => {
                self.close();
                self.open(BlockKind::ElseIf, directive, expr);
            }
            Tag::If(expr) => self.open(BlockKind::If, directive, expr),
            Tag::For(expr) => self.open(BlockKind::For, directive, expr),
            Tag::Variable => self.current_body().push(Node::Variable(directive.to_string())),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

/// Builds the tree out of the alternating tokens of [`tokenize`]
pub fn build(tokens: &[&str]) -> Vec<Node> {
    let mut builder = TreeBuilder::default();

    for (i, token) in tokens.iter().enumerate() {
        if i % 2 == 1 {
            builder.push_directive(token);
        } else if !token.is_empty() {
            builder.current_body().push(Node::Text(token.to_string()));
        }
    }

    builder.finish()
}

pub fn parse(input: &str) -> Vec<Node> {
    let tokens = tokenize(input);
    trace!("Tokenized template into {} directives", tokens.len() / 2);
    build(&tokens)
}
