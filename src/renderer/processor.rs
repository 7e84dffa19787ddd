use std::borrow::Cow;

use log::{trace, warn};
use serde_json::Value;

use crate::context::{Context, ValueRender, ValueTruthy};
use crate::engine::Engine;
use crate::errors::{Error, Result};
use crate::expression::eval_expression;
use crate::parser::ast::{Block, Node};
use crate::renderer::call_stack::CallStack;
use crate::renderer::pipeline::{apply_filters, parse_filter_call, Piped};
use crate::renderer::stack_frame::StackFrame;
use crate::utils::split_quoted;

/// Where a run of `if`/`elseif`/`else` siblings stands
#[derive(Clone, Copy, Debug, PartialEq)]
enum Chain {
    /// No `if` to continue: an `elseif`/`else` here is an error
    Broken,
    Open { taken: bool },
}

/// Walks the tree of one template, writing into a single buffer
pub struct Processor<'a> {
    /// Name of the template being rendered
    name: &'a str,
    /// Holds filters, escaping policy and limits
    engine: &'a Engine,
    /// The call stack for processing
    call_stack: CallStack<'a>,
    /// Number of block bodies currently open
    depth: usize,
}

impl<'a> Processor<'a> {
    pub fn new(name: &'a str, engine: &'a Engine, context: &'a Context) -> Self {
        Processor { name, engine, call_stack: CallStack::new(context), depth: 0 }
    }

    /// Evaluates `expr|filter|...`, looking paths up in the loop frames then the context
    fn eval_piped(&self, directive: &str) -> Result<Piped> {
        let mut sections = split_quoted("|", directive, None).into_iter();
        let expr = sections.next().unwrap_or("");
        let lookup = |path: &str| self.call_stack.lookup(path);

        let value = eval_expression(expr, lookup)?;
        let calls = sections.map(parse_filter_call).collect::<Vec<_>>();
        apply_filters(value, &calls, &self.engine.filters, lookup)
    }

    fn inline_error(&self, source: &str, error: &Error, buffer: &mut String) {
        warn!("Failed to render `{}` in '{}': {}", source, self.name, error);
        let diagnostic = format!("{{{{{}!!{}}}}}", source, error);
        buffer.push_str(&self.engine.escape(&diagnostic));
    }

    fn render_variable(&self, directive: &str, buffer: &mut String) {
        match self.eval_piped(directive) {
            Ok(Piped::Raw(raw)) => buffer.push_str(raw.as_str()),
            Ok(Piped::Value(value)) => buffer.push_str(&self.engine.escape(&value.render())),
            Err(e) => self.inline_error(directive, &e, buffer),
        }
    }

    /// A condition that fails to evaluate is reported and counts as false
    fn eval_condition(&self, block: &Block, buffer: &mut String) -> bool {
        match self.eval_piped(&block.expr) {
            Ok(piped) => piped.into_value().is_truthy(),
            Err(e) => {
                self.inline_error(&block.source, &e, buffer);
                false
            }
        }
    }

    fn render_block_body(&mut self, body: &'a [Node], buffer: &mut String) -> Result<()> {
        if self.depth >= self.engine.max_depth {
            return Err(Error::recursion_limit(self.engine.max_depth));
        }

        self.depth += 1;
        let result = self.render_body(body, buffer);
        self.depth -= 1;
        result
    }

    fn render_for_loop(&mut self, block: &'a Block, buffer: &mut String) -> Result<()> {
        let (value_name, key_name, container) = match split_quoted(":", &block.expr, Some(3))[..] {
            [value, container] => (value.trim(), None, container),
            [value, key, container] => (value.trim(), Some(key.trim()), container),
            _ => {
                let error = Error::malformed("expected `for:var:array` or `for:var:key:array`");
                self.inline_error(&block.source, &error, buffer);
                return Ok(());
            }
        };

        let container = match self.eval_piped(container) {
            Ok(piped) => piped.into_value(),
            Err(e) => {
                self.inline_error(&block.source, &e, buffer);
                return Ok(());
            }
        };

        let items: Vec<(Value, Value)> = match container {
            Value::Array(arr) => arr.into_iter().enumerate().map(|(i, v)| (Value::from(i), v)).collect(),
            Value::Object(map) => map.into_iter().map(|(k, v)| (Value::String(k), v)).collect(),
            _ => {
                self.inline_error(&block.source, &Error::not_iterable(), buffer);
                return Ok(());
            }
        };

        trace!("Looping over {} items in '{}' at loop depth {}", items.len(), self.name, self.call_stack.depth());
        for (key, value) in items {
            let frame = StackFrame::new_for_loop(value_name, Cow::Owned(value), key_name.map(|name| (name, key)));
            self.call_stack.push_for_loop_frame(frame);
            let result = self.render_block_body(&block.body, buffer);
            self.call_stack.pop();
            result?;
        }

        Ok(())
    }

    /// Renders siblings in order. The `if` chain only links nodes of this
    /// list, and a `for` breaks it.
    fn render_body(&mut self, body: &'a [Node], buffer: &mut String) -> Result<()> {
        let mut chain = Chain::Broken;

        for node in body {
            match *node {
                Node::Text(ref s) => buffer.push_str(s),
                Node::Variable(ref directive) => self.render_variable(directive, buffer),
                Node::If(ref block) => {
                    let taken = self.eval_condition(block, buffer);
                    if taken {
                        self.render_block_body(&block.body, buffer)?;
                    }
                    chain = Chain::Open { taken };
                }
                Node::ElseIf(ref block) => match chain {
                    Chain::Broken => self.inline_error("elseif", &Error::unmatched_if(), buffer),
                    Chain::Open { taken: true } => (),
                    Chain::Open { taken: false } => {
                        if self.eval_condition(block, buffer) {
                            self.render_block_body(&block.body, buffer)?;
                            chain = Chain::Open { taken: true };
                        }
                    }
                },
                Node::Else(ref block) => {
                    match chain {
                        Chain::Broken => self.inline_error("else", &Error::unmatched_if(), buffer),
                        Chain::Open { taken: true } => (),
                        Chain::Open { taken: false } => self.render_block_body(&block.body, buffer)?,
                    }
                    chain = Chain::Broken;
                }
                Node::For(ref block) => {
                    self.render_for_loop(block, buffer)?;
                    chain = Chain::Broken;
                }
            }
        }

        Ok(())
    }

    /// Entry point for the rendering
    pub fn render(&mut self, ast: &'a [Node]) -> Result<String> {
        trace!("Rendering '{}'", self.name);
        let mut output = String::with_capacity(ast.len() * 20);
        self.render_body(ast, &mut output)?;
        Ok(output)
    }
}
