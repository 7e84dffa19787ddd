use serde_json::Value;

use crate::context::{dotted_pointer, Context};
use crate::errors::{Error, Result};
use crate::renderer::stack_frame::StackFrame;
use crate::utils::split_quoted;

/// Contains the user data and allows no mutation
#[derive(Debug)]
pub struct UserContext<'a> {
    /// Read-only context
    inner: &'a Context,
}

impl<'a> UserContext<'a> {
    /// Create an immutable user context to be used in the call stack
    pub fn new(context: &'a Context) -> Self {
        UserContext { inner: context }
    }

    pub fn find_value(&self, key: &str) -> Option<&'a Value> {
        self.inner.get(key)
    }
}

/// Contains the stack of loop frames shadowing the user context
#[derive(Debug)]
pub struct CallStack<'a> {
    /// The stack of frames
    stack: Vec<StackFrame<'a>>,
    /// User supplied context for the render
    context: UserContext<'a>,
}

impl<'a> CallStack<'a> {
    pub fn new(context: &'a Context) -> CallStack<'a> {
        CallStack { stack: Vec::new(), context: UserContext::new(context) }
    }

    pub fn push_for_loop_frame(&mut self, frame: StackFrame<'a>) {
        self.stack.push(frame);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Resolves a dotted path: the root segment is looked up in the innermost
    /// loop frame binding it, then in the user context.
    pub fn lookup(&self, path: &str) -> Result<Value> {
        let segments = split_quoted(".", path, None);
        let (root, rest) = match segments.split_first() {
            Some(split) => split,
            None => return Err(Error::path_not_found(path)),
        };

        let from_frames = self.stack.iter().rev().find_map(|frame| frame.find_value(root));
        let found = match from_frames {
            Some(val) => dotted_pointer(val, rest)?,
            None => {
                let val = self.context.find_value(root).ok_or_else(|| Error::path_not_found(*root))?;
                dotted_pointer(val, rest)?
            }
        };

        Ok(found.clone())
    }
}
