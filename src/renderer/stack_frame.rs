use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

pub type Val<'a> = Cow<'a, Value>;
pub type FrameContext<'a> = HashMap<&'a str, Val<'a>>;

/// Bindings of one `for` iteration: the loop variable and, if asked for, the key
#[derive(Debug)]
pub struct StackFrame<'a> {
    context: FrameContext<'a>,
}

impl<'a> StackFrame<'a> {
    pub fn new_for_loop(name: &'a str, value: Val<'a>, key: Option<(&'a str, Value)>) -> Self {
        let mut context = FrameContext::new();
        // a key named like the value is shadowed by it
        if let Some((key_name, key)) = key {
            context.insert(key_name, Cow::Owned(key));
        }
        context.insert(name, value);
        StackFrame { context }
    }

    pub fn find_value(&self, key: &str) -> Option<&Val<'a>> {
        self.context.get(key)
    }
}
