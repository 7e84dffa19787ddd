use serde_derive::Serialize;
use serde_json::Value;

use crate::context::Context;
use crate::engine::{Engine, Escape};
use crate::errors::Result;

mod loops;

#[derive(Debug, Serialize)]
pub struct Review {
    title: String,
    paragraphs: Vec<String>,
}

impl Review {
    #[allow(dead_code)]
    pub fn new() -> Review {
        Review {
            title: "My review".to_owned(),
            paragraphs: vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
        }
    }
}

fn equals(value: &Value, args: &[Value]) -> Result<Value> {
    let other = args.first().unwrap_or(&Value::Null);
    Ok(Value::Bool(crate::coercion::loose_eq(value, other)))
}

fn engine(escape: Escape) -> Engine {
    let mut engine = Engine::with_builtins(escape);
    engine.register_filter("eq", equals);
    engine
}

pub fn render_template(content: &str, context: &Context) -> Result<String> {
    let mut engine = engine(Escape::Html);
    engine.add_raw_template("hello.html", content);
    engine.render("hello.html", context)
}

pub fn render_unescaped(content: &str, context: &Context) -> Result<String> {
    engine(Escape::None).render_str(content, context)
}
