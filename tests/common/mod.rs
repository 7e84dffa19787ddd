use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use serde_derive::Serialize;
use serde_json::Value;
use stache::{Engine, Escape, Result};

#[derive(Debug, Serialize)]
pub struct Product {
    name: String,
    manufacturer: String,
    price: i32,
    summary: String,
}

impl Product {
    #[allow(dead_code)]
    pub fn new() -> Product {
        Product {
            name: "Moto G".to_owned(),
            manufacturer: "Motorala".to_owned(),
            summary: "A phone".to_owned(),
            price: 100,
        }
    }
}

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

/// Uppercases the first letter only
#[allow(dead_code)]
pub fn to_upper_first(value: &Value, _: &[Value]) -> Result<Value> {
    let s = value.as_str().unwrap_or_default();
    let mut chars = s.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

/// Plain equality with the first argument
#[allow(dead_code)]
pub fn equals(value: &Value, args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.first() == Some(value)))
}

/// An engine with `raw` plus the two filters the documentation examples use
#[allow(dead_code)]
pub fn engine(escape: Escape) -> Engine {
    let mut engine = Engine::new(escape);
    engine.register_filter("capitalize", to_upper_first);
    engine.register_filter("eq", equals);
    engine
}

#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}
