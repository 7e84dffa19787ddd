#![doc(html_root_url = "https://docs.rs/stache")]
//! # Stache
//!
//! A small template engine: `{{expr}}` interpolation with filters,
//! `{{if:...}}`/`{{elseif:...}}`/`{{else}}`/`{{endif}}` conditionals and
//! `{{for:item:list}}`/`{{endfor}}` loops, driven by an expression language
//! with the usual arithmetic, comparison and logical operators.
//!
//! Broken directives never abort a render: they show up in the output,
//! escaped, as `{{directive!!error message}}`.
//!
//! ```rust
//! use stache::{Context, Engine, Escape};
//!
//! let mut engine = Engine::with_builtins(Escape::Html);
//! engine.add_raw_template("hello", "hello {{name|capitalize}}{{if:admin}} (admin){{endif}}");
//!
//! let mut context = Context::new();
//! context.insert("name", "world");
//! context.insert("admin", &false);
//!
//! assert_eq!(engine.render("hello", &context).unwrap(), "hello World");
//! ```

#[macro_use]
mod macros;
mod builtins;
mod coercion;
mod context;
mod engine;
mod errors;
mod expression;
mod parser;
mod renderer;
mod template;
mod utils;

// Library exports.

pub use crate::builtins::filters::Filter;
pub use crate::context::Context;
pub use crate::engine::{Engine, Escape};
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::renderer::RawValue;
// Template, dotted_pointer and the parser are meant to be used internally only but are exported for test/bench.
#[doc(hidden)]
pub use crate::context::dotted_pointer;
#[doc(hidden)]
pub use crate::parser::ast;
#[doc(hidden)]
pub use crate::parser::{parse, tokenize};
#[doc(hidden)]
pub use crate::template::Template;
pub use crate::utils::escape_html;
// Re-export Value and other useful things from serde
// so apps/tools can encode data in Stache types
pub use serde_json::value::{from_value, to_value, Map, Number, Value};
