use log::trace;

use crate::parser::ast::Node;
use crate::parser::parse;

/// This is the parsed equivalent of a template file.
///
/// Parsing never fails, so a `Template` can always be built from any text.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Name of the template, usually very similar to the path
    pub name: String,
    /// Original path of the file. A template doesn't necessarily have
    /// a file associated with it though so it's optional.
    pub path: Option<String>,
    /// Parsed AST
    pub ast: Vec<Node>,
}

impl Template {
    /// Parse the template string given
    pub fn new(tpl_name: &str, tpl_path: Option<String>, input: &str) -> Template {
        let ast = parse(input);
        trace!("Parsed template '{}' into {} top-level nodes", tpl_name, ast.len());

        Template { name: tpl_name.to_string(), path: tpl_path, ast }
    }
}
