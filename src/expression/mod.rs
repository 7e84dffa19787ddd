//! The expression language used inside directives: literals, dotted paths,
//! arithmetic, comparisons and boolean logic.
//!
//! Expressions go through three steps: [`tokenize`], conversion to reverse
//! polish notation with [`to_rpn`] and evaluation of the RPN program with
//! [`evaluate_rpn`].

mod eval;
mod lexer;
mod parser;

use serde_json::Value;

use crate::errors::Result;

pub use self::eval::evaluate_rpn;
pub use self::lexer::{tokenize, Token};
pub use self::parser::to_rpn;

/// Whether operators of equal precedence group from the left or the right
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Or,             // ||
    And,            // &&
    Equal,          // ==
    NotEqual,       // !=
    Lower,          // <
    Greater,        // >
    LowerOrEqual,   // <=
    GreaterOrEqual, // >=
    Add,            // +
    Subtract,       // -
    Multiply,       // *
    Divide,         // /
    Modulo,         // %
    Not,            // !
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        let op = match symbol {
            "||" => Operator::Or,
            "&&" => Operator::And,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "<=" => Operator::LowerOrEqual,
            ">=" => Operator::GreaterOrEqual,
            "<" => Operator::Lower,
            ">" => Operator::Greater,
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "%" => Operator::Modulo,
            "!" => Operator::Not,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LowerOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Lower => "<",
            Operator::Greater => ">",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Not => "!",
        }
    }

    // Existing templates rely on these exact values
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Equal | Operator::NotEqual => 3,
            Operator::Lower
            | Operator::Greater
            | Operator::LowerOrEqual
            | Operator::GreaterOrEqual => 4,
            Operator::Add | Operator::Subtract => 5,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 6,
            Operator::Not => 7,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            Operator::Not => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    pub fn is_unary(self) -> bool {
        self == Operator::Not
    }
}

/// Tokenizes, parses and evaluates `input`, looking identifiers up with `resolve`
pub fn eval_expression<F>(input: &str, resolve: F) -> Result<Value>
where
    F: Fn(&str) -> Result<Value>,
{
    let rpn = to_rpn(tokenize(input))?;
    evaluate_rpn(&rpn, resolve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use serde_json::json;

    fn eval(input: &str) -> Result<Value> {
        eval_expression(input, |path| match path {
            "x" => Ok(json!(10)),
            "name" => Ok(json!("bob")),
            "user.age" => Ok(json!(17)),
            "flag" => Ok(json!(false)),
            _ => Err(Error::path_not_found(path)),
        })
    }

    #[test]
    fn operator_table_is_stable() {
        let table = [
            ("||", 1),
            ("&&", 2),
            ("==", 3),
            ("!=", 3),
            ("<", 4),
            (">", 4),
            ("<=", 4),
            (">=", 4),
            ("+", 5),
            ("-", 5),
            ("*", 6),
            ("/", 6),
            ("%", 6),
            ("!", 7),
        ];
        for (symbol, precedence) in table.iter() {
            let op = Operator::from_symbol(symbol).unwrap();
            assert_eq!(op.precedence(), *precedence);
            assert_eq!(op.symbol(), *symbol);
        }
        assert_eq!(Operator::Not.assoc(), Assoc::Right);
        assert_eq!(Operator::Subtract.assoc(), Assoc::Left);
        assert_eq!(Operator::from_symbol("="), None);
    }

    #[test]
    fn precedence_is_respected() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), json!(14));
        assert_eq!(eval("(2 + 3) * 4").unwrap(), json!(20));
        assert_eq!(eval("10 - 4 - 3").unwrap(), json!(3));
        assert_eq!(eval("2 * 4 % 3").unwrap(), json!(2));
        assert_eq!(eval("x > 5 && x < 20").unwrap(), json!(true));
        assert_eq!(eval("flag || x == 10 && name == \"bob\"").unwrap(), json!(true));
    }

    #[test]
    fn evaluates_literals_and_paths() {
        assert_eq!(eval("3").unwrap(), json!(3));
        assert_eq!(eval("3.5").unwrap(), json!(3.5));
        assert_eq!(eval("\"hi\"").unwrap(), json!("hi"));
        assert_eq!(eval("user.age + 1").unwrap(), json!(18));
        assert_eq!(eval("name + \"!\"").unwrap(), json!("bob!"));
    }

    #[test]
    fn not_operator() {
        assert_eq!(eval("!flag").unwrap(), json!(true));
        assert_eq!(eval("!!x").unwrap(), json!(true));
        assert_eq!(eval("!x == flag").unwrap(), json!(true));
    }

    #[test]
    fn errors_are_reported() {
        assert_eq!(eval("1 / 0").unwrap_err().to_string(), "division by zero");
        assert_eq!(eval("1 % 0").unwrap_err().to_string(), "modulo by zero");
        assert_eq!(eval("missing").unwrap_err().to_string(), "path 'missing' not found");
        assert_eq!(eval("1 +").unwrap_err().to_string(), "not enough operands");
        assert_eq!(eval("").unwrap_err().to_string(), "malformed expression");
        assert_eq!(eval("1 2").unwrap_err().to_string(), "malformed expression");
        assert_eq!(eval("(1 + 2").unwrap_err().to_string(), "mismatched parentheses");
        assert_eq!(eval("1 + 2)").unwrap_err().to_string(), "mismatched parentheses");
    }
}
