use serde_json::Value;

use crate::coercion::{self, loose_compare, loose_eq, parse_numeric, Numeric};
use crate::context::ValueTruthy;
use crate::errors::{Error, Result};
use crate::expression::{Operator, Token};

fn number_literal(text: &str) -> Result<Value> {
    let number = if text.contains('.') {
        text.parse::<f64>().ok().map(Numeric::Float)
    } else {
        parse_numeric(text)
    };
    number
        .map(Numeric::into_value)
        .ok_or_else(|| Error::malformed(format!("invalid number `{}`", text)))
}

fn apply_binary(op: Operator, left: &Value, right: &Value) -> Result<Value> {
    use std::cmp::Ordering::*;

    let value = match op {
        Operator::Or => Value::Bool(left.is_truthy() || right.is_truthy()),
        Operator::And => Value::Bool(left.is_truthy() && right.is_truthy()),
        Operator::Equal => Value::Bool(loose_eq(left, right)),
        Operator::NotEqual => Value::Bool(!loose_eq(left, right)),
        Operator::Lower => Value::Bool(loose_compare(left, right) == Some(Less)),
        Operator::Greater => Value::Bool(loose_compare(left, right) == Some(Greater)),
        Operator::LowerOrEqual => {
            Value::Bool(matches!(loose_compare(left, right), Some(Less) | Some(Equal)))
        }
        Operator::GreaterOrEqual => {
            Value::Bool(matches!(loose_compare(left, right), Some(Greater) | Some(Equal)))
        }
        Operator::Add => coercion::add(left, right),
        Operator::Subtract => coercion::subtract(left, right),
        Operator::Multiply => coercion::multiply(left, right),
        Operator::Divide => coercion::divide(left, right)?,
        Operator::Modulo => coercion::modulo(left, right)?,
        Operator::Not => unreachable!("`!` is unary"),
    };
    Ok(value)
}

/// Runs a RPN program on a value stack.
///
/// Both sides of `&&` and `||` are always evaluated since operands are
/// computed before their operator is reached.
pub fn evaluate_rpn<F>(rpn: &[Token<'_>], resolve: F) -> Result<Value>
where
    F: Fn(&str) -> Result<Value>,
{
    let mut stack: Vec<Value> = Vec::new();

    for token in rpn {
        match *token {
            Token::Number(text) => stack.push(number_literal(text)?),
            Token::String(ref s) => stack.push(Value::String(s.clone())),
            Token::Identifier(path) => stack.push(resolve(path)?),
            Token::Operator(op) if op.is_unary() => {
                let operand = stack.pop().ok_or_else(|| Error::malformed("not enough operands"))?;
                stack.push(Value::Bool(!operand.is_truthy()));
            }
            Token::Operator(op) => match (stack.pop(), stack.pop()) {
                (Some(right), Some(left)) => stack.push(apply_binary(op, &left, &right)?),
                _ => return Err(Error::malformed("not enough operands")),
            },
            Token::LeftParen | Token::RightParen => {
                return Err(Error::malformed("mismatched parentheses"));
            }
        }
    }

    match stack.pop() {
        Some(value) if stack.is_empty() => Ok(value),
        _ => Err(Error::malformed("malformed expression")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{to_rpn, tokenize};
    use serde_json::json;

    fn eval(input: &str) -> Value {
        let rpn = to_rpn(tokenize(input)).unwrap();
        evaluate_rpn(&rpn, |p| Err(Error::path_not_found(p))).unwrap()
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(eval("2"), json!(2));
        assert_eq!(eval("2.0"), json!(2.0));
        assert_eq!(eval("1 + 1.1"), json!(2.1));
        assert_eq!(eval("10 / 4"), json!(2.5));
        assert_eq!(eval("10 / 5"), json!(2));
        assert_eq!(eval("99999999999999999999"), json!(1e20));
    }

    #[test]
    fn comparisons_are_loose() {
        assert_eq!(eval("\"3\" == 3"), json!(true));
        assert_eq!(eval("\"10\" > \"9\""), json!(true));
        assert_eq!(eval("\"abc\" < \"abd\""), json!(true));
        assert_eq!(eval("3 >= 3"), json!(true));
        assert_eq!(eval("3 <= 2"), json!(false));
        assert_eq!(eval("1 != 1.0"), json!(false));
    }

    #[test]
    fn logic_uses_truthiness() {
        assert_eq!(eval("0 || \"\""), json!(false));
        assert_eq!(eval("1 && \"a\""), json!(true));
        assert_eq!(eval("\"0\" || 0"), json!(false));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("\"a\" + \"b\""), json!("ab"));
        assert_eq!(eval("\"n\" + 1 + 2"), json!("n12"));
        assert_eq!(eval("1 + 2 + \"n\""), json!("3n"));
        assert_eq!(eval("\"2\" + \"3\""), json!(5));
    }

    #[test]
    fn non_numeric_arithmetic_is_zero() {
        assert_eq!(eval("\"a\" - 1"), json!(-1));
        assert_eq!(eval("\"a\" * 5"), json!(0));
    }

    #[test]
    fn short_circuit_free() {
        let rpn = to_rpn(tokenize("1 || missing")).unwrap();
        let err = evaluate_rpn(&rpn, |p| Err(Error::path_not_found(p))).unwrap_err();
        assert_eq!(err.to_string(), "path 'missing' not found");
    }
}
