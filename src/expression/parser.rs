use crate::errors::{Error, Result};
use crate::expression::{Assoc, Operator, Token};

/// Entries of the operator stack
#[derive(Debug)]
enum Pending {
    Operator(Operator),
    LeftParen,
}

/// Converts infix tokens to reverse polish notation (shunting-yard).
///
/// Operands go straight to the output; an operator first moves every stacked
/// operator that binds at least as tightly (strictly tighter for right
/// associative ones) to the output.
pub fn to_rpn(tokens: Vec<Token<'_>>) -> Result<Vec<Token<'_>>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::String(_) | Token::Identifier(_) => output.push(token),
            Token::LeftParen => stack.push(Pending::LeftParen),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Pending::Operator(op)) => output.push(Token::Operator(op)),
                    Some(Pending::LeftParen) => break,
                    None => return Err(Error::malformed("mismatched parentheses")),
                }
            },
            Token::Operator(op) => {
                while let Some(Pending::Operator(top)) = stack.last() {
                    let should_pop = match op.assoc() {
                        Assoc::Left => top.precedence() >= op.precedence(),
                        Assoc::Right => top.precedence() > op.precedence(),
                    };
                    if !should_pop {
                        break;
                    }
                    output.push(Token::Operator(*top));
                    stack.pop();
                }
                stack.push(Pending::Operator(op));
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(op) => output.push(Token::Operator(op)),
            Pending::LeftParen => return Err(Error::malformed("mismatched parentheses")),
        }
    }

    Ok(output)
}
