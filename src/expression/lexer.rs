//! Splits an expression such as `user.age + 1 >= limit` into tokens.
//!
//! The lexer is lenient: characters that can't start any token are skipped.
use std::iter::Peekable;
use std::str::CharIndices;

use crate::expression::Operator;

#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Digits with at most one decimal point, as written
    Number(&'a str),
    /// Double quoted string, already unescaped
    String(String),
    /// A variable name, possibly dotted (`user.name`)
    Identifier(&'a str),
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// Lexer over a single expression
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer { input, chars: input.char_indices().peekable() }
    }

    fn rest(&self, start: usize) -> &'a str {
        &self.input[start..]
    }

    /// Byte offset of the next char, or the end of input
    fn position(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(i, _)) => i,
            None => self.input.len(),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token<'a> {
        let mut seen_dot = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '.' {
                if seen_dot {
                    break;
                }
                seen_dot = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            self.chars.next();
        }
        let end = self.position();
        Token::Number(&self.input[start..end])
    }

    // the opening quote has already been consumed
    fn lex_string(&mut self) -> Token<'a> {
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = self.chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => break,
                _ => value.push(c),
            }
        }
        Token::String(value)
    }

    fn lex_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.position();
        Token::Identifier(&self.input[start..end])
    }

    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();

        while let Some(&(start, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }
            match c {
                '(' => {
                    self.chars.next();
                    tokens.push(Token::LeftParen);
                    continue;
                }
                ')' => {
                    self.chars.next();
                    tokens.push(Token::RightParen);
                    continue;
                }
                _ => (),
            }

            let rest = self.rest(start);
            if let Some(op) = rest.get(..2).and_then(Operator::from_symbol) {
                self.chars.next();
                self.chars.next();
                tokens.push(Token::Operator(op));
                continue;
            }
            if let Some(op) = Operator::from_symbol(&rest[..c.len_utf8()]) {
                self.chars.next();
                tokens.push(Token::Operator(op));
                continue;
            }

            let starts_number = c.is_ascii_digit()
                || (c == '.' && rest[1..].starts_with(|n: char| n.is_ascii_digit()));
            if starts_number {
                tokens.push(self.lex_number(start));
            } else if c == '"' {
                self.chars.next();
                tokens.push(self.lex_string());
            } else if c.is_alphabetic() || c == '_' {
                tokens.push(self.lex_identifier(start));
            } else {
                // stray characters are ignored
                self.chars.next();
            }
        }

        tokens
    }
}

/// Tokenizes an expression
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).tokenize()
}
