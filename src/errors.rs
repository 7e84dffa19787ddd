use std::convert::Into;
use std::error::Error as StdError;
use std::fmt;

/// The kind of an error (non-exhaustive)
#[non_exhaustive]
#[allow(clippy::manual_non_exhaustive)] // reason = "we want to stay backwards compatible"
#[derive(Debug)]
pub enum ErrorKind {
    /// Generic error
    Msg(String),
    /// An expression could not be turned into a single value
    MalformedExpression(String),
    /// A segment of a dotted path is missing from the data
    PathNotFound(String),
    /// A filter was used but never registered
    FunctionNotFound(String),
    /// The right operand of `/` was zero
    DivisionByZero,
    /// The right operand of `%` was zero once truncated
    ModuloByZero,
    /// The target of a `for` loop is neither a sequence nor a mapping
    NotIterable,
    /// An `elseif` or `else` without a preceding `if`
    UnmatchedIf,
    /// A template was requested by name but was never added
    TemplateNotFound(String),
    /// Blocks are nested deeper than the engine allows
    RecursionLimit(usize),
    /// An error while (de)serializing data
    Json(serde_json::Error),
    /// An IO error occurred
    Io(std::io::ErrorKind),
}

/// The Error type
#[derive(Debug)]
pub struct Error {
    /// Kind of error
    pub kind: ErrorKind,
    source: Option<Box<dyn StdError + Sync + Send>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Msg(ref message) => write!(f, "{}", message),
            ErrorKind::MalformedExpression(ref message) => write!(f, "{}", message),
            ErrorKind::PathNotFound(ref segment) => write!(f, "path '{}' not found", segment),
            ErrorKind::FunctionNotFound(ref name) => write!(f, "function '{}' not found", name),
            ErrorKind::DivisionByZero => write!(f, "division by zero"),
            ErrorKind::ModuloByZero => write!(f, "modulo by zero"),
            ErrorKind::NotIterable => write!(f, "expression must evaluate to an array"),
            ErrorKind::UnmatchedIf => write!(f, "could not find matching 'if'"),
            ErrorKind::TemplateNotFound(ref name) => write!(f, "Template '{}' not found", name),
            ErrorKind::RecursionLimit(depth) => {
                write!(f, "Blocks are nested deeper than the allowed {} levels", depth)
            }
            ErrorKind::Json(ref e) => write!(f, "{}", e),
            ErrorKind::Io(ref io_error) => write!(f, "Io error while loading templates: {:?}", io_error),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|c| &**c as &(dyn StdError + 'static))
    }
}

impl Error {
    /// Creates generic error
    pub fn msg(value: impl ToString) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: None }
    }

    /// Creates generic error with a source
    pub fn chain(value: impl ToString, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: Some(source.into()) }
    }

    /// Creates a malformed expression error
    pub fn malformed(message: impl ToString) -> Self {
        Self { kind: ErrorKind::MalformedExpression(message.to_string()), source: None }
    }

    /// Creates an error for a path segment missing from the data
    pub fn path_not_found(segment: impl ToString) -> Self {
        Self { kind: ErrorKind::PathNotFound(segment.to_string()), source: None }
    }

    /// Creates an error for an unregistered filter
    pub fn function_not_found(name: impl ToString) -> Self {
        Self { kind: ErrorKind::FunctionNotFound(name.to_string()), source: None }
    }

    /// Creates a division by zero error
    pub fn division_by_zero() -> Self {
        Self { kind: ErrorKind::DivisionByZero, source: None }
    }

    /// Creates a modulo by zero error
    pub fn modulo_by_zero() -> Self {
        Self { kind: ErrorKind::ModuloByZero, source: None }
    }

    /// Creates an error for a `for` loop over something that isn't iterable
    pub fn not_iterable() -> Self {
        Self { kind: ErrorKind::NotIterable, source: None }
    }

    /// Creates an error for an `elseif`/`else` missing its `if`
    pub fn unmatched_if() -> Self {
        Self { kind: ErrorKind::UnmatchedIf, source: None }
    }

    /// Creates template not found error
    pub fn template_not_found(tpl: impl ToString) -> Self {
        Self { kind: ErrorKind::TemplateNotFound(tpl.to_string()), source: None }
    }

    /// Creates an error for blocks nested past the configured maximum
    pub fn recursion_limit(depth: usize) -> Self {
        Self { kind: ErrorKind::RecursionLimit(depth), source: None }
    }

    /// Creates JSON error
    pub fn json(value: serde_json::Error) -> Self {
        Self { kind: ErrorKind::Json(value), source: None }
    }

    /// Creates an IO error
    pub fn io_error(error: std::io::Error) -> Self {
        Self { kind: ErrorKind::Io(error.kind()), source: Some(Box::new(error)) }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::io_error(error)
    }
}
impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Self::msg(e)
    }
}
impl From<String> for Error {
    fn from(e: String) -> Self {
        Self::msg(e)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::json(e)
    }
}
/// Convenient wrapper around std::Result.
pub type Result<T> = ::std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_and_sync() {
        fn test_send_sync<T: Send + Sync>() {}

        test_send_sync::<super::Error>();
    }

    #[test]
    fn display_matches_inline_diagnostics() {
        assert_eq!(Error::path_not_found("m").to_string(), "path 'm' not found");
        assert_eq!(Error::function_not_found("eq").to_string(), "function 'eq' not found");
        assert_eq!(Error::division_by_zero().to_string(), "division by zero");
        assert_eq!(Error::modulo_by_zero().to_string(), "modulo by zero");
        assert_eq!(Error::not_iterable().to_string(), "expression must evaluate to an array");
        assert_eq!(Error::unmatched_if().to_string(), "could not find matching 'if'");
        assert_eq!(Error::malformed("not enough operands").to_string(), "not enough operands");
    }

    #[test]
    fn chain_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::chain("Couldn't open template", io);
        assert_eq!(err.to_string(), "Couldn't open template");
        assert_eq!(err.source().unwrap().to_string(), "gone");
    }
}
