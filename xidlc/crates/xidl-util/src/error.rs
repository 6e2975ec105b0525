//! Core error types for the XIDL compiler.
//!
//! Every diagnostic the compiler can produce is one of the variants below.
//! A diagnostic aborts the current parse; the driver collects the rendered
//! message and moves on to the next input file.

use thiserror::Error;

/// A compiler diagnostic.
///
/// Located variants render as `filename:line: error: message: offending`,
/// the format the driver prints to the error stream.
#[derive(Debug, Error)]
pub enum Error {
    /// A root or imported IDL file could not be opened.
    #[error("cannot open idl file: {filename}")]
    IoOpen { filename: String },

    /// The lexer produced an invalid token.
    #[error("{filename}:{line}: error: invalid token: {text}")]
    Lex {
        filename: String,
        line: u32,
        text: String,
    },

    /// A token did not match the grammar's expectation.
    #[error("{filename}:{line}: error: {message}: {found}")]
    Syntax {
        filename: String,
        line: u32,
        message: String,
        found: String,
    },

    /// A name failed to resolve, a definition clashed, or a declaration
    /// broke a typing rule.
    #[error("{filename}:{line}: error: {message}: {offending}")]
    Semantic {
        filename: String,
        line: u32,
        message: String,
        offending: String,
    },

    /// An invariant violation inside the compiler itself.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_open_display() {
        let err = Error::IoOpen {
            filename: "missing.idl".into(),
        };
        assert_eq!(err.to_string(), "cannot open idl file: missing.idl");
    }

    #[test]
    fn test_syntax_display_format() {
        let err = Error::Syntax {
            filename: "a.idl".into(),
            line: 12,
            message: "unexpected token".into(),
            found: "}".into(),
        };
        assert_eq!(err.to_string(), "a.idl:12: error: unexpected token: }");
    }

    #[test]
    fn test_semantic_display_format() {
        let err = Error::Semantic {
            filename: "types.idl".into(),
            line: 3,
            message: "type not found".into(),
            offending: "Missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "types.idl:3: error: type not found: Missing"
        );
    }

    #[test]
    fn test_internal_display() {
        let err = Error::internal("unbalanced @ in template");
        assert_eq!(err.to_string(), "internal error: unbalanced @ in template");
    }
}
