//! Translation error types
//!
//! Every failure is fatal: the first [`ParseError`] aborts the whole
//! translation and no partial program is returned.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{describe, LexError, TokenKind};
use crate::symbols::SymbolError;
use std::fmt;
use thiserror::Error;

/// The token kinds a rule would have accepted at a failure point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expected(pub Vec<TokenKind>);

impl Expected {
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.0.contains(&kind)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "nothing"),
            [single] => write!(f, "{}", single),
            kinds => {
                write!(f, "one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
        }
    }
}

/// Errors raised while translating source text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(
        "Parse error at {location}: unexpected {}, expected {expected}",
        describe(.found, .lexeme)
    )]
    UnexpectedToken {
        found: TokenKind,
        lexeme: String,
        expected: Expected,
        location: SourceLocation,
    },

    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Name error at {location}: '{name}' is not defined")]
    UndefinedName {
        name: String,
        location: SourceLocation,
    },

    #[error("Name error at {location}: '{name}' is already defined in this scope")]
    DuplicateName {
        name: String,
        location: SourceLocation,
    },

    /// `role` is what the name is actually bound to
    #[error("Name error at {location}: '{name}' is a {role}, not a function")]
    NotCallable {
        name: String,
        role: &'static str,
        location: SourceLocation,
    },

    #[error("Name error at {location}: '{name}' is a {role}, not a variable")]
    NotAVariable {
        name: String,
        role: &'static str,
        location: SourceLocation,
    },

    #[error("Name error at {location}: '{name}' is a {role}, not a type")]
    NotAType {
        name: String,
        role: &'static str,
        location: SourceLocation,
    },

    #[error(
        "Type error at {location}: return statements of '{function}' disagree on the return type"
    )]
    InconsistentReturnType {
        function: String,
        location: SourceLocation,
    },

    #[error("Type error at {location}: function '{function}' has no reachable return statement")]
    MissingReturn {
        function: String,
        location: SourceLocation,
    },

    #[error("Type error at {location}: '{function}' takes {expected} argument(s), got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
        location: SourceLocation,
    },

    #[error("Type error at {location}: expected '{expected}', found '{found}'")]
    TypeMismatch {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: left side of '=' must be a variable")]
    InvalidAssignTarget { location: SourceLocation },

    #[error("Parse error at {location}: invalid literal '{lexeme}'")]
    InvalidLiteral {
        lexeme: String,
        location: SourceLocation,
    },
}

impl ParseError {
    /// Attach a location to a scope table failure.
    pub fn from_symbol(err: SymbolError, location: SourceLocation) -> Self {
        match err {
            SymbolError::DuplicateName { name } => ParseError::DuplicateName { name, location },
            SymbolError::UndefinedName { name } => ParseError::UndefinedName { name, location },
        }
    }

    /// Location the error was reported at.
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Lex(LexError::InvalidCharacter { location, .. })
            | ParseError::Lex(LexError::UnterminatedString { location })
            | ParseError::UnexpectedToken { location, .. }
            | ParseError::UndefinedName { location, .. }
            | ParseError::DuplicateName { location, .. }
            | ParseError::NotCallable { location, .. }
            | ParseError::NotAVariable { location, .. }
            | ParseError::NotAType { location, .. }
            | ParseError::InconsistentReturnType { location, .. }
            | ParseError::MissingReturn { location, .. }
            | ParseError::ArityMismatch { location, .. }
            | ParseError::TypeMismatch { location, .. }
            | ParseError::InvalidAssignTarget { location }
            | ParseError::InvalidLiteral { location, .. } => *location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let err = ParseError::UnexpectedToken {
            found: TokenKind::Ident,
            lexeme: "foo".to_string(),
            expected: Expected(vec![TokenKind::Semicolon, TokenKind::Comma]),
            location: SourceLocation::new(3, 7),
        };

        assert_eq!(
            err.to_string(),
            "Parse error at line 3, column 7: unexpected identifier 'foo', expected one of ';', ','"
        );
    }

    #[test]
    fn test_symbol_error_gets_location() {
        let loc = SourceLocation::new(1, 2);
        let err = ParseError::from_symbol(SymbolError::DuplicateName { name: "a".into() }, loc);

        assert_eq!(
            err,
            ParseError::DuplicateName {
                name: "a".into(),
                location: loc
            }
        );
        assert_eq!(err.location(), loc);
    }
}
