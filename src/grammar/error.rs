//! Errors raised while checking formula text locally

use thiserror::Error;

/// Rejection of a formula before anything is sent to the solver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Please enter a formula")]
    Empty,
}

/// Syntax error with the byte offset where it was detected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("formula is empty")]
    Empty,
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("uppercase letter '{ch}' at offset {offset}: variables are lowercase, only T and F stand alone")]
    UppercaseLetter { ch: char, offset: usize },
    #[error("'-' at offset {offset} must be followed by '>'")]
    DanglingHyphen { offset: usize },
    #[error("'<' at offset {offset} must start '<->'")]
    IncompleteEquivalence { offset: usize },
    #[error("expected {expected} at offset {offset}, found '{found}'")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },
    #[error("unexpected end of formula, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("parenthesis opened at offset {offset} is never closed")]
    UnclosedParen { offset: usize },
    #[error("formula nests parentheses deeper than {limit} levels")]
    TooDeep { limit: usize },
}

impl GrammarError {
    /// Byte offset of the offending input, when there is one
    pub fn offset(&self) -> Option<usize> {
        match self {
            GrammarError::UnexpectedChar { offset, .. }
            | GrammarError::UppercaseLetter { offset, .. }
            | GrammarError::DanglingHyphen { offset }
            | GrammarError::IncompleteEquivalence { offset }
            | GrammarError::UnexpectedToken { offset, .. }
            | GrammarError::UnclosedParen { offset } => Some(*offset),
            GrammarError::Empty | GrammarError::UnexpectedEnd { .. } | GrammarError::TooDeep { .. } => None,
        }
    }
}
