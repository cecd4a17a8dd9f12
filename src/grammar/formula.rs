//! Formula text accepted for submission

use super::error::{FormulaError, GrammarError};
use super::validator::{validate, CheckedFormula};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Formula text that is non-empty after trimming.
///
/// The text is kept exactly as entered; only the emptiness check happens on
/// construction. Grammar checking is separate (see [`Formula::check`]) since
/// the solver is the final authority on what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Formula(String);

impl Formula {
    pub fn new(text: impl Into<String>) -> Result<Self, FormulaError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(FormulaError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Run the local grammar check
    pub fn check(&self) -> Result<CheckedFormula, GrammarError> {
        validate(&self.0)
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

impl AsRef<str> for Formula {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(Formula::new(""), Err(FormulaError::Empty));
        assert_eq!(Formula::new(" \n\t "), Err(FormulaError::Empty));
        assert_eq!("".parse::<Formula>(), Err(FormulaError::Empty));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let formula = Formula::new("  a & b ").unwrap();
        assert_eq!(formula.as_str(), "  a & b ");
        assert_eq!(serde_json::to_string(&formula).unwrap(), "\"  a & b \"");
    }

    #[test]
    fn test_check() {
        assert!(Formula::new("a & b").unwrap().check().is_ok());
        assert!(Formula::new("a b").unwrap().check().is_err());
    }
}
