//! Formula language: tokenizer, grammar check and the submittable formula type

pub mod error;
pub mod formula;
pub mod lexer;
pub mod validator;

pub use error::{FormulaError, GrammarError};
pub use formula::Formula;
pub use lexer::{Lexer, Token};
pub use validator::{is_well_formed, validate, CheckedFormula};
