//! Classification of solver answers

use crate::config::UnsatRule;
use crate::protocol::{
    is_unsat_sentinel, parse_assignment, raw_pairs, ParsedAssignment, SolveResponse, VariableValue,
};
use serde::Serialize;
use std::fmt;

pub const NO_ANSWER: &str = "Solver returned neither an assignment nor an error";

/// What a solver answer means, decided once right after decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Satisfiable { pairs: ParsedAssignment },
    /// Pairs are only non-empty under [`UnsatRule::AnyFalse`]
    Unsatisfiable { pairs: ParsedAssignment },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Error,
    Satisfiable,
    Unsatisfiable,
}

/// Render-ready view of an [`Outcome`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation<'a> {
    pub kind: Kind,
    pub pairs: &'a [VariableValue],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

impl Outcome {
    pub fn kind(&self) -> Kind {
        match self {
            Outcome::Satisfiable { .. } => Kind::Satisfiable,
            Outcome::Unsatisfiable { .. } => Kind::Unsatisfiable,
            Outcome::Error { .. } => Kind::Error,
        }
    }

    pub fn pairs(&self) -> &[VariableValue] {
        match self {
            Outcome::Satisfiable { pairs } | Outcome::Unsatisfiable { pairs } => pairs,
            Outcome::Error { .. } => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn interpretation(&self) -> Interpretation<'_> {
        Interpretation {
            kind: self.kind(),
            pairs: self.pairs(),
            message: self.error_message(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Error => write!(f, "Error"),
            Kind::Satisfiable => write!(f, "Satisfiable"),
            Kind::Unsatisfiable => write!(f, "Unsatisfiable"),
        }
    }
}

/// Classify a solver answer
pub fn interpret(response: &SolveResponse, rule: UnsatRule) -> Outcome {
    if let Some(message) = &response.error {
        return Outcome::Error {
            message: message.clone(),
        };
    }

    let Some(assignment) = response.assignment.as_deref() else {
        return Outcome::Error {
            message: NO_ANSWER.to_string(),
        };
    };

    let pairs = parse_assignment(assignment);
    if is_unsatisfiable(assignment, rule) {
        Outcome::Unsatisfiable { pairs }
    } else {
        Outcome::Satisfiable { pairs }
    }
}

fn is_unsatisfiable(assignment: &str, rule: UnsatRule) -> bool {
    if is_unsat_sentinel(assignment) {
        return true;
    }
    match rule {
        UnsatRule::Sentinel => false,
        UnsatRule::AnyFalse => raw_pairs(assignment).any(|pair| pair.value == "false"),
    }
}
