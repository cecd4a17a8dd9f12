//! Assignment strings returned by the solver
//!
//! The solver answers with space-separated `(name,value)` tokens such as
//! `(a,true) (b,false)`. The reserved token `(,false)` on its own means no
//! assignment exists.

use itertools::Itertools;
use serde::Serialize;

/// Assignment string signalling an unsatisfiable formula
pub const UNSAT_SENTINEL: &str = "(,false)";

/// One `(name,value)` token as it appeared on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPair<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// A variable and the truth value the solver gave it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableValue {
    pub name: String,
    pub value: bool,
}

impl VariableValue {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Ordered variable assignment decoded from an assignment string
pub type ParsedAssignment = Vec<VariableValue>;

/// Whether `assignment` is exactly the UNSAT sentinel
pub fn is_unsat_sentinel(assignment: &str) -> bool {
    assignment == UNSAT_SENTINEL
}

/// Split an assignment string into its tokens.
///
/// Parentheses are stripped and the remainder split on `,`; tokens that do
/// not produce exactly two parts are skipped.
pub fn raw_pairs(assignment: &str) -> impl Iterator<Item = RawPair<'_>> {
    assignment.split(' ').filter_map(|token| {
        let token = token.trim_start_matches('(').trim_end_matches(')');
        let (name, value) = token.split_once(',')?;
        if value.contains(',') {
            return None;
        }
        Some(RawPair { name, value })
    })
}

/// Decode the named pairs of an assignment string, in order.
///
/// Pairs with an empty name (the sentinel) are left out.
pub fn parse_assignment(assignment: &str) -> ParsedAssignment {
    raw_pairs(assignment)
        .filter(|pair| !pair.name.is_empty())
        .map(|pair| VariableValue::new(pair.name, pair.value == "true"))
        .collect()
}

/// Encode pairs back into the solver's assignment string format
pub fn to_assignment_string(pairs: &[VariableValue]) -> String {
    pairs
        .iter()
        .map(|pair| format!("({},{})", pair.name, pair.value))
        .join(" ")
}
