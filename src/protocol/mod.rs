//! Wire contract with the Marina solver

pub mod assignment;
pub mod messages;

pub use assignment::{
    is_unsat_sentinel, parse_assignment, raw_pairs, to_assignment_string,
    ParsedAssignment, RawPair, VariableValue, UNSAT_SENTINEL
};
pub use messages::{
    ErrorBody, SolveRequest, SolveResponse, FORMULA_REQUIRED, INTERNAL_SERVER_ERROR,
    PROXY_PATH, SOLVE_PATH
};
