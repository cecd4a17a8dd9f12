//! JSON payloads exchanged with the solver and the proxy

use serde::{Deserialize, Serialize};

/// Path of the solving endpoint, relative to the solver base URL
pub const SOLVE_PATH: &str = "/marina";

/// Path served by the proxy forwarder
pub const PROXY_PATH: &str = "/api/solve";

pub const FORMULA_REQUIRED: &str = "Formula is required";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Body sent to the solver.
///
/// `prop` is the formula text; the proxy forwards whatever JSON value the
/// browser supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest<P> {
    pub prop: P,
}

/// Answer from the solver.
///
/// Both fields are always serialized, as `null` when absent. Missing fields
/// decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub assignment: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn assignment(assignment: impl Into<String>) -> Self {
        Self {
            assignment: Some(assignment.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            assignment: None,
            error: Some(message.into()),
        }
    }
}

/// Error body returned by the proxy itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_string(&SolveRequest { prop: "a & b" }).unwrap();
        assert_eq!(body, r#"{"prop":"a & b"}"#);

        let body = serde_json::to_string(&SolveRequest { prop: &serde_json::json!(1) }).unwrap();
        assert_eq!(body, r#"{"prop":1}"#);
    }

    #[test]
    fn test_response_always_has_both_fields() {
        let body = serde_json::to_string(&SolveResponse::failure("boom")).unwrap();
        assert_eq!(body, r#"{"assignment":null,"error":"boom"}"#);
    }

    #[test]
    fn test_missing_fields_decode_as_null() {
        let response: SolveResponse = serde_json::from_str(r#"{"assignment":"(a,true)"}"#).unwrap();
        assert_eq!(response, SolveResponse::assignment("(a,true)"));

        let response: SolveResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, SolveResponse::default());
    }
}
