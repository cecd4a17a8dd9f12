//! Marina SAT client
//!
//! Checks boolean formulas against the Marina formula grammar, submits them
//! to a remote Marina solver over HTTP, optionally proxies browser requests
//! to that solver, and classifies the solver's answer as satisfiable,
//! unsatisfiable or failed.

pub mod client;
pub mod config;
pub mod grammar;
pub mod interpret;
pub mod protocol;
pub mod proxy;
pub mod utils;

pub use client::MarinaClient;
pub use config::Settings;
pub use grammar::{is_well_formed, Formula};
pub use interpret::{interpret, Outcome};
pub use protocol::SolveResponse;

use anyhow::Result;

/// Check, submit and classify a formula in one go
pub async fn solve_formula(settings: &Settings, text: &str) -> Result<Outcome> {
    let formula = Formula::new(text)?;
    formula.check()?;

    let client = MarinaClient::from_settings(settings)?;
    let response = client.solve(&formula).await;
    Ok(interpret(&response, settings.interpretation.unsat_rule))
}
