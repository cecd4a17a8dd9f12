//! Configuration management for the Marina SAT client and proxy

pub mod settings;

pub use settings::{
    Settings, SolverConfig, ProxyConfig, OutputConfig, InterpretationConfig,
    OutputFormat, UnsatRule, CliOverrides, DEFAULT_BASE_URL, BASE_URL_ENV
};
