//! Transport client for the remote solver

pub mod transport;

pub use transport::{solve_endpoint, ClientError, Forwarded, MarinaClient, TransportError};
