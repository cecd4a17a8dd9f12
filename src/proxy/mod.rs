//! Stateless proxy forwarder in front of the solver

pub mod server;

pub use server::{router, serve, ProxyState};
