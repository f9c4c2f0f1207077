//! Typed client for short-lived picker invocations.

mod connection;

pub use connection::DaemonClient;
