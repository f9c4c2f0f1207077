//! User-extensible commands and window-event listeners.
//!
//! Commands are plain functions taking the [`DaemonApi`] capability handle
//! and a parsed flag map, returning a string relayed to the RPC caller.

mod api;
pub mod args;
pub mod builtin;
pub mod errors;
mod registry;

pub use api::DaemonApi;
pub use args::parse_flags;
pub use errors::UsrCmdError;
pub use registry::{CommandRegistry, ListenerFn, UserFn};
