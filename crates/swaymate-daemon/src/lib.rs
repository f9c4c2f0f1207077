//! swaymate-daemon: the swaymate daemon process and its RPC client.
//!
//! The daemon keeps a live view of sway's window state (MRU tracker), a
//! debounced executable index over `$PATH`, and the exclusive picker-session
//! gate, and serves all of it to short-lived clients over JSONL on localhost
//! TCP.

pub mod client;
pub mod errors;
pub mod protocol;
pub mod server;
pub mod session;
pub mod state;

pub use client::DaemonClient;
pub use errors::DaemonError;
pub use protocol::{ClientMessage, DaemonMessage};
pub use server::run_server;
pub use session::PickerGate;
pub use state::{run_event_loop, DaemonState};
