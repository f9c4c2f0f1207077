//! JSONL RPC protocol between the daemon and its clients.

pub mod codec;
pub mod messages;

pub use codec::{read_message, write_message};
pub use messages::{ClientMessage, DaemonMessage};
