//! MRU window tracking fed by window-manager events.
//!
//! The tracker owns a bounded most-recently-used list of window ids plus a
//! record per id. Focus and new events move a window to the head, close
//! events drop it, and the list is trimmed on every insertion so it never
//! exceeds the configured cap. Lookups never touch the window manager;
//! operations that act on live state (moves, focus) go back through the
//! injected client.

pub mod errors;
pub mod format;
mod mru;
mod operations;
mod types;

pub use errors::TrackerError;
pub use format::max_len;
pub use mru::FocusOrder;
pub use operations::Tracker;
pub use types::WindowRecord;
