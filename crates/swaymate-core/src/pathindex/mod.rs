//! Executable index over the directories of `PATH`.
//!
//! Keeps one cached listing per directory and refreshes it on filesystem
//! change events, debounced so event bursts cost at most one extra listing.
//! Consumers wait for the aggregation state (every directory settled) and
//! read the deduplicated union.

pub mod errors;
mod machine;
mod scan;

pub use errors::PathIndexError;
pub use machine::{DirPhase, DirStats, PathWatcher};
pub use scan::list_executables;
