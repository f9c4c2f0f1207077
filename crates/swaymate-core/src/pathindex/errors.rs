use crate::errors::SwaymateError;

#[derive(Debug, thiserror::Error)]
pub enum PathIndexError {
    #[error("Directory listing failed: {source}")]
    ListingError {
        #[from]
        source: std::io::Error,
    },

    #[error("Filesystem watch error: {source}")]
    WatchError {
        #[from]
        source: notify::Error,
    },

    #[error("Index state machine stopped")]
    MachineStopped,
}

impl SwaymateError for PathIndexError {
    fn error_code(&self) -> &'static str {
        match self {
            PathIndexError::ListingError { .. } => "PATHINDEX_LISTING_ERROR",
            PathIndexError::WatchError { .. } => "PATHINDEX_WATCH_ERROR",
            PathIndexError::MachineStopped => "PATHINDEX_MACHINE_STOPPED",
        }
    }
}
