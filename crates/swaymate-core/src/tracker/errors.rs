use crate::errors::SwaymateError;
use crate::wm::WmError;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("No tracked window with id {id}")]
    WindowNotFound { id: i64 },

    #[error("No workspace matching number {num}")]
    WorkspaceNotFound { num: i32 },

    #[error("No focused window")]
    NoFocusedWindow,

    #[error(transparent)]
    Wm(#[from] WmError),
}

impl SwaymateError for TrackerError {
    fn error_code(&self) -> &'static str {
        match self {
            TrackerError::WindowNotFound { .. } => "WINDOW_NOT_FOUND",
            TrackerError::WorkspaceNotFound { .. } => "WORKSPACE_NOT_FOUND",
            TrackerError::NoFocusedWindow => "NO_FOCUSED_WINDOW",
            TrackerError::Wm(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            TrackerError::WindowNotFound { .. }
                | TrackerError::WorkspaceNotFound { .. }
                | TrackerError::NoFocusedWindow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_misses_are_user_errors() {
        let error = TrackerError::WindowNotFound { id: 7 };
        assert_eq!(error.to_string(), "No tracked window with id 7");
        assert_eq!(error.error_code(), "WINDOW_NOT_FOUND");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_wm_errors_keep_their_code() {
        let error = TrackerError::Wm(WmError::SubscriptionClosed);
        assert_eq!(error.error_code(), "WM_SUBSCRIPTION_CLOSED");
        assert!(!error.is_user_error());
    }
}
