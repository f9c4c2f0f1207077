use swaymate_core::SwaymateError;

/// Errors of the RPC client/server layer.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("Daemon is not running")]
    NotRunning,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Window-manager event stream closed")]
    EventStreamClosed,

    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("No focused window: {0}")]
    NoFocusedWindow(String),

    #[error("Unknown user command: {0}")]
    UnknownCommand(String),

    #[error("Daemon error [{code}]: {message}")]
    RemoteError { code: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwaymateError for DaemonError {
    fn error_code(&self) -> &'static str {
        match self {
            DaemonError::NotRunning => "DAEMON_NOT_RUNNING",
            DaemonError::ConnectionFailed(_) => "CONNECTION_FAILED",
            DaemonError::ProtocolError(_) => "PROTOCOL_ERROR",
            DaemonError::Timeout => "REQUEST_TIMEOUT",
            DaemonError::EventStreamClosed => "EVENT_STREAM_CLOSED",
            DaemonError::WindowNotFound(_) => "WINDOW_NOT_FOUND",
            DaemonError::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",
            DaemonError::NoFocusedWindow(_) => "NO_FOCUSED_WINDOW",
            DaemonError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            DaemonError::RemoteError { .. } => "REMOTE_ERROR",
            DaemonError::Io(_) => "DAEMON_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            DaemonError::WindowNotFound(_)
                | DaemonError::WorkspaceNotFound(_)
                | DaemonError::NoFocusedWindow(_)
                | DaemonError::UnknownCommand(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DaemonError::NotRunning.error_code(), "DAEMON_NOT_RUNNING");
        assert_eq!(DaemonError::Timeout.error_code(), "REQUEST_TIMEOUT");
        assert!(!DaemonError::Timeout.is_user_error());
        assert!(DaemonError::WindowNotFound("42".to_string()).is_user_error());
    }
}
