use crate::errors::SwaymateError;
use crate::tracker::TrackerError;

#[derive(Debug, thiserror::Error)]
pub enum UsrCmdError {
    #[error("Unknown user command: {name}")]
    UnknownCommand { name: String },

    #[error("No focused window")]
    NoFocusedWindow,

    #[error("User command failed: {message}")]
    CommandFailed { message: String },

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl SwaymateError for UsrCmdError {
    fn error_code(&self) -> &'static str {
        match self {
            UsrCmdError::UnknownCommand { .. } => "UNKNOWN_COMMAND",
            UsrCmdError::NoFocusedWindow => "NO_FOCUSED_WINDOW",
            UsrCmdError::CommandFailed { .. } => "USR_CMD_FAILED",
            UsrCmdError::Tracker(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            UsrCmdError::UnknownCommand { .. } | UsrCmdError::NoFocusedWindow => true,
            UsrCmdError::CommandFailed { .. } => false,
            UsrCmdError::Tracker(e) => e.is_user_error(),
        }
    }
}
