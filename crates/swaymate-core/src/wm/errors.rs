use crate::errors::SwaymateError;

#[derive(Debug, thiserror::Error)]
pub enum WmError {
    #[error("'{binary}' not found in PATH; is sway running?")]
    BinaryNotFound { binary: String },

    #[error("Window manager rejected command '{cmd}': {message}")]
    CommandRejected { cmd: String, message: String },

    #[error("Failed to parse window manager reply: {message}")]
    ParseError { message: String },

    #[error("Window event subscription ended")]
    SubscriptionClosed,

    #[error("IO error talking to the window manager: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl SwaymateError for WmError {
    fn error_code(&self) -> &'static str {
        match self {
            WmError::BinaryNotFound { .. } => "WM_BINARY_NOT_FOUND",
            WmError::CommandRejected { .. } => "WM_COMMAND_REJECTED",
            WmError::ParseError { .. } => "WM_PARSE_ERROR",
            WmError::SubscriptionClosed => "WM_SUBSCRIPTION_CLOSED",
            WmError::IoError { .. } => "WM_IO_ERROR",
        }
    }
}
