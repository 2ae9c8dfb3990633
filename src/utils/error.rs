use thiserror::Error;

#[derive(Error, Debug)]
pub enum GachaError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Key error: {message}")]
    KeyError { message: String },

    #[error("Signing error: {message}")]
    SigningError { message: String },

    #[error("Menu error: {message}")]
    MenuError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing process configuration; the server must not start.
    Startup,
    /// Menu fetch or parse problems; the previous menu stays in use.
    Menu,
    /// Failures while answering a single request.
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GachaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GachaError::MissingConfigError { .. }
            | GachaError::InvalidConfigValueError { .. } => ErrorCategory::Startup,
            GachaError::ApiError(_) | GachaError::IoError(_) | GachaError::MenuError { .. } => {
                ErrorCategory::Menu
            }
            GachaError::SerializationError(_)
            | GachaError::KeyError { .. }
            | GachaError::SigningError { .. } => ErrorCategory::Request,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Startup => ErrorSeverity::Critical,
            ErrorCategory::Menu => ErrorSeverity::Medium,
            ErrorCategory::Request => ErrorSeverity::High,
        }
    }

    /// Menu errors are retried by the next refresh tick.
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Menu
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GachaError::MissingConfigError { .. } => {
                "Set BOT_NSEC (or pass --bot-nsec) to the bot's secret key"
            }
            GachaError::InvalidConfigValueError { .. } => {
                "Check the command line flags and environment variables"
            }
            GachaError::KeyError { .. } => "Use a bech32 nsec1... key or 64 hex characters",
            GachaError::ApiError(_) | GachaError::IoError(_) | GachaError::MenuError { .. } => {
                "Check the menu source; the next refresh will retry"
            }
            GachaError::SerializationError(_) => "Send a JSON encoded Nostr event",
            GachaError::SigningError { .. } => "Verify the configured secret key",
        }
    }
}

pub type Result<T> = std::result::Result<T, GachaError>;
