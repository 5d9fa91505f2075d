use thiserror::Error;

/// Failure of the OCR call, before it is collapsed to an empty result.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OCR request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OCR service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OCR response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("OCR service reported an error: {message}")]
    Provider { message: String },

    #[error("OCR response has no parsed results")]
    NoParsedResults,

    #[error("OCR result has no ParsedText")]
    MissingText,
}

/// Failure of the generation call, before it is collapsed to the fallback sentence.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generation service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Generation response has no generations")]
    NoGenerations,

    #[error("Generation has no text")]
    MissingText,
}

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported image: {reason}")]
    UnsupportedImage { reason: String },

    #[error("Cannot {action} while the session is {state}")]
    InvalidState { action: String, state: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HelperError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HelperError::HttpClientError(_) => ErrorCategory::Network,
            HelperError::ConfigError { .. }
            | HelperError::ConfigValidationError { .. }
            | HelperError::InvalidConfigValueError { .. }
            | HelperError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HelperError::UnsupportedImage { .. } | HelperError::InvalidState { .. } => {
                ErrorCategory::Input
            }
            HelperError::IoError(_) | HelperError::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HelperError::HttpClientError(_) => "Could not set up the HTTP client.".to_string(),
            HelperError::IoError(e) => format!("Could not read or write a file: {}", e),
            HelperError::MissingConfigError { field } => {
                format!("Missing required setting '{}'.", field)
            }
            HelperError::UnsupportedImage { reason } => {
                format!("This file cannot be used: {}", reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "Check your network connection and API keys, then try again.".to_string()
            }
            ErrorCategory::Configuration => {
                "Set OCR_API_KEY and COHERE_API_KEY, or check the config file values.".to_string()
            }
            ErrorCategory::Input => "Upload a JPEG or PNG photo of the homework.".to_string(),
            ErrorCategory::System => "Check file permissions and the bind address.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = HelperError::MissingConfigError {
            field: "ocr.api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("ocr.api_key"));
    }

    #[test]
    fn test_unsupported_image_is_high_severity_input() {
        let err = HelperError::UnsupportedImage {
            reason: "notes.gif is not a JPEG or PNG file".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("notes.gif"));
        assert_eq!(
            err.recovery_suggestion(),
            "Upload a JPEG or PNG photo of the homework."
        );
    }

    #[test]
    fn test_invalid_state_message() {
        let err = HelperError::InvalidState {
            action: "explain".to_string(),
            state: "idle".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot explain while the session is idle");
        assert_eq!(err.category(), ErrorCategory::Input);
    }
}
