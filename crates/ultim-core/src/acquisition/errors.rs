//! Acquisition error types.
//!
//! These errors are serializable so they can cross to the host UI. I/O
//! failures are captured as kind and message strings rather than carrying
//! `std::io::Error`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forecast::ForecastCycle;

/// Error type for weather data acquisition.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AcquisitionError {
    /// Network failure on a single request.
    #[error("Transport error: {message}")]
    Transport {
        /// Detailed error message.
        message: String,
    },

    /// The archive answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The archive answered successfully but with no content.
    #[error("Empty response body from {url}")]
    EmptyBody {
        /// The URL that was requested.
        url: String,
    },

    /// Local file operation failed.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "`NotFound`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The probe file of a cycle could not be fetched.
    #[error("Cycle {cycle} is not available")]
    CycleUnavailable {
        /// The cycle that was probed.
        cycle: ForecastCycle,
    },

    /// Every candidate cycle failed its probe.
    #[error("No usable forecast data after {attempts} cycle attempts")]
    AcquisitionExhausted {
        /// Number of cycles tried.
        attempts: u32,
    },

    /// The decoder rejected a downloaded file.
    #[error("Decode error: {message}")]
    Decode {
        /// Detailed error message.
        message: String,
    },

    /// The run was aborted by the host.
    #[error("Acquisition cancelled")]
    Cancelled,
}

impl AcquisitionError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an HTTP status error.
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Create an empty body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AcquisitionExhausted { .. } => "No usable forecast data.".to_string(),
            Self::Cancelled => "Weather download was cancelled.".to_string(),
            Self::CycleUnavailable { cycle } => {
                format!("Forecast run {cycle} is not published yet.")
            }
            Self::HttpStatus { status, .. } => format!("Weather server returned HTTP {status}."),
            Self::Transport { message } => format!("Network error: {message}"),
            Self::EmptyBody { .. } => "Weather server returned an empty file.".to_string(),
            Self::Io { message, .. } => format!("File operation failed: {message}"),
            Self::Decode { message } => format!("Could not read forecast file: {message}"),
        }
    }
}

impl From<std::io::Error> for AcquisitionError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

/// Convenience result type for acquisition operations.
pub type AcquisitionResult<T> = Result<T, AcquisitionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = AcquisitionError::from_io_error(&io_err);

        match err {
            AcquisitionError::Io { kind, message } => {
                assert_eq!(kind, "PermissionDenied");
                assert!(message.contains("read-only"));
            }
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_serialization() {
        let cycle = ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), 18).unwrap();
        let err = AcquisitionError::CycleUnavailable { cycle };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("2024-05-02"));

        let parsed: AcquisitionError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }

    #[test]
    fn test_user_message() {
        let err = AcquisitionError::http_status(404, "https://example.test/f000");
        assert!(err.user_message().contains("404"));
        assert_eq!(
            AcquisitionError::AcquisitionExhausted { attempts: 5 }.user_message(),
            "No usable forecast data."
        );
    }
}
