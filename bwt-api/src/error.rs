use rest_client::RestError;
use thiserror::Error;

/// High-level errors for BWT Perla API operations
///
/// This enum abstracts away the underlying HTTP details and splits
/// failures into the categories callers actually react to: a device
/// that cannot be reached can be retried, a rejected login code cannot.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Device could not be reached
    ///
    /// Covers connection refusals, timeouts and DNS failures. Transient
    /// by nature; callers should retry with backoff.
    #[error("Connection error: {0}")]
    Connect(String),

    /// The device rejected the login code
    ///
    /// Fatal until the user reconfigures the code; retrying with the
    /// same credentials cannot succeed.
    #[error("Login code rejected by device")]
    WrongCode,

    /// Unexpected HTTP status returned by the device
    #[error("Unexpected HTTP status {0}")]
    Http(u16),

    /// Response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<RestError> for ApiError {
    fn from(error: RestError) -> Self {
        match error {
            RestError::Network(msg) => ApiError::Connect(msg),
            RestError::Status(401) => ApiError::WrongCode,
            RestError::Status(code) => ApiError::Http(code),
            RestError::Parse(msg) => ApiError::Parse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status_maps_to_wrong_code() {
        let api_error: ApiError = RestError::Status(401).into();
        assert!(matches!(api_error, ApiError::WrongCode));
    }

    #[test]
    fn test_other_status_keeps_code() {
        let api_error: ApiError = RestError::Status(503).into();
        match api_error {
            ApiError::Http(code) => assert_eq!(code, 503),
            other => panic!("Expected ApiError::Http, got {:?}", other),
        }
    }

    #[test]
    fn test_rest_error_conversion() {
        let api_error: ApiError = RestError::Network("connection timeout".to_string()).into();
        assert!(matches!(api_error, ApiError::Connect(_)));

        let api_error: ApiError = RestError::Parse("invalid JSON".to_string()).into();
        assert!(matches!(api_error, ApiError::Parse(_)));
    }
}
