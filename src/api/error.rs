use thiserror::Error;

pub const UNREACHABLE_MESSAGE: &str =
    "Cannot reach the server. Check your internet connection.";
pub const GENERIC_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a status code.
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

impl ApiError {
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        if status == 401 || status == 403 {
            return ApiError::Unauthorized { status };
        }
        ApiError::Server {
            status,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text shown to the user in an error notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => UNREACHABLE_MESSAGE.to_string(),
            ApiError::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Decode(_) => GENERIC_MESSAGE.to_string(),
            ApiError::Pdf(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_and_403_are_auth_failures() {
        assert!(ApiError::from_status(401, None).is_auth_failure());
        assert!(ApiError::from_status(403, Some("nope".to_string())).is_auth_failure());
        assert!(!ApiError::from_status(500, None).is_auth_failure());
    }

    #[test]
    fn test_server_message_is_surfaced() {
        let err = ApiError::from_status(400, Some("Email already in use".to_string()));
        assert_eq!(err.user_message(), "Email already in use");
    }

    #[test]
    fn test_blank_server_message_falls_back() {
        let err = ApiError::from_status(500, Some("  ".to_string()));
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_network_error_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), UNREACHABLE_MESSAGE);
    }
}
