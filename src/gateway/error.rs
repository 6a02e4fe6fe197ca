//! Gateway error types

use thiserror::Error;

/// Errors from the simulation backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// Non-200 response (carries the body) or a transport failure
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid parameter '{0}', expected key=value")]
    InvalidParam(String),
}

impl GatewayError {
    /// The backend body or transport message
    pub fn message(&self) -> &str {
        match self {
            GatewayError::CommandFailed(msg) | GatewayError::InvalidParam(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::CommandFailed(format!("request timed out: {}", err))
        } else {
            GatewayError::CommandFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_body() {
        let err = GatewayError::CommandFailed("agent u9 unknown".to_string());
        assert_eq!(err.to_string(), "Command failed: agent u9 unknown");
        assert_eq!(err.message(), "agent u9 unknown");
    }

    #[test]
    fn test_invalid_param_display() {
        let err = GatewayError::InvalidParam("speed".to_string());
        assert!(err.to_string().contains("key=value"));
    }
}
