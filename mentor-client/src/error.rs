use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Ответы сервера вне 2xx
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    // Платёжный процессор
    #[error("Payment failed: {0}")]
    Payment(String),

    // Проверки на стороне клиента
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ClientError {
    /// Builds the error for a non-2xx response: the server message when the
    /// body carried one, otherwise the bare HTTP status.
    pub fn from_status(status: StatusCode, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Api { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// HTTP status of a rejected request, if the error came from the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ClientError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::HttpError(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_status() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            Some("Mentor is not accepting requests".to_string()),
        );
        assert_eq!(err.to_string(), "Mentor is not accepting requests");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn falls_back_to_status_without_message() {
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error");

        let blank = ClientError::from_status(StatusCode::BAD_GATEWAY, Some("  ".into()));
        assert_eq!(blank.to_string(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn maps_auth_and_missing_statuses() {
        assert!(ClientError::from_status(StatusCode::UNAUTHORIZED, None).is_unauthorized());
        assert!(ClientError::from_status(StatusCode::NOT_FOUND, None).is_not_found());
    }

    #[test]
    fn every_server_error_displays_the_bare_message() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::FORBIDDEN,
        ] {
            let err = ClientError::from_status(status, Some("Connection not found".into()));
            assert_eq!(err.to_string(), "Connection not found");
        }
        assert_eq!(
            ClientError::from_status(StatusCode::NOT_FOUND, None).to_string(),
            "HTTP 404 Not Found"
        );
    }
}
