use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    ConnectionRefused,
    Timeout,
    NotFound,     // HTTP 404
    ServerError,  // HTTP 500+
    NetworkError, // DNS, routing, etc.
    Malformed,    // Response did not match the expected shape
    Rejected,     // Server answered but refused the request
    Other,
}

/// Classify an API error for display and retry decisions
pub fn classify_error(error: &ApiError) -> ErrorType {
    match error {
        ApiError::Status { status, .. } => match status {
            404 => ErrorType::NotFound,
            500..=599 => ErrorType::ServerError,
            _ => ErrorType::Other,
        },
        ApiError::MalformedResponse { .. } => ErrorType::Malformed,
        ApiError::Rejected(_) => ErrorType::Rejected,
        ApiError::Transport { source, .. } => {
            if source.is_timeout() {
                return ErrorType::Timeout;
            }
            classify_message(&format_error_message(error))
                .unwrap_or(if source.is_connect() {
                    ErrorType::NetworkError
                } else {
                    ErrorType::Other
                })
        }
    }
}

/// Classify by the text of the root cause (transport errors only carry text)
fn classify_message(message: &str) -> Option<ErrorType> {
    let msg = message.to_lowercase();

    if msg.contains("connection refused") {
        return Some(ErrorType::ConnectionRefused);
    }
    if msg.contains("timeout") || msg.contains("timed out") {
        return Some(ErrorType::Timeout);
    }
    if msg.contains("dns") || msg.contains("network") {
        return Some(ErrorType::NetworkError);
    }
    None
}

/// Format error message for display - show the root cause
pub fn format_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Transport { .. } => {
            // Walk the chain to the deepest (root cause) error
            let mut current: &dyn std::error::Error = error;
            while let Some(source) = current.source() {
                current = source;
            }
            current.to_string()
        }
        other => other.to_string(),
    }
}

/// Short label for the inline error line
pub fn error_label(kind: &ErrorType) -> &'static str {
    match kind {
        ErrorType::ConnectionRefused => "Connection refused",
        ErrorType::Timeout => "Timed out",
        ErrorType::NotFound => "Not found",
        ErrorType::ServerError => "Server error",
        ErrorType::NetworkError => "Network error",
        ErrorType::Malformed => "Unexpected response",
        ErrorType::Rejected => "Rejected",
        ErrorType::Other => "Error",
    }
}
