use std::fmt;

/// API errors with user-friendly messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network-level failure (connection, timeout, DNS)
    Network(String),
    /// HTTP error response (4xx, 5xx) with the body's message when present
    HttpStatus(u16, String),
    /// 401 from the backend or no session to send
    Unauthorized,
    /// Failed to parse response
    Parse(String),
    /// 2xx response whose body reported `success: false`
    Rejected(String),
    /// Input refused before any request was made
    Invalid(String),
}

impl ApiError {
    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(details) => {
                if details.contains("timed out") {
                    "Request timed out. Please try again.".into()
                } else if details.contains("dns") || details.contains("resolve") {
                    "Network error: Could not reach server.".into()
                } else {
                    format!("Network error: {details}")
                }
            }
            Self::Unauthorized => "Session expired. Please log in again.".into(),
            Self::HttpStatus(_, msg) if !msg.is_empty() => msg.clone(),
            Self::HttpStatus(429, _) => "Rate limited. Please wait a moment.".into(),
            Self::HttpStatus(404, _) => "Not found.".into(),
            Self::HttpStatus(500..=599, _) => "Server error. Please try again later.".into(),
            Self::HttpStatus(code, _) => format!("HTTP error {code}"),
            Self::Parse(_) => {
                "Server returned an invalid response. Please check your connection.".into()
            }
            Self::Rejected(msg) | Self::Invalid(msg) => msg.clone(),
        }
    }

    /// Errors the user can fix by retrying the same action.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Parse(_) | Self::HttpStatus(429 | 500..=599, _)
        )
    }

    /// Builds an error from a non-2xx response body, pulling out the
    /// backend's `message` or `error` field when the body is JSON.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_default();
        Self::HttpStatus(status, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network("request timed out".into())
        } else if err.is_connect() {
            Self::Network("connection failed".into())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16(), String::new())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
