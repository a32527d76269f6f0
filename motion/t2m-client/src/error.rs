use thiserror::Error;

/// Failure category of a rejected generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself was malformed or refused
    Client,
    /// The server no longer accepts this client version
    UpgradeRequired,
    /// Missing or invalid API key
    Auth,
    /// Too many requests
    RateLimited,
    Server,
    /// Planned maintenance window
    Maintenance,
    Unknown,
}

impl ErrorKind {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 404 | 405 | 409 | 415 | 422 => ErrorKind::Client,
            426 => ErrorKind::UpgradeRequired,
            401 | 403 => ErrorKind::Auth,
            429 => ErrorKind::RateLimited,
            500 | 502 | 504 => ErrorKind::Server,
            503 => ErrorKind::Maintenance,
            _ => ErrorKind::Unknown,
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Client => {
                "Failed to generate request due to client error. Please contact support@text2motion.ai for help."
            }
            ErrorKind::UpgradeRequired => {
                "Client update required. Please install the latest release and try again."
            }
            ErrorKind::Auth => {
                "Invalid API key. Please reconfigure your API key with `config set-api-key`."
            }
            ErrorKind::RateLimited => {
                "Request throttled. Please wait for some time and try again later."
            }
            ErrorKind::Server => "Server has encountered an error. Please try again later.",
            ErrorKind::Maintenance => {
                "Text2Motion server maintenance in progress. Please try again later."
            }
            ErrorKind::Unknown => "Text2Motion request failed due to unknown issue.",
        }
    }
}

/// Error types for talking to the generation service
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with a non-success status
    #[error("{} (HTTP {})", .kind.user_message(), .status)]
    Api {
        kind: ErrorKind,
        status: u16,
        body: String,
    },

    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not the expected JSON
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Cannot make server request without online access")]
    Offline,
}

impl ClientError {
    /// Classification of an [`ClientError::Api`] error
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
