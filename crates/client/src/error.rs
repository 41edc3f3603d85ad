use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures crossing the HTTP boundary.
///
/// Status codes are folded into variants so callers match on meaning rather
/// than numbers; the carried string is the server-provided `error`/`message`
/// body when one was present.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("permission denied")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// `true` for the statuses that tear down the session.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }

    /// Short text suitable for a user-facing notification body.
    ///
    /// Prefers the server-provided message; transport failures fall back to a
    /// generic string because `reqwest` errors leak connection internals.
    pub fn user_message(&self) -> String {
        match self {
            Self::BaseUrl(_) => "The server address is not valid.".to_string(),
            Self::Unauthorized | Self::Forbidden => {
                "Please log in again to continue.".to_string()
            }
            Self::NotFound => "The requested item no longer exists.".to_string(),
            Self::Conflict(message)
            | Self::Validation(message)
            | Self::Server(message) => message.clone(),
            Self::Transport(_) => "Could not reach the server. Try again later.".to_string(),
        }
    }
}
