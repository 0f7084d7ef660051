use thiserror::Error;

/// Failure of a sync API call as seen by the client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The server could not be reached or the exchange broke off
    #[error("Transport error: {0}")]
    Transport(String),

    /// 4xx: the server understood and refused the request
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 5xx or any other non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Local update targeting an id the session does not hold
    #[error("No annotation with id {0} in the working set")]
    UnknownAnnotation(i64),
}

impl ClientError {
    /// The backend answered and refused; it is reachable
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
