use thiserror::Error;

/// Why a chat request did not produce a reply.
///
/// The session collapses every variant into the same canned transcript turn;
/// the distinction only shows up in operator logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: status {status}")]
    Status { status: u16 },

    #[error("Parse error: {0}")]
    Decode(String),
}

impl ChatError {
    /// True when the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ChatError::Network(_))
    }
}
