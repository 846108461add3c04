//! Error type shared by the remote client and the playback controller.
use thiserror::Error;

/// Everything that can go wrong between a click and the remote player.
#[derive(Debug, Error)]
pub enum PanelError {
    /// The request never produced a response (DNS, refused connection, CORS...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body of `/times` could not be parsed.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The progress bar reported a width a percentage cannot be derived from.
    #[error("progress bar has unusable width {0}")]
    InvalidGeometry(f64),

    /// A button or media-session handler named an action the server does not know.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// Configuration override was not valid JSON for [`crate::config::PanelConfig`].
    #[error("invalid panel configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PanelError>;
