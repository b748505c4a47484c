//! Error types for grammophon-import

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds across the loader, the Notion client, and the sequencer
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading the archive file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive file is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Archive parsed but failed shape validation
    #[error("Invalid archive: {0}")]
    InvalidDocument(String),

    /// Transport-level failure talking to Notion
    #[error("Network error: {0}")]
    Network(String),

    /// Integration token rejected (401)
    #[error("Invalid integration token")]
    Unauthorized,

    /// Notion rejected the request
    #[error("Notion API error {0}: {1}")]
    Api(u16, String),

    /// Notion response body did not have the expected shape
    #[error("Response parse error: {0}")]
    Parse(String),

    /// Playlist lookup by name returned no records
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Playlist lookup by name returned more than one record
    #[error("Playlist name {name:?} matches {count} records")]
    PlaylistAmbiguous { name: String, count: usize },
}

impl Error {
    /// True for errors raised by the Notion API itself, as opposed to
    /// local I/O, validation, or lookup failures.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::Api(..))
    }
}
