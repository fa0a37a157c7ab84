//! error handling stuff
use {std::path::PathBuf, thiserror::Error};

#[derive(Debug, Error)]
/// An error
pub enum R2wError {
    /// bad configuration (missing directory, invalid aspect ratio, etc.)
    #[error("config error: {0}")]
    Config(String),

    /// the listing request failed or returned an error status
    #[error("couldn't get '{url}': {source}")]
    Fetch {
        /// the listing url
        url: String,
        /// the underlying http error
        #[source]
        source: reqwest::Error,
    },

    /// the listing body wasn't the expected json
    #[error("couldn't parse json: {0}")]
    Decode(#[from] serde_json::Error),

    /// the destination file is already on disk
    #[error("file '{}' already exists", .path.display())]
    FileExists {
        /// the existing file
        path: PathBuf,
    },

    /// an image request failed or returned an error status
    #[error("couldn't download '{url}': {source}")]
    Download {
        /// the image url
        url: String,
        /// the underlying http error
        #[source]
        source: reqwest::Error,
    },

    /// a post url that can't be turned into a file name
    #[error("invalid post url: {0}")]
    InvalidUrl(String),

    /// an IO error
    #[error("i/o error: {0}")]
    IO(#[from] std::io::Error),
}

impl R2wError {
    /// whether this error only means "nothing to do" for a post
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::FileExists { .. })
    }
}

/// A result using [`R2wError`] as the `Err` variant
pub type Result<T, E = R2wError> = std::result::Result<T, E>;
