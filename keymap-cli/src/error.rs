use std::path::PathBuf;

use thiserror::Error;

/// Errors of the Oryx layout fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Oryx returned errors: {0}")]
    GraphQl(String),

    #[error("layout {0} not found")]
    LayoutNotFound(String),

    #[error("layout {0} has no downloadable source")]
    MissingZipUrl(String),

    #[error("invalid zip url {0}")]
    InvalidZipUrl(String),

    #[error("failed to extract {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("source directory {0} not found in the layout archive")]
    MissingSource(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> FetchError {
        let path = path.into();
        move |source| FetchError::Io { path, source }
    }
}
