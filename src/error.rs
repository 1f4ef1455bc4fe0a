//! Error types shared across the carousel pipeline

/// Errors raised while talking to the video catalog
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error")]
    Http(#[source] reqwest::Error),

    #[error("Invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Catalog API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected catalog response: {0}")]
    Decode(String),

    #[error("Catalog API key not configured")]
    MissingApiKey,
}

// Request URLs carry the API key as a query parameter
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Http(err.without_url())
    }
}

/// Errors raised while reading or writing snapshot and page files
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist {}: {source}", .path.display())]
    Persist {
        path: std::path::PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Errors raised while patching a page document
#[derive(thiserror::Error, Debug)]
pub enum PatchError {
    #[error("Region '{region}' not found: {reason}")]
    RegionNotFound { region: String, reason: String },

    #[error("Invalid region anchor for '{region}': {source}")]
    Anchor {
        region: String,
        #[source]
        source: regex::Error,
    },
}
