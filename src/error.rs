use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayerscopeError>;

#[derive(Debug, Error)]
pub enum LayerscopeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("image reports zero total size")]
    ZeroImageSize,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error: {0}")]
    Generic(String),
}

impl From<String> for LayerscopeError {
    fn from(error: String) -> Self {
        LayerscopeError::Generic(error)
    }
}

impl From<&str> for LayerscopeError {
    fn from(error: &str) -> Self {
        LayerscopeError::Generic(error.to_string())
    }
}
