use thiserror::Error;

/// salesviz error types
#[derive(Error, Debug)]
pub enum SalesvizError {
    /// Source table missing, unreachable or malformed
    #[error("load error: {0}")]
    Load(String),

    /// A field failed type coercion
    #[error("parse error: {0}")]
    Parse(String),

    /// Chart could not be drawn or written
    #[error("render error: {0}")]
    Render(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be serialized
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote fetch error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SalesvizError {
    /// Whether this error means the data itself is unavailable
    /// (the only kind surfaced inside a chart container).
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Http(_))
    }
}

/// Result type alias for salesviz
pub type Result<T> = std::result::Result<T, SalesvizError>;
