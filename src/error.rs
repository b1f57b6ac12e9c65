#[derive(Debug, thiserror::Error)]
pub enum DealError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid page request: page={page}, page_size={page_size} (both must be >= 1)")]
    InvalidPageRequest { page: i64, page_size: i64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, DealError>;
