use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("similarity matrix is {matrix}x{matrix} but the catalog has {catalog} items")]
    DimensionMismatch { catalog: usize, matrix: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
