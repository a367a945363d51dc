use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog is not valid JSON or TOML: {0}")]
    ParseError(String),

    #[error("Invalid tool catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid retrieval options: {0}")]
    InvalidOptions(String),
}
