use thiserror::Error;

/// Main error type for Ontopath
#[derive(Error, Debug)]
pub enum OntopathError {
    /// SPARQL endpoint errors (transport failure or rejected query)
    #[error("SPARQL error: {0}")]
    Sparql(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding API errors
    #[error("Embedding API error: {0}")]
    Embedding(String),
}

/// Convenient Result type using OntopathError
pub type Result<T> = std::result::Result<T, OntopathError>;
