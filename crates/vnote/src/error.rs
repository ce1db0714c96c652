use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by host collaborators.
///
/// The assembler never surfaces these; a failed read is treated as an
/// unresolved source.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Host error: {0}")]
    Host(String),
}

/// Reasons a pattern file is rejected.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Pattern is not valid YAML: {0}")]
    Syntax(#[source] serde_yaml::Error),

    #[error("Pattern root must be a mapping")]
    NotAMapping,

    #[error("Pattern must have a `variants` sequence")]
    MissingVariants,

    #[error("Pattern does not match the expected shape: {0}")]
    Shape(#[source] serde_yaml::Error),

    #[error("Duplicate variant id: {0}")]
    DuplicateVariant(String),

    #[error("Could not read pattern file: {0}")]
    Read(#[from] Error),
}
