use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pyver operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PyverError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed pyproject.toml.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check the pyproject.toml for syntax errors"))]
    Manifest { message: String },

    /// Invalid or malformed YAML configuration file.
    #[error("Config error: {message}")]
    Config { message: String },

    /// A requirement string in a dependency list could not be parsed.
    #[error("Invalid requirement: {message}")]
    #[diagnostic(help("Dependency entries must be PEP 508 requirement strings"))]
    Requirement { message: String },

    /// Listing tracked files through git failed.
    #[error("Git error: {message}")]
    #[diagnostic(help("pyver expects to run inside a git work tree"))]
    Git { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type PyverResult<T> = miette::Result<T>;
