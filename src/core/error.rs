//! Error types for SpliceAdjacency
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SpliceAdjacency operations
#[derive(Debug, Error)]
pub enum SpliceAdjacencyError {
    /// Junction table or run configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed junction/exon identifier
    #[error("Parse error: {0}")]
    Parse(#[from] RegionParseError),

    /// Annotation store errors that were not handled locally
    #[error("Annotation store error: {0}")]
    Store(#[from] StoreError),

    /// Input/output file format errors
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised before any detection or resolution work starts
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required junction table column is absent from the header
    #[error("The required column '{column}' is not in the splice junction table")]
    MissingColumn { column: String },

    /// The junction table has no header line
    #[error("The splice junction table is empty (no header line)")]
    EmptyTable,

    /// Junction ids must be unique, they index the table
    #[error("Duplicate junction id '{0}' in the splice junction table")]
    DuplicateJunction(String),
}

/// A junction or exon identifier that does not encode a region
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot parse region from identifier '{identifier}': {message}")]
pub struct RegionParseError {
    pub identifier: String,
    pub message: String,
}

impl RegionParseError {
    pub fn new(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// Errors reported by an annotation store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No feature with this id
    #[error("Feature not found: {0}")]
    NotFound(String),

    /// Uniqueness constraint on feature ids violated
    #[error("A feature with id '{0}' already exists")]
    Integrity(String),
}

/// Errors while reading the junction table or annotation file
#[derive(Debug, Error)]
pub enum FormatError {
    /// Invalid junction table row
    #[error("Invalid junction table row at line {line}: {message}")]
    InvalidJunctionRow { line: usize, message: String },

    /// Invalid GTF/GFF line
    #[error("Invalid GTF/GFF format at line {line}: {message}")]
    InvalidGff { line: usize, message: String },

    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SpliceAdjacency operations
pub type Result<T> = std::result::Result<T, SpliceAdjacencyError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for format adapters
pub type FormatResult<T> = std::result::Result<T, FormatError>;
