//! Defines [`ExportError`], representing all errors returned by this crate.

use std::error::Error;
use std::path::PathBuf;

use arrow_schema::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExportError {
    /// [ArrowError]
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// [ParquetError]
    #[error(transparent)]
    Parquet(#[from] ParquetError),

    /// Wraps an external error, e.g. from a query backend.
    #[error("External error: {0}")]
    External(#[from] Box<dyn Error + Send + Sync>),

    /// GeoParquet metadata error
    #[error("GeoParquet error: {0}")]
    GeoParquet(String),

    /// HTTP error while fetching a remote document
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Invalid input dataset
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid writer or export option
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The output path exists and overwriting was not requested.
    #[error("{} exists and overwrite is set to false", .0.display())]
    OutputExists(PathBuf),

    /// The query backend failed to produce a dataset.
    #[error("Query error: {0}")]
    Query(String),

    /// The GeoParquet specification version could not be determined.
    #[error("GeoParquet version lookup failed: {0}")]
    Version(String),

    /// WKB Error
    #[error("WKB error: {0}")]
    Wkb(String),
}

/// Crate-specific result type.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

