use geoparquet_export::ExportError;

#[derive(Debug, thiserror::Error)]
pub enum BigQueryError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("BigQuery API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("BigQuery job failed: {0}")]
    Job(String),

    #[error("BigQuery response has no job reference")]
    MissingJobReference,

    #[error("BigQuery response has no schema")]
    MissingSchema,

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Invalid {field_type} value in column {column}: {value}")]
    InvalidValue {
        column: String,
        field_type: String,
        value: String,
    },

    #[error("Invalid GEOGRAPHY value in column {column}: {message}")]
    Wkt { column: String, message: String },

    #[error(transparent)]
    Frame(#[from] ExportError),
}

pub type Result<T, E = BigQueryError> = std::result::Result<T, E>;

impl From<BigQueryError> for ExportError {
    fn from(e: BigQueryError) -> Self {
        ExportError::External(Box::new(e))
    }
}
