//! Run a query and write its result as GeoParquet, end to end.

use std::fmt::Display;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::{ExportError, ExportResult};
use crate::extract::extract_geometry_columns;
use crate::metadata::GeoParquetMetadata;
use crate::table::GeoDataFrame;
use crate::version::VersionProvider;
use crate::writer::{
    encode_geodataframe, write_geoparquet_dataset, write_geoparquet_file,
    GeoParquetMetadataBuilder, GeoParquetWriterOptions,
};

/// Executes a query and returns its result as a [`GeoDataFrame`].
pub trait QuerySource {
    /// Run `query` to completion.
    fn query(&self, query: &str) -> ExportResult<GeoDataFrame>;
}

/// The shape of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// One Parquet file at the output path.
    File,
    /// A directory of partition files, each holding at most `file_max_records` rows.
    #[default]
    Folder,
}

impl FromStr for ExportMode {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "FILE" => Ok(Self::File),
            "FOLDER" => Ok(Self::Folder),
            _ => Err(ExportError::InvalidOption(format!(
                "unknown mode {s}, expected FILE or FOLDER"
            ))),
        }
    }
}

impl Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "FILE"),
            Self::Folder => write!(f, "FOLDER"),
        }
    }
}

/// Options for [`export`].
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output file (FILE mode) or directory (FOLDER mode).
    pub output: PathBuf,

    /// Output shape.
    pub mode: ExportMode,

    /// Maximum rows per partition file. Only used in FOLDER mode and must be positive.
    pub file_max_records: usize,

    /// Remove an existing output path instead of failing.
    pub overwrite: bool,

    /// Parquet and GeoParquet settings.
    pub writer: GeoParquetWriterOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::new(),
            mode: ExportMode::default(),
            file_max_records: 5000,
            overwrite: false,
            writer: GeoParquetWriterOptions::default(),
        }
    }
}

/// What an [`export`] run produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of rows written across all files.
    pub num_rows: usize,

    /// Every file written, in partition order.
    pub files: Vec<PathBuf>,

    /// The `"geo"` metadata embedded in every file.
    pub metadata: GeoParquetMetadata,
}

/// Fail if `path` exists, unless `overwrite` is set, in which case the file or directory at
/// `path` is removed.
pub fn preflight_output(path: &Path, overwrite: bool) -> ExportResult<()> {
    if !path.try_exists()? {
        return Ok(());
    }
    if !overwrite {
        return Err(ExportError::OutputExists(path.to_path_buf()));
    }

    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    info!(path = %path.display(), "removed existing output");
    Ok(())
}

/// Run `query` against `source` and write the result as GeoParquet.
///
/// The output path is checked before the query runs, so a refused overwrite has no side
/// effects.
pub fn export<Q, V>(
    source: &Q,
    version_provider: &V,
    query: &str,
    options: &ExportOptions,
) -> ExportResult<ExportSummary>
where
    Q: QuerySource + ?Sized,
    V: VersionProvider + ?Sized,
{
    // Partition size is only meaningful in FOLDER mode
    let file_max_records = match options.mode {
        ExportMode::File => None,
        ExportMode::Folder => Some(NonZeroUsize::new(options.file_max_records).ok_or_else(
            || ExportError::InvalidOption("file_max_records must be greater than 0".to_string()),
        )?),
    };
    preflight_output(&options.output, options.overwrite)?;

    let df = source.query(query)?;
    info!(
        rows = df.num_rows(),
        columns = df.num_columns(),
        "query returned"
    );

    let geometry_columns = extract_geometry_columns(&df);
    let builder = GeoParquetMetadataBuilder::try_new(&df, &geometry_columns, &options.writer)?;
    let metadata = builder.finish(version_provider.version()?);
    let batch = encode_geodataframe(&df, &metadata)?;

    let files = match file_max_records {
        None => {
            write_geoparquet_file(&batch, &options.output, &options.writer)?;
            vec![options.output.clone()]
        }
        Some(file_max_records) => write_geoparquet_dataset(
            &batch,
            &options.output,
            file_max_records,
            &options.writer,
        )?,
    };

    Ok(ExportSummary {
        num_rows: batch.num_rows(),
        files,
        metadata,
    })
}
