//! `bq2geoparquet`: run a BigQuery query and write the result as GeoParquet.
//!
//! Geometry (`GEOGRAPHY`) columns are written as WKB with the GeoParquet `"geo"` metadata. The
//! output is either a single file or a folder of `__partition__=<n>/part-0.parquet` files.

mod bigquery;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use geoparquet_export::export::preflight_output;
use geoparquet_export::version::GEOPARQUET_SCHEMA_URL;
use geoparquet_export::writer::{GeoParquetWriterOptions, ParquetCompression};
use geoparquet_export::{
    export, ExportMode, ExportOptions, SchemaVersionProvider, StaticVersionProvider,
    VersionProvider,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::bigquery::{BigQueryClient, BIGQUERY_API_URL};

#[derive(Parser)]
#[command(
    name = "bq2geoparquet",
    version,
    about = "Export BigQuery query results to GeoParquet"
)]
/// Command-line arguments of `bq2geoparquet`.
struct Cli {
    /// Standard SQL query to run.
    #[arg(short = 'q', long, value_name = "SQL")]
    input_query: String,

    /// Output file (FILE mode) or folder (FOLDER mode).
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// FILE writes one Parquet file; FOLDER writes partition files of at most
    /// --file-max-records rows.
    #[arg(short, long, value_name = "FILE|FOLDER", default_value = "FOLDER")]
    mode: ExportMode,

    /// NONE, SNAPPY, GZIP, BROTLI, LZ4 or ZSTD.
    #[arg(long, value_name = "CODEC", default_value = "SNAPPY")]
    compression: ParquetCompression,

    /// Maximum rows per partition file in FOLDER mode.
    #[arg(long, value_name = "N", default_value_t = 5000)]
    file_max_records: usize,

    /// Remove the output path first if it exists.
    #[arg(long)]
    overwrite: bool,

    /// Project that runs and is billed for the query.
    #[arg(long, env = "BIGQUERY_PROJECT")]
    project: Option<String>,

    /// OAuth 2.0 access token, e.g. from `gcloud auth print-access-token`.
    #[arg(long, env = "BIGQUERY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// BigQuery REST endpoint.
    #[arg(long, env = "BIGQUERY_API_URL", default_value = BIGQUERY_API_URL)]
    api_url: String,

    /// Geometry column to record as primary. Defaults to the first GEOGRAPHY column.
    #[arg(long, value_name = "NAME")]
    geometry_column: Option<String>,

    /// GeoParquet version to write instead of reading it from --schema-url.
    #[arg(long, value_name = "VERSION")]
    geoparquet_version: Option<String>,

    /// GeoParquet JSON schema that the version is read from.
    #[arg(long, value_name = "URL", default_value = GEOPARQUET_SCHEMA_URL)]
    schema_url: String,

    /// Enable verbose (INFO level) logging output.
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Refuse an existing output before anything touches the network.
    preflight_output(&cli.output, cli.overwrite)?;

    let project = cli
        .project
        .ok_or_else(|| anyhow!("no BigQuery project: pass --project or set BIGQUERY_PROJECT"))?;
    let access_token = cli.access_token.ok_or_else(|| {
        anyhow!("no access token: pass --access-token or set BIGQUERY_ACCESS_TOKEN")
    })?;
    let client = BigQueryClient::try_new(project, access_token)
        .context("failed to create BigQuery client")?
        .with_base_url(cli.api_url);

    let version_provider: Box<dyn VersionProvider> = match cli.geoparquet_version {
        Some(version) => Box::new(StaticVersionProvider::new(version)),
        None => Box::new(SchemaVersionProvider::with_url(cli.schema_url)),
    };

    let options = ExportOptions {
        output: cli.output,
        mode: cli.mode,
        file_max_records: cli.file_max_records,
        overwrite: cli.overwrite,
        writer: GeoParquetWriterOptions {
            compression: cli.compression,
            primary_column: cli.geometry_column,
            ..Default::default()
        },
    };
    info!(output = %options.output.display(), mode = %options.mode, "exporting");

    let summary = export(&client, version_provider.as_ref(), &cli.input_query, &options)
        .with_context(|| format!("failed to export to {}", options.output.display()))?;

    println!(
        "Wrote {} rows to {} file(s) under {}",
        summary.num_rows,
        summary.files.len(),
        options.output.display()
    );
    Ok(())
}
