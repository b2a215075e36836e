use std::fmt::Display;
use std::str::FromStr;

use parquet::basic::{BrotliLevel, Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;

use crate::error::{ExportError, ExportResult};
use crate::metadata::Edges;

/// Compression codec applied to every column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParquetCompression {
    /// No compression
    None,
    /// Snappy
    #[default]
    Snappy,
    /// Gzip at its default level
    Gzip,
    /// Brotli at its default level
    Brotli,
    /// LZ4, written with the `LZ4_RAW` codec
    Lz4,
    /// Zstandard at its default level
    Zstd,
}

impl ParquetCompression {
    /// The Parquet codec for this option.
    pub fn to_codec(self) -> Compression {
        match self {
            Self::None => Compression::UNCOMPRESSED,
            Self::Snappy => Compression::SNAPPY,
            Self::Gzip => Compression::GZIP(GzipLevel::default()),
            Self::Brotli => Compression::BROTLI(BrotliLevel::default()),
            Self::Lz4 => Compression::LZ4_RAW,
            Self::Zstd => Compression::ZSTD(ZstdLevel::default()),
        }
    }
}

impl FromStr for ParquetCompression {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" | "UNCOMPRESSED" => Ok(Self::None),
            "SNAPPY" => Ok(Self::Snappy),
            "GZIP" => Ok(Self::Gzip),
            "BROTLI" => Ok(Self::Brotli),
            "LZ4" => Ok(Self::Lz4),
            "ZSTD" => Ok(Self::Zstd),
            _ => Err(ExportError::InvalidOption(format!(
                "unknown compression {s}, expected one of NONE, SNAPPY, GZIP, BROTLI, LZ4, ZSTD"
            ))),
        }
    }
}

impl Display for ParquetCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::Snappy => "SNAPPY",
            Self::Gzip => "GZIP",
            Self::Brotli => "BROTLI",
            Self::Lz4 => "LZ4",
            Self::Zstd => "ZSTD",
        };
        write!(f, "{name}")
    }
}

/// Options for writing GeoParquet
#[derive(Debug, Clone, Default)]
pub struct GeoParquetWriterOptions {
    /// Compression codec for every column.
    pub compression: ParquetCompression,

    /// Edge interpretation recorded for every geometry column.
    pub edges: Edges,

    /// The geometry column to record as primary.
    ///
    /// Takes precedence over the designation carried by the dataset. When neither is set, a
    /// column named `geometry` or `geography` is chosen, else the first geometry column.
    pub primary_column: Option<String>,

    /// Maximum number of rows per row group. The Parquet default is used when `None`.
    pub max_row_group_size: Option<usize>,
}

impl GeoParquetWriterOptions {
    /// The [`WriterProperties`] passed to the Parquet writer.
    pub fn writer_properties(&self) -> WriterProperties {
        let mut props = WriterProperties::builder().set_compression(self.compression.to_codec());
        if let Some(max_row_group_size) = self.max_row_group_size {
            props = props.set_max_row_group_size(max_row_group_size);
        }
        props.build()
    }
}
