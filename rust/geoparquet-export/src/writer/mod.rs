//! Encode a [`GeoDataFrame`](crate::GeoDataFrame) and write it to GeoParquet.

mod encode;
mod metadata;
mod options;
mod partition;
mod sync;

pub use encode::encode_geodataframe;
pub use metadata::GeoParquetMetadataBuilder;
pub use options::{GeoParquetWriterOptions, ParquetCompression};
pub use partition::{
    partition_dir_name, partition_index, partition_ranges, PARTITION_COLUMN_NAME,
    PARTITION_FILE_NAME,
};
pub use sync::{write_geoparquet, write_geoparquet_dataset, write_geoparquet_file};
