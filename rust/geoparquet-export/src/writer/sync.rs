use std::fs::{self, File};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use arrow_array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use tracing::{debug, info};

use crate::error::{ExportError, ExportResult};
use crate::metadata::GEO_METADATA_KEY;
use crate::writer::options::GeoParquetWriterOptions;
use crate::writer::partition::{partition_dir_name, partition_ranges, PARTITION_FILE_NAME};

/// Write an encoded batch as one GeoParquet file to `writer`.
///
/// `batch` must come from [`encode_geodataframe`](crate::writer::encode_geodataframe); its
/// `"geo"` schema metadata is also written to the file key/value metadata.
pub fn write_geoparquet<W: Write + Send>(
    batch: &RecordBatch,
    writer: W,
    options: &GeoParquetWriterOptions,
) -> ExportResult<()> {
    let schema = batch.schema();
    let geo_meta = schema.metadata().get(GEO_METADATA_KEY).cloned().ok_or_else(|| {
        ExportError::GeoParquet("batch schema has no \"geo\" metadata".to_string())
    })?;

    let mut writer = ArrowWriter::try_new(writer, schema, Some(options.writer_properties()))?;
    writer.write(batch)?;
    writer.append_key_value_metadata(KeyValue::new(GEO_METADATA_KEY.to_string(), geo_meta));
    writer.close()?;

    Ok(())
}

/// Write an encoded batch to a single GeoParquet file at `path`.
///
/// Missing parent directories are created.
pub fn write_geoparquet_file(
    batch: &RecordBatch,
    path: &Path,
    options: &GeoParquetWriterOptions,
) -> ExportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    write_geoparquet(batch, file, options)?;
    info!(path = %path.display(), rows = batch.num_rows(), "wrote GeoParquet file");
    Ok(())
}

/// Write an encoded batch as a partitioned GeoParquet dataset under `folder`.
///
/// Row `i` is written to `<folder>/__partition__=<i / file_max_records>/part-0.parquet`. Every
/// file carries the same `"geo"` metadata. Returns the written file paths in partition order.
pub fn write_geoparquet_dataset(
    batch: &RecordBatch,
    folder: &Path,
    file_max_records: NonZeroUsize,
    options: &GeoParquetWriterOptions,
) -> ExportResult<Vec<PathBuf>> {
    let ranges = partition_ranges(batch.num_rows(), file_max_records);
    debug!(
        rows = batch.num_rows(),
        partitions = ranges.len(),
        file_max_records = file_max_records.get(),
        "partitioning dataset"
    );

    let mut paths = Vec::with_capacity(ranges.len());
    for (index, range) in ranges.into_iter().enumerate() {
        let partition_dir = folder.join(partition_dir_name(index));
        fs::create_dir_all(&partition_dir)?;

        let path = partition_dir.join(PARTITION_FILE_NAME);
        let partition = batch.slice(range.start, range.len());
        write_geoparquet(&partition, File::create(&path)?, options)?;
        debug!(path = %path.display(), rows = partition.num_rows(), "wrote partition");
        paths.push(path);
    }

    info!(
        folder = %folder.display(),
        rows = batch.num_rows(),
        files = paths.len(),
        "wrote GeoParquet dataset"
    );
    Ok(paths)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use arrow_array::cast::AsArray;
    use arrow_array::types::Int64Type;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use parquet::basic::Compression;
    use parquet::file::metadata::ParquetMetaData;

    use super::*;
    use crate::metadata::GeoParquetMetadata;
    use crate::test::{geodataframe, point_geodataframe};
    use crate::writer::encode::encode_geodataframe;
    use crate::writer::options::ParquetCompression;
    use crate::GeoDataFrame;

    fn encode(df: &GeoDataFrame) -> RecordBatch {
        let metadata = GeoParquetMetadata {
            version: "1.1.0".to_string(),
            primary_column: Some("geometry".to_string()),
            columns: Default::default(),
        };
        encode_geodataframe(df, &metadata).unwrap()
    }

    fn geo_kv(metadata: &ParquetMetaData) -> Option<String> {
        metadata
            .file_metadata()
            .key_value_metadata()?
            .iter()
            .find(|kv| kv.key == GEO_METADATA_KEY)
            .and_then(|kv| kv.value.clone())
    }

    /// The `id` column of every row in the file, and the file metadata.
    fn read_ids(path: &Path) -> (Vec<i64>, Arc<ParquetMetaData>) {
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap()).unwrap();
        let metadata = builder.metadata().clone();
        let mut ids = Vec::new();
        for batch in builder.build().unwrap() {
            let batch = batch.unwrap();
            let column = batch.column_by_name("id").unwrap();
            ids.extend(column.as_primitive::<Int64Type>().values().iter().copied());
        }
        (ids, metadata)
    }

    #[test]
    fn single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.parquet");
        let batch = encode(&geodataframe());

        write_geoparquet_file(&batch, &path, &Default::default()).unwrap();

        let (ids, metadata) = read_ids(&path);
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(
            geo_kv(&metadata).unwrap(),
            batch.schema().metadata()[GEO_METADATA_KEY]
        );
        assert_eq!(
            metadata.row_group(0).column(0).compression(),
            Compression::SNAPPY
        );
    }

    #[test]
    fn rejects_batch_without_geo_metadata() {
        let batch = encode(&geodataframe());
        let bare = RecordBatch::try_new(
            Arc::new(batch.schema().as_ref().clone().with_metadata(Default::default())),
            batch.columns().to_vec(),
        )
        .unwrap();
        let result = write_geoparquet(&bare, Vec::new(), &Default::default());
        assert!(matches!(result, Err(ExportError::GeoParquet(_))));
    }

    #[test]
    fn dataset_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let batch = encode(&point_geodataframe(12000));
        let options = GeoParquetWriterOptions {
            compression: ParquetCompression::Zstd,
            ..Default::default()
        };

        let paths = write_geoparquet_dataset(
            &batch,
            dir.path(),
            NonZeroUsize::new(5000).unwrap(),
            &options,
        )
        .unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("__partition__=0").join("part-0.parquet"),
                dir.path().join("__partition__=1").join("part-0.parquet"),
                dir.path().join("__partition__=2").join("part-0.parquet"),
            ]
        );

        let mut all_ids = Vec::new();
        let mut sizes = Vec::new();
        for path in paths.iter() {
            let (ids, metadata) = read_ids(path);
            sizes.push(ids.len());
            all_ids.extend(ids);

            assert_eq!(
                geo_kv(&metadata).unwrap(),
                batch.schema().metadata()[GEO_METADATA_KEY]
            );
            assert!(matches!(
                metadata.row_group(0).column(0).compression(),
                Compression::ZSTD(_)
            ));
            let schema = metadata.file_metadata().schema_descr();
            assert!(schema
                .columns()
                .iter()
                .all(|c| c.name() != "__partition__"));
        }
        assert_eq!(sizes, vec![5000, 5000, 2000]);
        assert_eq!(all_ids, (0..12000).collect::<Vec<i64>>());
    }

    #[test]
    fn empty_dataset_writes_one_partition() {
        let dir = tempfile::tempdir().unwrap();
        let batch = encode(&point_geodataframe(0));
        let paths = write_geoparquet_dataset(
            &batch,
            dir.path(),
            NonZeroUsize::new(5000).unwrap(),
            &Default::default(),
        )
        .unwrap();

        assert_eq!(paths.len(), 1);
        let (ids, metadata) = read_ids(&paths[0]);
        assert!(ids.is_empty());
        assert!(geo_kv(&metadata).is_some());
    }
}
