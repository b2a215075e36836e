use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_schema::{DataType, Field, Schema};

use crate::error::ExportResult;
use crate::metadata::{GeoParquetMetadata, GEO_METADATA_KEY};
use crate::table::{ColumnData, GeoDataFrame};
use crate::wkb::geometry_column_to_wkb;

/// Assemble the output table: geometry columns become nullable WKB `Binary` columns and the
/// schema metadata gains a `"geo"` entry holding `metadata` as compact JSON.
///
/// Scalar columns, column order, row count and row order are unchanged. Existing schema
/// metadata is kept, except that a pre-existing `"geo"` entry is replaced.
pub fn encode_geodataframe(
    df: &GeoDataFrame,
    metadata: &GeoParquetMetadata,
) -> ExportResult<RecordBatch> {
    let mut fields = Vec::with_capacity(df.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(df.num_columns());

    for (name, column) in df.columns() {
        match column {
            ColumnData::Scalar(array) => {
                fields.push(Field::new(name, array.data_type().clone(), true));
                columns.push(array.clone());
            }
            ColumnData::Geometry(geometry_column) => {
                // For now we always create nullable geometry fields
                fields.push(Field::new(name, DataType::Binary, true));
                columns.push(Arc::new(geometry_column_to_wkb(geometry_column)?));
            }
        }
    }

    let mut schema_metadata = df.metadata().clone();
    schema_metadata.insert(GEO_METADATA_KEY.to_string(), metadata.to_json()?);
    let schema = Arc::new(Schema::new_with_metadata(fields, schema_metadata));

    let options = RecordBatchOptions::new().with_row_count(Some(df.num_rows()));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
