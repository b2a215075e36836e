use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};
use crate::metadata::{
    Edges, GeoParquetColumnEncoding, GeoParquetColumnMetadata, GeoParquetGeometryType,
    GeoParquetMetadata,
};
use crate::table::{GeoDataFrame, GeometryColumn};
use crate::total_bounds::{total_bounds, BoundingRect};
use crate::writer::options::GeoParquetWriterOptions;

const INFERRED_PRIMARY_COLUMN_NAMES: [&str; 2] = ["geometry", "geography"];

/// Information for one geometry column being written to Parquet
struct ColumnInfo {
    /// The serialized encoding for this geometry column.
    encoding: GeoParquetColumnEncoding,

    /// The distinct geometry types of this column, in order of first appearance.
    geometry_types: IndexSet<GeoParquetGeometryType>,

    /// The bounding box of this column.
    bbox: BoundingRect,

    /// The PROJJSON CRS for this geometry column.
    crs: Option<Value>,

    edges: Edges,
}

impl ColumnInfo {
    fn new(column: &GeometryColumn, edges: Edges) -> Self {
        Self {
            encoding: GeoParquetColumnEncoding::WKB,
            geometry_types: column
                .iter_valid()
                .map(GeoParquetGeometryType::of)
                .collect(),
            bbox: total_bounds(column.iter_valid()),
            crs: column.crs().map(|crs| crs.crs_value().clone()),
            edges,
        }
    }

    fn finish(self, name: &str) -> GeoParquetColumnMetadata {
        let bbox = self.bbox.to_bbox();
        if bbox.is_none() {
            warn!(column = name, "geometry column has no coordinates; omitting bbox");
        }
        debug!(
            column = name,
            geometry_types = ?self.geometry_types,
            bbox = ?bbox,
            has_crs = self.crs.is_some(),
            "computed GeoParquet column metadata"
        );
        GeoParquetColumnMetadata {
            encoding: self.encoding,
            geometry_types: self.geometry_types,
            crs: self.crs,
            edges: self.edges,
            bbox,
        }
    }
}

/// Accumulates the spatial metadata of every geometry column of a dataset.
///
/// The version is supplied at [`finish`](Self::finish) time so that computing column metadata
/// never touches the network.
#[derive(Debug)]
pub struct GeoParquetMetadataBuilder {
    primary_column: Option<String>,
    columns: IndexMap<String, GeoParquetColumnMetadata>,
}

impl GeoParquetMetadataBuilder {
    /// Compute the metadata of `geometry_columns`, which must be the geometry columns of `df`
    /// as returned by [`extract_geometry_columns`](crate::extract::extract_geometry_columns).
    pub fn try_new(
        df: &GeoDataFrame,
        geometry_columns: &IndexMap<&str, &GeometryColumn>,
        options: &GeoParquetWriterOptions,
    ) -> ExportResult<Self> {
        let primary_column = resolve_primary_column(df, geometry_columns, options)?;

        let columns = geometry_columns
            .iter()
            .map(|(name, column)| {
                let info = ColumnInfo::new(column, options.edges);
                (name.to_string(), info.finish(name))
            })
            .collect();

        Ok(Self {
            primary_column,
            columns,
        })
    }

    /// The primary geometry column, `None` when there are no geometry columns.
    pub fn primary_column(&self) -> Option<&str> {
        self.primary_column.as_deref()
    }

    /// Consume this builder, converting into [GeoParquetMetadata].
    pub fn finish(self, version: String) -> GeoParquetMetadata {
        GeoParquetMetadata {
            version,
            primary_column: self.primary_column,
            columns: self.columns,
        }
    }
}

fn resolve_primary_column(
    df: &GeoDataFrame,
    geometry_columns: &IndexMap<&str, &GeometryColumn>,
    options: &GeoParquetWriterOptions,
) -> ExportResult<Option<String>> {
    let designated = options.primary_column.as_deref().or(df.primary_column());

    if let Some(primary_column) = designated {
        if !geometry_columns.contains_key(primary_column) {
            return Err(ExportError::GeoParquet(format!(
                "Designated primary column: {primary_column} does not exist as a geometry column",
            )));
        }
        return Ok(Some(primary_column.to_string()));
    }

    let inferred = geometry_columns
        .keys()
        .find(|name| INFERRED_PRIMARY_COLUMN_NAMES.contains(*name))
        .or_else(|| geometry_columns.keys().next())
        .map(|name| name.to_string());
    if let Some(name) = inferred.as_deref() {
        debug!(column = name, "inferred primary geometry column");
    }
    Ok(inferred)
}
