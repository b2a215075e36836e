//! Structs corresponding to the metadata defined by the [GeoParquet specification].
//!
//! [GeoParquet specification]: https://geoparquet.org/releases/v1.1.0/

use std::fmt::Display;
use std::str::FromStr;

use geo_types::Geometry;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use serde_with::SerializeDisplay;

use crate::error::{ExportError, ExportResult};

/// The key under which the GeoParquet metadata is stored in the file and schema metadata.
pub const GEO_METADATA_KEY: &str = "geo";

/// The encoding of the geometry in the Parquet file.
///
/// Geometries are always written as WKB.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum GeoParquetColumnEncoding {
    /// Serialized Well-known Binary encoding
    #[default]
    WKB,
}

impl Display for GeoParquetColumnEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WKB => write!(f, "WKB"),
        }
    }
}

/// Geometry types that are valid to write to GeoParquet.
///
/// Serialized as its bare name through [`SerializeDisplay`], e.g. `"Point"`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, SerializeDisplay)]
pub enum GeoParquetGeometryType {
    /// Point geometry type
    Point,
    /// LineString geometry type
    LineString,
    /// Polygon geometry type
    Polygon,
    /// MultiPoint geometry type
    MultiPoint,
    /// MultiLineString geometry type
    MultiLineString,
    /// MultiPolygon geometry type
    MultiPolygon,
    /// GeometryCollection geometry type
    GeometryCollection,
}

impl GeoParquetGeometryType {
    /// The GeoParquet geometry type of a geometry value.
    ///
    /// Types without a GeoParquet counterpart are reported as the type they are written as in
    /// WKB: a `Line` is a `LineString`; a `Rect` and a `Triangle` are `Polygon`s.
    pub fn of(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(_) => Self::Point,
            Geometry::Line(_) | Geometry::LineString(_) => Self::LineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => Self::Polygon,
            Geometry::MultiPoint(_) => Self::MultiPoint,
            Geometry::MultiLineString(_) => Self::MultiLineString,
            Geometry::MultiPolygon(_) => Self::MultiPolygon,
            Geometry::GeometryCollection(_) => Self::GeometryCollection,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLineString => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }
}

impl FromStr for GeoParquetGeometryType {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        let out = match s {
            "Point" => Self::Point,
            "LineString" => Self::LineString,
            "Polygon" => Self::Polygon,
            "MultiPoint" => Self::MultiPoint,
            "MultiLineString" => Self::MultiLineString,
            "MultiPolygon" => Self::MultiPolygon,
            "GeometryCollection" => Self::GeometryCollection,
            other => {
                return Err(ExportError::GeoParquet(format!(
                    "Unknown value for geometry_type: {other}"
                )));
            }
        };
        Ok(out)
    }
}

impl Display for GeoParquetGeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The edge interpretation between explicitly defined vertices.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum Edges {
    /// Edges are straight lines in the coordinate space.
    #[serde(rename = "planar")]
    Planar,

    /// Edges follow the shortest path between vertices on a sphere. This is the edge
    /// interpretation of
    /// [BigQuery Geography](https://cloud.google.com/bigquery/docs/geospatial-data#coordinate_systems_and_edges).
    #[default]
    #[serde(rename = "spherical")]
    Spherical,
}

/// Top-level GeoParquet file metadata
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GeoParquetMetadata {
    /// The version identifier for the GeoParquet specification.
    pub version: String,

    /// The name of the "primary" geometry column. In cases where a GeoParquet file contains
    /// multiple geometry columns, the primary geometry may be used by default in geospatial
    /// operations.
    ///
    /// `None` only when the table has no geometry columns.
    pub primary_column: Option<String>,

    /// Metadata about geometry columns. Each key is the name of a geometry column in the table.
    pub columns: IndexMap<String, GeoParquetColumnMetadata>,
}

impl GeoParquetMetadata {
    /// Encode to compact UTF-8 JSON, the value stored under the `"geo"` key.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// GeoParquet column metadata
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GeoParquetColumnMetadata {
    /// Name of the geometry encoding format. Always `"WKB"`.
    pub encoding: GeoParquetColumnEncoding,

    /// The distinct geometry types present in the column, in order of first appearance.
    pub geometry_types: IndexSet<GeoParquetGeometryType>,

    /// [PROJJSON](https://proj.org/specifications/projjson.html) object representing the
    /// Coordinate Reference System (CRS) of the geometry, or `null` if the column is untagged.
    pub crs: Option<Value>,

    /// Name of the coordinate system for the edges. Must be one of `"planar"` or `"spherical"`.
    pub edges: Edges,

    /// Bounding Box of the geometries in the file, formatted according to RFC 7946, section 5.
    ///
    /// Omitted when the column holds no coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}
