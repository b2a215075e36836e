//! Encode tables with geometry columns as [GeoParquet](https://geoparquet.org).
//!
//! Geometry columns are written as WKB and described by the `"geo"` metadata: per-column
//! geometry types, bounding box and CRS, plus the primary column and the specification
//! version.
//!
//! ```rust
//! # #[cfg(feature = "compression")]
//! # {
//! use geo_types::{point, Geometry};
//! use geoparquet_export::crs::Crs;
//! use geoparquet_export::extract::extract_geometry_columns;
//! use geoparquet_export::writer::{encode_geodataframe, GeoParquetMetadataBuilder};
//! use geoparquet_export::{GeoDataFrame, GeometryColumn};
//!
//! let geometry = GeometryColumn::new(
//!     vec![Some(Geometry::Point(point!(x: 1., y: 2.))), None],
//!     Some(Crs::epsg_4326()),
//! );
//! let df = GeoDataFrame::try_new(vec![("geometry".to_string(), geometry.into())]).unwrap();
//!
//! let geometry_columns = extract_geometry_columns(&df);
//! let metadata = GeoParquetMetadataBuilder::try_new(&df, &geometry_columns, &Default::default())
//!     .unwrap()
//!     .finish("1.1.0".to_string());
//! let batch = encode_geodataframe(&df, &metadata).unwrap();
//! assert_eq!(batch.num_rows(), 2);
//! assert!(batch.schema().metadata().contains_key("geo"));
//! # }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod crs;
pub mod error;
pub mod export;
pub mod extract;
pub mod metadata;
pub mod table;
#[cfg(test)]
mod test;
mod total_bounds;
pub mod version;
pub mod wkb;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use export::{export, ExportMode, ExportOptions, ExportSummary, QuerySource};
pub use table::{ColumnData, ColumnType, GeoDataFrame, GeometryColumn};
pub use version::{SchemaVersionProvider, StaticVersionProvider, VersionProvider};
