//! Serialize [`geo_types`] geometries to ISO Well-Known Binary.
//!
//! All geometries are written little-endian and two-dimensional. `Line` is written as a
//! two-point LineString, `Rect` and `Triangle` as Polygons.

use arrow_array::builder::BinaryBuilder;
use arrow_array::BinaryArray;
use geo_types::Geometry;
use wkb::writer::{geometry_wkb_size, write_geometry, WriteOptions};
use wkb::Endianness;

use crate::error::{ExportError, ExportResult};
use crate::table::GeometryColumn;

const WRITE_OPTIONS: WriteOptions = WriteOptions {
    endianness: Endianness::LittleEndian,
};

/// Serialize a single geometry to little-endian ISO WKB.
pub fn to_wkb(geom: &Geometry) -> ExportResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(geometry_wkb_size(geom));
    write_geometry(&mut buf, geom, &WRITE_OPTIONS)
        .map_err(|err| ExportError::Wkb(err.to_string()))?;
    Ok(buf)
}

/// Serialize every value of a geometry column to WKB, preserving row order.
///
/// Null geometries become null binary values.
pub fn geometry_column_to_wkb(column: &GeometryColumn) -> ExportResult<BinaryArray> {
    let data_capacity = column.iter_valid().map(geometry_wkb_size).sum();
    let mut builder = BinaryBuilder::with_capacity(column.len(), data_capacity);

    for geom in column.geometries() {
        match geom {
            Some(geom) => {
                write_geometry(&mut builder, geom, &WRITE_OPTIONS)
                    .map_err(|err| ExportError::Wkb(err.to_string()))?;
                builder.append_value("");
            }
            None => builder.append_null(),
        }
    }

    Ok(builder.finish())
}
