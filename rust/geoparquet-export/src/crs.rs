//! Coordinate reference system tags attached to geometry columns.

use serde_json::{json, Value};

use crate::error::{ExportError, ExportResult};

/// The coordinate reference system of a geometry column, as a
/// [PROJJSON](https://proj.org/specifications/projjson.html) object.
///
/// The CRS is carried through to the GeoParquet metadata as-is. No attempt is made to validate
/// or reproject anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs(Value);

impl Crs {
    /// Construct from a PROJJSON object.
    ///
    /// Note that `value` should be a _parsed_ JSON object; a serialized string is rejected.
    pub fn from_projjson(value: Value) -> ExportResult<Self> {
        if !value.is_object() {
            return Err(ExportError::InvalidData(format!(
                "expected a PROJJSON object, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// WGS 84 (EPSG:4326) as PROJJSON.
    ///
    /// This is the CRS of every BigQuery `GEOGRAPHY` value.
    pub fn epsg_4326() -> Self {
        Self(json!({
            "$schema": "https://proj.org/schemas/v0.7/projjson.schema.json",
            "type": "GeographicCRS",
            "name": "WGS 84",
            "datum_ensemble": {
                "name": "World Geodetic System 1984 ensemble",
                "members": [
                    {"name": "World Geodetic System 1984 (Transit)", "id": {"authority": "EPSG", "code": 1166}},
                    {"name": "World Geodetic System 1984 (G730)", "id": {"authority": "EPSG", "code": 1152}},
                    {"name": "World Geodetic System 1984 (G873)", "id": {"authority": "EPSG", "code": 1153}},
                    {"name": "World Geodetic System 1984 (G1150)", "id": {"authority": "EPSG", "code": 1154}},
                    {"name": "World Geodetic System 1984 (G1674)", "id": {"authority": "EPSG", "code": 1155}},
                    {"name": "World Geodetic System 1984 (G1762)", "id": {"authority": "EPSG", "code": 1156}},
                    {"name": "World Geodetic System 1984 (G2139)", "id": {"authority": "EPSG", "code": 1309}}
                ],
                "ellipsoid": {
                    "name": "WGS 84",
                    "semi_major_axis": 6378137,
                    "inverse_flattening": 298.257223563
                },
                "accuracy": "2.0",
                "id": {"authority": "EPSG", "code": 6326}
            },
            "coordinate_system": {
                "subtype": "ellipsoidal",
                "axis": [
                    {"name": "Geodetic latitude", "abbreviation": "Lat", "direction": "north", "unit": "degree"},
                    {"name": "Geodetic longitude", "abbreviation": "Lon", "direction": "east", "unit": "degree"}
                ]
            },
            "scope": "Horizontal component of 3D system.",
            "area": "World.",
            "bbox": {
                "south_latitude": -90,
                "west_longitude": -180,
                "north_latitude": 90,
                "east_longitude": 180
            },
            "id": {"authority": "EPSG", "code": 4326}
        }))
    }

    /// Access the underlying PROJJSON value.
    pub fn crs_value(&self) -> &Value {
        &self.0
    }
}
