//! Find the geometry columns of a [`GeoDataFrame`].

use indexmap::IndexMap;

use crate::table::{ColumnData, GeoDataFrame, GeometryColumn};

/// Collect every geometry column of `df`, keyed by column name, in column order.
///
/// Returns an empty map when the dataset has no geometry columns.
pub fn extract_geometry_columns(df: &GeoDataFrame) -> IndexMap<&str, &GeometryColumn> {
    df.columns()
        .iter()
        .filter_map(|(name, column)| match column {
            ColumnData::Geometry(geometry_column) => Some((name.as_str(), geometry_column)),
            ColumnData::Scalar(_) => None,
        })
        .collect()
}
