use std::collections::HashMap;
use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, StringArray};
use geo_types::{
    line_string, point, polygon, Geometry, GeometryCollection, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};

use crate::crs::Crs;
use crate::table::{GeoDataFrame, GeometryColumn};

pub(crate) fn p0() -> Point {
    point!(
        x: 0., y: 1.
    )
}

pub(crate) fn p1() -> Point {
    point!(
        x: 1., y: 2.
    )
}

pub(crate) fn p2() -> Point {
    point!(
        x: -2., y: 3.
    )
}

pub(crate) fn ls0() -> LineString {
    line_string![
        (x: 0., y: 1.),
        (x: 1., y: 2.)
    ]
}

pub(crate) fn ls1() -> LineString {
    line_string![
        (x: 3., y: 4.),
        (x: 5., y: 6.),
        (x: 7., y: -8.)
    ]
}

pub(crate) fn poly0() -> Polygon {
    polygon![
        (x: -111., y: 45.),
        (x: -111., y: 41.),
        (x: -104., y: 41.),
        (x: -104., y: 45.),
    ]
}

pub(crate) fn poly1() -> Polygon {
    polygon!(
        exterior: [
            (x: -111., y: 45.),
            (x: -111., y: 41.),
            (x: -104., y: 41.),
            (x: -104., y: 45.),
        ],
        interiors: [
            [
                (x: -110., y: 44.),
                (x: -110., y: 42.),
                (x: -105., y: 42.),
                (x: -105., y: 44.),
            ],
        ],
    )
}

pub(crate) fn mp0() -> MultiPoint {
    MultiPoint(vec![p0(), p1()])
}

pub(crate) fn mls0() -> MultiLineString {
    MultiLineString(vec![ls0(), ls1()])
}

pub(crate) fn mpoly0() -> MultiPolygon {
    MultiPolygon(vec![poly0(), poly1()])
}

pub(crate) fn gc0() -> GeometryCollection {
    GeometryCollection(vec![
        Geometry::Point(p2()),
        Geometry::LineString(ls1()),
        Geometry::Polygon(poly1()),
    ])
}

/// One geometry of every type, with a null in the middle.
pub(crate) fn all_geometries() -> Vec<Option<Geometry>> {
    vec![
        Some(p0().into()),
        Some(ls0().into()),
        Some(poly1().into()),
        None,
        Some(mp0().into()),
        Some(mls0().into()),
        Some(mpoly0().into()),
        Some(Geometry::GeometryCollection(gc0())),
    ]
}

/// A small dataset: two scalar columns and a mixed point/polygon geometry column in EPSG:4326.
pub(crate) fn geodataframe() -> GeoDataFrame {
    let ids: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3, 4]));
    let names: ArrayRef = Arc::new(StringArray::from(vec![
        Some("a"),
        None,
        Some("c"),
        Some("d"),
    ]));
    let geometry = GeometryColumn::new(
        vec![
            Some(p0().into()),
            Some(poly0().into()),
            None,
            Some(p1().into()),
        ],
        Some(Crs::epsg_4326()),
    );

    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), "test".to_string());

    GeoDataFrame::try_new(vec![
        ("id".to_string(), ids.into()),
        ("name".to_string(), names.into()),
        ("geometry".to_string(), geometry.into()),
    ])
    .unwrap()
    .with_primary_column("geometry")
    .with_metadata(metadata)
}

/// A dataset of `num_rows` points, used for partitioning tests.
pub(crate) fn point_geodataframe(num_rows: usize) -> GeoDataFrame {
    let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(0..num_rows as i64));
    let geometry = GeometryColumn::from(
        (0..num_rows)
            .map(|i| Geometry::Point(point!(x: i as f64, y: -(i as f64))))
            .collect::<Vec<_>>(),
    );
    GeoDataFrame::try_new(vec![
        ("id".to_string(), ids.into()),
        ("geometry".to_string(), geometry.into()),
    ])
    .unwrap()
    .with_primary_column("geometry")
}
