use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Polygon,
};

/// A 2D bounding box that grows as coordinates are added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
}

impl BoundingRect {
    /// New
    pub fn new() -> Self {
        BoundingRect {
            minx: f64::INFINITY,
            miny: f64::INFINITY,
            maxx: -f64::INFINITY,
            maxy: -f64::INFINITY,
        }
    }

    /// Returns `true` until at least one coordinate has been added.
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }

    pub fn add_coord(&mut self, coord: &Coord) {
        if coord.x < self.minx {
            self.minx = coord.x;
        }
        if coord.y < self.miny {
            self.miny = coord.y;
        }

        if coord.x > self.maxx {
            self.maxx = coord.x;
        }
        if coord.y > self.maxy {
            self.maxy = coord.y;
        }
    }

    pub fn add_line_string(&mut self, line_string: &LineString) {
        for coord in line_string.coords() {
            self.add_coord(coord);
        }
    }

    pub fn add_polygon(&mut self, polygon: &Polygon) {
        self.add_line_string(polygon.exterior());
        for interior in polygon.interiors() {
            self.add_line_string(interior);
        }
    }

    pub fn add_multi_point(&mut self, multi_point: &MultiPoint) {
        for point in multi_point.iter() {
            self.add_coord(&point.0);
        }
    }

    pub fn add_multi_line_string(&mut self, multi_line_string: &MultiLineString) {
        for line_string in multi_line_string.iter() {
            self.add_line_string(line_string);
        }
    }

    pub fn add_multi_polygon(&mut self, multi_polygon: &MultiPolygon) {
        for polygon in multi_polygon.iter() {
            self.add_polygon(polygon);
        }
    }

    pub fn add_geometry(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point(g) => self.add_coord(&g.0),
            Geometry::Line(g) => {
                self.add_coord(&g.start);
                self.add_coord(&g.end);
            }
            Geometry::LineString(g) => self.add_line_string(g),
            Geometry::Polygon(g) => self.add_polygon(g),
            Geometry::MultiPoint(g) => self.add_multi_point(g),
            Geometry::MultiLineString(g) => self.add_multi_line_string(g),
            Geometry::MultiPolygon(g) => self.add_multi_polygon(g),
            Geometry::GeometryCollection(g) => self.add_geometry_collection(g),
            Geometry::Rect(g) => {
                self.add_coord(&g.min());
                self.add_coord(&g.max());
            }
            Geometry::Triangle(g) => {
                for coord in g.to_array() {
                    self.add_coord(&coord);
                }
            }
        }
    }

    pub fn add_geometry_collection(&mut self, geometry_collection: &GeometryCollection) {
        for geometry in geometry_collection.iter() {
            self.add_geometry(geometry);
        }
    }

    /// `[minx, miny, maxx, maxy]`, or `None` if no coordinate was added.
    pub fn to_bbox(&self) -> Option<Vec<f64>> {
        if self.is_empty() {
            None
        } else {
            Some(vec![self.minx, self.miny, self.maxx, self.maxy])
        }
    }
}

impl Default for BoundingRect {
    fn default() -> Self {
        Self::new()
    }
}

/// The bounds of all non-null geometries.
pub fn total_bounds<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> BoundingRect {
    let mut bounds = BoundingRect::new();
    for geometry in geometries {
        bounds.add_geometry(geometry);
    }
    bounds
}
