//! In-memory tabular dataset with geometry columns, the input to the GeoParquet encoder.

use std::collections::{HashMap, HashSet};

use arrow_array::{Array, ArrayRef};
use arrow_schema::DataType;
use geo_types::Geometry;

use crate::crs::Crs;
use crate::error::{ExportError, ExportResult};

/// A column of geometry values, with an optional coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryColumn {
    geometries: Vec<Option<Geometry>>,
    crs: Option<Crs>,
}

impl GeometryColumn {
    /// Create a new geometry column.
    pub fn new(geometries: Vec<Option<Geometry>>, crs: Option<Crs>) -> Self {
        Self { geometries, crs }
    }

    /// The geometry values, with `None` for nulls.
    pub fn geometries(&self) -> &[Option<Geometry>] {
        &self.geometries
    }

    /// The CRS of this column, if tagged.
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Iterate over the non-null geometries.
    pub fn iter_valid(&self) -> impl Iterator<Item = &Geometry> {
        self.geometries.iter().flatten()
    }

    /// Number of rows, including nulls.
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Number of null geometries.
    pub fn null_count(&self) -> usize {
        self.geometries.iter().filter(|g| g.is_none()).count()
    }
}

impl From<Vec<Option<Geometry>>> for GeometryColumn {
    fn from(value: Vec<Option<Geometry>>) -> Self {
        Self::new(value, None)
    }
}

impl From<Vec<Geometry>> for GeometryColumn {
    fn from(value: Vec<Geometry>) -> Self {
        Self::new(value.into_iter().map(Some).collect(), None)
    }
}

/// The data held by one column of a [`GeoDataFrame`].
#[derive(Debug, Clone)]
pub enum ColumnData {
    /// A non-spatial column, stored as an Arrow array.
    Scalar(ArrayRef),
    /// A geometry column.
    Geometry(GeometryColumn),
}

impl ColumnData {
    /// The type descriptor of this column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Scalar(arr) => ColumnType::Scalar(arr.data_type().clone()),
            Self::Geometry(_) => ColumnType::Geometry,
        }
    }

    /// Number of rows in this column.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(arr) => arr.len(),
            Self::Geometry(col) => col.len(),
        }
    }

    /// Returns `true` if this column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<ArrayRef> for ColumnData {
    fn from(value: ArrayRef) -> Self {
        Self::Scalar(value)
    }
}

impl From<GeometryColumn> for ColumnData {
    fn from(value: GeometryColumn) -> Self {
        Self::Geometry(value)
    }
}

/// Declared type of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Scalar column with the given Arrow type.
    Scalar(DataType),
    /// Geometry column.
    Geometry,
}

impl ColumnType {
    /// Returns `true` for geometry columns.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry)
    }
}

/// A rectangular, in-memory table whose columns are either Arrow arrays or geometries.
#[derive(Debug, Clone)]
pub struct GeoDataFrame {
    columns: Vec<(String, ColumnData)>,
    num_rows: usize,
    primary_column: Option<String>,
    metadata: HashMap<String, String>,
}

impl GeoDataFrame {
    /// Create a new dataset from named columns.
    ///
    /// All columns must have the same length and column names must be unique.
    pub fn try_new(columns: Vec<(String, ColumnData)>) -> ExportResult<Self> {
        let num_rows = columns.first().map(|(_, col)| col.len()).unwrap_or(0);
        Self::try_new_with_num_rows(columns, num_rows)
    }

    /// Create a new dataset with an explicit row count.
    ///
    /// This allows a table with rows but zero columns.
    pub fn try_new_with_num_rows(
        columns: Vec<(String, ColumnData)>,
        num_rows: usize,
    ) -> ExportResult<Self> {
        let mut names = HashSet::with_capacity(columns.len());
        for (name, col) in columns.iter() {
            if !names.insert(name.as_str()) {
                return Err(ExportError::InvalidData(format!(
                    "duplicate column name: {name}"
                )));
            }
            if col.len() != num_rows {
                return Err(ExportError::InvalidData(format!(
                    "column {name} has {} rows, expected {num_rows}",
                    col.len()
                )));
            }
        }

        Ok(Self {
            columns,
            num_rows,
            primary_column: None,
            metadata: HashMap::new(),
        })
    }

    /// Designate the primary geometry column.
    pub fn with_primary_column(mut self, primary_column: impl Into<String>) -> Self {
        self.primary_column = Some(primary_column.into());
        self
    }

    /// Attach schema-level key/value metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// The columns of this dataset, in order.
    pub fn columns(&self) -> &[(String, ColumnData)] {
        &self.columns
    }

    /// Access a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|(col_name, _)| col_name == name)
            .map(|(_, col)| col)
    }

    /// The designated primary geometry column, if set.
    pub fn primary_column(&self) -> Option<&str> {
        self.primary_column.as_deref()
    }

    /// Schema-level metadata carried by this dataset.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}
