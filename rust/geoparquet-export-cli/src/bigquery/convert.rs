//! Convert BigQuery JSON rows into a [`GeoDataFrame`].

use std::str::FromStr;
use std::sync::Arc;

use arrow_array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use geo_types::Geometry;
use geoparquet_export::crs::Crs;
use geoparquet_export::{ColumnData, GeoDataFrame, GeometryColumn};
use serde_json::{Map, Value};
use wkt::TryFromWkt;

use crate::bigquery::errors::{BigQueryError, Result};
use crate::bigquery::model::{TableFieldSchema, TableRow, TableSchema};

/// Build a dataset from a query's schema and rows.
///
/// The first `GEOGRAPHY` column is designated as the primary geometry column.
pub fn rows_to_geodataframe(schema: &TableSchema, rows: &[TableRow]) -> Result<GeoDataFrame> {
    for (idx, row) in rows.iter().enumerate() {
        if row.f.len() != schema.fields.len() {
            return Err(BigQueryError::RowWidth {
                row: idx,
                found: row.f.len(),
                expected: schema.fields.len(),
            });
        }
    }

    let mut columns = Vec::with_capacity(schema.fields.len());
    for (col_idx, field) in schema.fields.iter().enumerate() {
        let cells: Vec<&Value> = rows.iter().map(|row| &row.f[col_idx].v).collect();
        columns.push((field.name.clone(), convert_column(field, &cells)?));
    }

    let primary_column = schema
        .fields
        .iter()
        .find(|field| field.field_type == "GEOGRAPHY" && !field.is_repeated())
        .map(|field| field.name.clone());

    let df = GeoDataFrame::try_new_with_num_rows(columns, rows.len())?;
    Ok(match primary_column {
        Some(name) => df.with_primary_column(name),
        None => df,
    })
}

fn convert_column(field: &TableFieldSchema, cells: &[&Value]) -> Result<ColumnData> {
    if field.is_repeated() || field.is_record() {
        let values = cells
            .iter()
            .map(|cell| -> Result<Option<String>> {
                match cell {
                    Value::Null => Ok(None),
                    cell => Ok(Some(decode_nested(field, cell)?.to_string())),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(scalar(StringArray::from(values)));
    }

    let data = match field.field_type.as_str() {
        "BOOL" | "BOOLEAN" => scalar(BooleanArray::from(parse_cells::<bool>(field, cells)?)),
        "INTEGER" | "INT64" => scalar(Int64Array::from(parse_cells::<i64>(field, cells)?)),
        "FLOAT" | "FLOAT64" => scalar(Float64Array::from(parse_cells::<f64>(field, cells)?)),
        // Requested as integer microseconds since the epoch.
        "TIMESTAMP" => scalar(
            TimestampMicrosecondArray::from(parse_cells::<i64>(field, cells)?)
                .with_timezone("UTC"),
        ),
        "GEOGRAPHY" => {
            let geometries = cells
                .iter()
                .map(|cell| -> Result<Option<Geometry>> {
                    cell_str(field, cell)?
                        .map(|wkt| parse_wkt(field, wkt))
                        .transpose()
                })
                .collect::<Result<Vec<_>>>()?;
            ColumnData::Geometry(GeometryColumn::new(geometries, Some(Crs::epsg_4326())))
        }
        _ => {
            let values = cells
                .iter()
                .map(|cell| cell_str(field, cell))
                .collect::<Result<Vec<_>>>()?;
            scalar(StringArray::from(values))
        }
    };
    Ok(data)
}

fn scalar<A: arrow_array::Array + 'static>(array: A) -> ColumnData {
    ColumnData::Scalar(Arc::new(array) as ArrayRef)
}

fn invalid_value(field: &TableFieldSchema, value: &Value) -> BigQueryError {
    BigQueryError::InvalidValue {
        column: field.name.clone(),
        field_type: field.field_type.clone(),
        value: value.to_string(),
    }
}

/// Scalar cells are JSON strings or null.
fn cell_str<'a>(field: &TableFieldSchema, cell: &'a Value) -> Result<Option<&'a str>> {
    match cell {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(invalid_value(field, other)),
    }
}

fn parse_cells<T: FromStr>(field: &TableFieldSchema, cells: &[&Value]) -> Result<Vec<Option<T>>> {
    cells
        .iter()
        .map(|cell| -> Result<Option<T>> {
            cell_str(field, cell)?
                .map(|s| s.parse::<T>().map_err(|_| invalid_value(field, cell)))
                .transpose()
        })
        .collect()
}

fn parse_wkt(field: &TableFieldSchema, wkt: &str) -> Result<Geometry> {
    Geometry::try_from_wkt_str(wkt).map_err(|err| BigQueryError::Wkt {
        column: field.name.clone(),
        message: format!("{err}: {wkt}"),
    })
}

/// Turn BigQuery's `{"v": ...}` / `{"f": [...]}` cell encoding into plain JSON.
fn decode_nested(field: &TableFieldSchema, value: &Value) -> Result<Value> {
    if field.is_repeated() {
        let items = value.as_array().ok_or_else(|| invalid_value(field, value))?;
        let element = TableFieldSchema {
            mode: None,
            ..field.clone()
        };
        return items
            .iter()
            .map(|item| -> Result<Value> {
                let inner = item.get("v").ok_or_else(|| invalid_value(field, item))?;
                decode_nested(&element, inner)
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array);
    }

    if field.is_record() {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let cells = value
            .get("f")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid_value(field, value))?;
        let subfields = field.fields.as_deref().unwrap_or_default();
        let mut object = Map::with_capacity(subfields.len());
        for (subfield, cell) in subfields.iter().zip(cells) {
            let inner = cell.get("v").ok_or_else(|| invalid_value(field, cell))?;
            object.insert(subfield.name.clone(), decode_nested(subfield, inner)?);
        }
        return Ok(Value::Object(object));
    }

    Ok(value.clone())
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use arrow_array::types::{Float64Type, Int64Type, TimestampMicrosecondType};
    use arrow_array::Array;
    use arrow_schema::{DataType, TimeUnit};
    use geo_types::{point, polygon};
    use geoparquet_export::ColumnType;
    use serde_json::json;

    use super::*;
    use crate::bigquery::model::QueryResponse;

    fn response() -> QueryResponse {
        serde_json::from_value(json!({
            "jobComplete": true,
            "schema": {"fields": [
                {"name": "id", "type": "INTEGER", "mode": "NULLABLE"},
                {"name": "name", "type": "STRING", "mode": "NULLABLE"},
                {"name": "score", "type": "FLOAT", "mode": "NULLABLE"},
                {"name": "active", "type": "BOOLEAN", "mode": "NULLABLE"},
                {"name": "created", "type": "TIMESTAMP", "mode": "NULLABLE"},
                {"name": "geog", "type": "GEOGRAPHY", "mode": "NULLABLE"},
                {"name": "tags", "type": "STRING", "mode": "REPEATED"},
                {"name": "info", "type": "RECORD", "mode": "NULLABLE", "fields": [
                    {"name": "a", "type": "INTEGER"},
                    {"name": "b", "type": "STRING"}
                ]}
            ]},
            "rows": [
                {"f": [
                    {"v": "1"}, {"v": "x"}, {"v": "1.5"}, {"v": "true"},
                    {"v": "1700000000000000"}, {"v": "POINT(1 2)"},
                    {"v": [{"v": "a"}, {"v": "b"}]},
                    {"v": {"f": [{"v": "7"}, {"v": "z"}]}}
                ]},
                {"f": [
                    {"v": "2"}, {"v": null}, {"v": null}, {"v": "false"},
                    {"v": null}, {"v": "POLYGON((0 0, 1 0, 1 1, 0 0))"},
                    {"v": []},
                    {"v": null}
                ]},
                {"f": [
                    {"v": "3"}, {"v": "y"}, {"v": "NaN"}, {"v": null},
                    {"v": "0"}, {"v": null},
                    {"v": [{"v": "c"}]},
                    {"v": {"f": [{"v": null}, {"v": "w"}]}}
                ]}
            ]
        }))
        .unwrap()
    }

    fn convert(response: &QueryResponse) -> GeoDataFrame {
        rows_to_geodataframe(
            response.schema.as_ref().unwrap(),
            response.rows.as_deref().unwrap(),
        )
        .unwrap()
    }

    fn scalar_column<'a>(df: &'a GeoDataFrame, name: &str) -> &'a ArrayRef {
        match df.column(name).unwrap() {
            ColumnData::Scalar(array) => array,
            ColumnData::Geometry(_) => panic!("{name} is a geometry column"),
        }
    }

    #[test]
    fn column_types() {
        let df = convert(&response());
        assert_eq!(df.num_rows(), 3);
        assert_eq!(df.primary_column(), Some("geog"));

        let types: Vec<_> = df
            .columns()
            .iter()
            .map(|(_, column)| column.column_type())
            .collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Scalar(DataType::Int64),
                ColumnType::Scalar(DataType::Utf8),
                ColumnType::Scalar(DataType::Float64),
                ColumnType::Scalar(DataType::Boolean),
                ColumnType::Scalar(DataType::Timestamp(
                    TimeUnit::Microsecond,
                    Some("UTC".into())
                )),
                ColumnType::Geometry,
                ColumnType::Scalar(DataType::Utf8),
                ColumnType::Scalar(DataType::Utf8),
            ]
        );
    }

    #[test]
    fn scalar_values() {
        let df = convert(&response());

        let ids = scalar_column(&df, "id").as_primitive::<Int64Type>();
        assert_eq!(ids.values().to_vec(), vec![1, 2, 3]);

        let names = scalar_column(&df, "name").as_string::<i32>();
        assert_eq!(names.value(0), "x");
        assert!(names.is_null(1));

        let scores = scalar_column(&df, "score").as_primitive::<Float64Type>();
        assert_eq!(scores.value(0), 1.5);
        assert!(scores.is_null(1));
        assert!(scores.value(2).is_nan());

        let active = scalar_column(&df, "active").as_boolean();
        assert!(active.value(0));
        assert!(!active.value(1));
        assert!(active.is_null(2));

        let created = scalar_column(&df, "created").as_primitive::<TimestampMicrosecondType>();
        assert_eq!(created.value(0), 1_700_000_000_000_000);
        assert!(created.is_null(1));
    }

    #[test]
    fn nested_values_as_json() {
        let df = convert(&response());

        let tags = scalar_column(&df, "tags").as_string::<i32>();
        assert_eq!(tags.value(0), r#"["a","b"]"#);
        assert_eq!(tags.value(1), "[]");
        assert_eq!(tags.value(2), r#"["c"]"#);

        let info = scalar_column(&df, "info").as_string::<i32>();
        assert_eq!(info.value(0), r#"{"a":"7","b":"z"}"#);
        assert!(info.is_null(1));
        assert_eq!(info.value(2), r#"{"a":null,"b":"w"}"#);
    }

    #[test]
    fn geography_values() {
        let df = convert(&response());
        let ColumnData::Geometry(geog) = df.column("geog").unwrap() else {
            panic!("geog is not a geometry column");
        };
        assert_eq!(geog.crs(), Some(&Crs::epsg_4326()));
        assert_eq!(
            geog.geometries(),
            &[
                Some(Geometry::Point(point!(x: 1., y: 2.))),
                Some(Geometry::Polygon(polygon![
                    (x: 0., y: 0.),
                    (x: 1., y: 0.),
                    (x: 1., y: 1.),
                    (x: 0., y: 0.),
                ])),
                None,
            ]
        );
    }

    #[test]
    fn no_geography_column() {
        let response: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "n", "type": "INT64"}]},
            "rows": [{"f": [{"v": "5"}]}]
        }))
        .unwrap();
        let df = convert(&response);
        assert_eq!(df.primary_column(), None);
        assert_eq!(df.num_rows(), 1);
    }

    #[test]
    fn invalid_integer() {
        let response: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "n", "type": "INT64"}]},
            "rows": [{"f": [{"v": "five"}]}]
        }))
        .unwrap();
        let result = rows_to_geodataframe(
            response.schema.as_ref().unwrap(),
            response.rows.as_deref().unwrap(),
        );
        assert!(matches!(result, Err(BigQueryError::InvalidValue { .. })));
    }

    #[test]
    fn invalid_wkt() {
        let response: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "g", "type": "GEOGRAPHY"}]},
            "rows": [{"f": [{"v": "POINT(1"}]}]
        }))
        .unwrap();
        let result = rows_to_geodataframe(
            response.schema.as_ref().unwrap(),
            response.rows.as_deref().unwrap(),
        );
        assert!(matches!(result, Err(BigQueryError::Wkt { .. })));
    }

    #[test]
    fn ragged_row() {
        let response: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "a", "type": "STRING"}, {"name": "b", "type": "STRING"}]},
            "rows": [{"f": [{"v": "x"}]}]
        }))
        .unwrap();
        let result = rows_to_geodataframe(
            response.schema.as_ref().unwrap(),
            response.rows.as_deref().unwrap(),
        );
        assert!(matches!(result, Err(BigQueryError::RowWidth { .. })));
    }
}
