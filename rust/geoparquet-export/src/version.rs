//! Look up the GeoParquet specification version written into the `"geo"` metadata.

use std::sync::OnceLock;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// The published JSON schema of GeoParquet 1.1.0.
pub const GEOPARQUET_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/opengeospatial/geoparquet/v1.1.0/format-specs/schema.json";

/// Supplies the version string of the GeoParquet metadata.
pub trait VersionProvider {
    /// The version, e.g. `"1.1.0"`.
    fn version(&self) -> ExportResult<String>;
}

/// A fixed version, for offline use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVersionProvider(String);

impl StaticVersionProvider {
    /// Create a new provider that always returns `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl VersionProvider for StaticVersionProvider {
    fn version(&self) -> ExportResult<String> {
        Ok(self.0.clone())
    }
}

/// Reads the version from the `properties.version.const` field of the GeoParquet JSON schema.
///
/// The document is fetched at most once; the result is cached for the lifetime of the
/// provider. The request has no deadline. Any failure to fetch or parse it is an error, there
/// is no fallback version.
#[derive(Debug)]
pub struct SchemaVersionProvider {
    url: String,
    cached: OnceLock<String>,
}

impl SchemaVersionProvider {
    /// Fetch from [`GEOPARQUET_SCHEMA_URL`].
    pub fn new() -> Self {
        Self::with_url(GEOPARQUET_SCHEMA_URL)
    }

    /// Fetch from another location.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cached: OnceLock::new(),
        }
    }

    /// The schema document URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> ExportResult<String> {
        debug!(url = %self.url, "fetching GeoParquet schema");
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| ExportError::Version(err.to_string()))?;
        let schema: Value = client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|err| ExportError::Version(format!("{}: {err}", self.url)))?;
        parse_schema_version(&schema)
    }
}

impl Default for SchemaVersionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionProvider for SchemaVersionProvider {
    fn version(&self) -> ExportResult<String> {
        if let Some(version) = self.cached.get() {
            return Ok(version.clone());
        }
        let version = self.fetch()?;
        debug!(version = %version, "resolved GeoParquet version");
        Ok(self.cached.get_or_init(|| version).clone())
    }
}

/// Extract `properties.version.const` from a GeoParquet JSON schema document.
pub fn parse_schema_version(schema: &Value) -> ExportResult<String> {
    schema
        .pointer("/properties/version/const")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ExportError::Version("schema has no string at properties.version.const".to_string())
        })
}
