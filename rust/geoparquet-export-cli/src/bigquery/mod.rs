//! A [`QuerySource`] backed by the BigQuery v2 REST API.

mod convert;
mod errors;
mod model;

use std::time::Duration;

use geoparquet_export::{ExportResult, GeoDataFrame, QuerySource};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use convert::rows_to_geodataframe;
use errors::{BigQueryError, Result};
use model::{ErrorResponse, JobReference, QueryResponse, TableRow};

pub const BIGQUERY_API_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// How long each request may wait server-side for the job to finish.
const QUERY_TIMEOUT_MS: u64 = 10_000;

/// Runs standard SQL queries in one project and collects every result page.
#[derive(Clone)]
pub struct BigQueryClient {
    client: Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

impl BigQueryClient {
    pub fn try_new(project_id: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(QUERY_TIMEOUT_MS) * 6)
            .build()?;
        Ok(Self {
            client,
            base_url: BIGQUERY_API_URL.to_string(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        })
    }

    /// Send requests to another endpoint, e.g. an emulator.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn queries_url(&self) -> String {
        format!("{}/projects/{}/queries", self.base_url, self.project_id)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.access_token).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|err| err.error.message)
                .unwrap_or(body);
            return Err(BigQueryError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }

    fn start_query(&self, query: &str) -> Result<QueryResponse> {
        let body = json!({
            "query": query,
            "useLegacySql": false,
            "timeoutMs": QUERY_TIMEOUT_MS,
            "formatOptions": {"useInt64Timestamp": true},
        });
        self.send(self.client.post(self.queries_url()).json(&body))
    }

    fn get_query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse> {
        let url = format!("{}/{}", self.queries_url(), job.job_id);
        let mut params = vec![
            ("timeoutMs", QUERY_TIMEOUT_MS.to_string()),
            ("formatOptions.useInt64Timestamp", "true".to_string()),
        ];
        if let Some(location) = job.location.as_deref() {
            params.push(("location", location.to_string()));
        }
        if let Some(page_token) = page_token {
            params.push(("pageToken", page_token.to_string()));
        }
        self.send(self.client.get(url).query(&params))
    }

    /// Run `query` and wait for every row.
    pub fn run_query(&self, query: &str) -> Result<GeoDataFrame> {
        debug!(project = %self.project_id, "starting BigQuery job");
        let mut response = self.start_query(query)?;
        let job = response
            .job_reference
            .clone()
            .ok_or(BigQueryError::MissingJobReference)?;

        let mut schema = None;
        let mut rows: Vec<TableRow> = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            if let Some(errors) = response.errors.as_deref().filter(|e| !e.is_empty()) {
                let message = errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(BigQueryError::Job(message));
            }

            if response.job_complete {
                if schema.is_none() {
                    schema = response.schema.take();
                }
                rows.extend(response.rows.take().unwrap_or_default());
                match response.page_token.take() {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
                debug!(rows = rows.len(), "fetching next result page");
            } else {
                debug!(job_id = %job.job_id, "waiting for BigQuery job");
            }

            response = self.get_query_results(&job, page_token.as_deref())?;
        }

        let schema = schema.ok_or(BigQueryError::MissingSchema)?;
        info!(job_id = %job.job_id, rows = rows.len(), "BigQuery job complete");
        rows_to_geodataframe(&schema, &rows)
    }
}

impl QuerySource for BigQueryClient {
    fn query(&self, query: &str) -> ExportResult<GeoDataFrame> {
        Ok(self.run_query(query)?)
    }
}
