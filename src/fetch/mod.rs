// src/fetch/mod.rs

use crate::{
    error::{BatchError, RemoteCause, Result},
    output::OutputTable,
};
use reqwest::{header::CONTENT_TYPE, Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Success body of the address parser: `{"Outputs": [{...}, ...]}`.
#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(rename = "Outputs")]
    outputs: Option<Vec<Map<String, Value>>>,
}

/// Build the HTTP client. `None` keeps reqwest's default of no timeout.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build().map_err(|e| BatchError::RemoteFailure {
        cause: RemoteCause::Transport(e),
    })
}

/// POST the payload once. A transport failure comes back as the error value
/// so callers can log the cause before reporting a generic failure.
pub async fn post_payload(
    client: &Client,
    endpoint: &Url,
    payload: String,
) -> std::result::Result<Response, reqwest::Error> {
    info!("Creating post request to {}", endpoint);
    client
        .post(endpoint.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await
}

/// Submits the batch and decodes the parsed rows.
///
/// Every failure after the payload leaves this process (no response,
/// non-200 status, undecodable body) is `RemoteFailure`, with the
/// underlying cause attached.
#[tracing::instrument(level = "info", skip(client, payload), fields(endpoint = %endpoint, bytes = payload.len()))]
pub async fn submit(client: &Client, endpoint: &Url, payload: String) -> Result<OutputTable> {
    let resp = match post_payload(client, endpoint, payload).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, timeout = e.is_timeout(), connect = e.is_connect(), "no response from address parser");
            return Err(remote(RemoteCause::Transport(e)));
        }
    };

    let status = resp.status();
    if status != StatusCode::OK {
        warn!(status = status.as_u16(), "address parser rejected the batch");
        return Err(remote(RemoteCause::Status(status.as_u16())));
    }

    let body: ParseResponse = resp
        .json()
        .await
        .map_err(|e| remote(RemoteCause::Decode(e)))?;
    let rows = body.outputs.ok_or_else(|| remote(RemoteCause::MissingOutputs))?;

    let table = OutputTable::from_rows(rows);
    info!(rows = table.len(), columns = table.columns.len(), "parsed addresses received");
    Ok(table)
}

fn remote(cause: RemoteCause) -> BatchError {
    BatchError::RemoteFailure { cause }
}
