//! Batch client for a remote address parsing service.
//!
//! A run reads every supported file in the input directory, turns each row
//! into an address query, submits the whole batch in one POST and writes the
//! parsed rows to a CSV file.

pub mod config;
pub mod error;
pub mod fetch;
pub mod load;
pub mod output;
pub mod query;

use config::{Environment, RunConfig};
use error::Result;
use query::AddressQueryList;
use std::path::PathBuf;
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_read: usize,
    pub rows_submitted: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
}

/// Loader → encoder → submitter → writer, one request per call.
///
/// Nothing is sent if loading or validation fails, and the output file is
/// only touched after a successful round trip.
pub async fn run(config: &RunConfig, env: Environment) -> Result<RunSummary> {
    let table = load::load_input_dir(&config.input_dir)?;
    info!("input table shape: ({}, 1)", table.len());

    let queries = AddressQueryList::from_table(&table)?;
    let payload = queries.to_payload()?;

    let client = fetch::build_client(config.timeout)?;
    let endpoint = config.endpoint(env);
    info!(env = env.as_str(), endpoint = %endpoint, "submitting {} addresses", queries.len());
    let result = fetch::submit(&client, endpoint, payload).await?;

    output::write_csv(&result, &config.output_path)?;

    Ok(RunSummary {
        files_read: table.sources.len(),
        rows_submitted: queries.len(),
        rows_written: result.len(),
        output_path: config.output_path.clone(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use anyhow::{bail, Result};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };
    use url::Url;

    /// What the one-shot responder saw.
    #[derive(Debug)]
    pub struct CapturedRequest {
        pub head: String,
        pub body: String,
    }

    fn find_head_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
    }

    /// Accepts a single HTTP request on a local port and answers it with
    /// `status` and a JSON `body`. Returns the `/parse` URL to post to.
    pub async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> Result<(Url, JoinHandle<Result<CapturedRequest>>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await?;
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let head_end = loop {
                let n = socket.read(&mut chunk).await?;
                if n == 0 {
                    bail!("connection closed before request head");
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = find_head_end(&buf) {
                    break end;
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await?;
                if n == 0 {
                    bail!("connection closed before request body");
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request_body =
                String::from_utf8_lossy(&buf[head_end..head_end + content_length]).to_string();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await?;
            socket.shutdown().await?;

            Ok(CapturedRequest {
                head,
                body: request_body,
            })
        });

        Ok((Url::parse(&format!("http://{addr}/parse"))?, handle))
    }

    /// Accepts one connection and holds it open without answering.
    /// Keep the handle alive for as long as the request should hang.
    pub async fn silent_endpoint() -> Result<(Url, JoinHandle<()>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                drop(socket);
            }
        });
        Ok((Url::parse(&format!("http://{addr}/parse"))?, handle))
    }

    /// A local URL nothing is listening on.
    pub async fn refused_endpoint() -> Result<Url> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        Ok(Url::parse(&format!("http://{addr}/parse"))?)
    }
}
