//! Single-attempt grid download.
//!
//! No retries and no resumption: a failed request fails the run. Whatever
//! was written to the destination before a failure is left for the caller's
//! scratch-file cleanup.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use wind_common::{WindError, WindResult};

use crate::config::FetchConfig;

/// Transport that copies a remote grid into a local file.
#[async_trait]
pub trait GridFetcher: Send + Sync {
    /// Stream `url` into `destination`, returning the number of bytes written.
    async fn fetch(&self, url: &str, destination: &Path) -> WindResult<u64>;
}

/// HTTP(S) fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpGridFetcher {
    client: Client,
}

impl HttpGridFetcher {
    pub fn new(config: &FetchConfig) -> WindResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| WindError::transport("<client>", format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl GridFetcher for HttpGridFetcher {
    #[instrument(skip(self), fields(destination = %destination.display()))]
    async fn fetch(&self, url: &str, destination: &Path) -> WindResult<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WindError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WindError::transport(url, format!("HTTP {}", status)));
        }

        let mut file = File::create(destination).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| WindError::transport(url, e))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;

        debug!(bytes = written, "Download complete");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let fetcher = HttpGridFetcher::new(&FetchConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        // Port 9 (discard) on loopback is not expected to be listening
        let url = "http://127.0.0.1:9/cgi-bin/filter_gfs_1p00.pl";

        let err = fetcher
            .fetch(url, &dir.path().join("wind.u.grb"))
            .await
            .unwrap_err();

        match err {
            WindError::Transport { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("expected Transport, got {:?}", other),
        }
    }
}
