use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::trace;

/// Network primitives used by the reachability prober
///
/// Kept behind a trait so probe stages can be driven by a scripted transport
/// in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a TCP connection within `timeout` and return the resolved remote
    /// address. The connection is closed before returning.
    async fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<SocketAddr>;

    /// Issue a GET within `timeout` and return the response status code
    async fn fetch_status(&self, url: &str, timeout: Duration) -> anyhow::Result<u16>;
}

/// Real sockets and a shared HTTP client
pub struct NetTransport {
    client: reqwest::Client,
}

impl NetTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for NetTransport {
    async fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<SocketAddr> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect to {host}:{port} timed out after {timeout:?}"),
                )
            })??;

        let remote = stream.peer_addr()?;
        trace!("connected to {remote}");

        Ok(remote)
    }

    async fn fetch_status(&self, url: &str, timeout: Duration) -> anyhow::Result<u16> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .context("HTTP request failed")?;

        Ok(response.status().as_u16())
    }
}
