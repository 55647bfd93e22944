use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use crate::config::MonitorConfig;

use super::transport::Transport;

/// Anything that can tell whether the internet is reachable right now
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> bool;
}

/// Where a probe connects to and what it fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub url: String,
}

impl From<&MonitorConfig> for Target {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            host: config.target_host.clone(),
            port: config.target_port,
            url: config.check_url.clone(),
        }
    }
}

/// Result of one timeout stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Connected to a non-local address and the GET answered below 400
    Reachable,
    /// The raw connection could not be opened
    ConnectFailed,
    /// The connection was answered from inside the local network
    LocalNetwork,
    /// The GET timed out or failed
    RequestFailed,
    /// The GET answered with an error status
    BadStatus(u16),
}

impl StageOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, StageOutcome::Reachable)
    }
}

/// True for addresses in 192.168.0.0/16, including their IPv4-mapped IPv6 form
pub fn is_local_network(addr: &SocketAddr) -> bool {
    fn in_prefix(ip: Ipv4Addr) -> bool {
        let [a, b, _, _] = ip.octets();
        a == 192 && b == 168
    }

    match addr.ip() {
        IpAddr::V4(ip) => in_prefix(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped().is_some_and(in_prefix),
    }
}

/// Escalating-timeout reachability check
///
/// Each stage connects, rejects answers from the local network, then
/// confirms with a GET. The first passing stage wins; later stages are not
/// attempted.
pub struct Prober<T> {
    transport: T,
    target: Target,
    timeouts: Vec<Duration>,
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T, target: Target, timeouts: Vec<Duration>) -> Self {
        Self {
            transport,
            target,
            timeouts,
        }
    }

    pub fn from_config(transport: T, config: &MonitorConfig) -> Self {
        Self::new(transport, Target::from(config), config.timeouts())
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run a single stage with the given timeout
    pub async fn check_stage(&self, timeout: Duration) -> StageOutcome {
        let Target { host, port, url } = &self.target;

        let remote = match self.transport.connect(host, *port, timeout).await {
            Ok(remote) => remote,
            Err(e) => {
                debug!("dial error: {e}");
                return StageOutcome::ConnectFailed;
            }
        };
        trace!("reachable {remote}");

        if is_local_network(&remote) {
            debug!("response came from inside the local network ({remote})");
            return StageOutcome::LocalNetwork;
        }

        match self.transport.fetch_status(url, timeout).await {
            Ok(status) if status < 400 => {
                trace!("response status {status}");
                StageOutcome::Reachable
            }
            Ok(status) => {
                debug!("response status {status}");
                StageOutcome::BadStatus(status)
            }
            Err(e) => {
                debug!("failed to GET: {e:#}");
                StageOutcome::RequestFailed
            }
        }
    }
}

#[async_trait]
impl<T: Transport> Probe for Prober<T> {
    #[instrument(skip(self), fields(target = %self.target.host))]
    async fn probe(&self) -> bool {
        for &timeout in &self.timeouts {
            let outcome = self.check_stage(timeout).await;
            if outcome.is_reachable() {
                return true;
            }
            debug!("unreachable within {timeout:?}: {outcome:?}");
        }

        false
    }
}
