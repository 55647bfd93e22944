use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DASHBOARD_PORT: &str = "DASHBOARD_PORT";

const DEFAULT_PORT: u16 = 8080;

pub fn get_dashboard_port() -> u16 {
    let port_from_env = std::env::var(DASHBOARD_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_dashboard_addr() -> SocketAddr {
    SocketAddr::from((DEFAULT_ADDR, get_dashboard_port()))
}

const UPTIME_DB_PATH: &str = "UPTIME_DB_PATH";

const DEFAULT_DB_PATH: &str = "./uptime.db";

pub fn get_db_path() -> PathBuf {
    let path_from_env = std::env::var(UPTIME_DB_PATH);
    path_from_env.map_or(PathBuf::from(DEFAULT_DB_PATH), PathBuf::from)
}
