use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Sympta";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address when `SYMPTA_ADDR`/`SYMPTA_PORT` are unset.
const DEFAULT_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8420;

/// Get the application data directory
/// ~/Sympta/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Sympta")
}

/// Get the directory where exported report copies are written
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "sympta=info,axum=warn"
}

/// Socket address to bind, from `SYMPTA_ADDR` / `SYMPTA_PORT`.
///
/// Unparseable values fall back to the defaults rather than aborting;
/// these are deployment knobs, not correctness knobs.
pub fn bind_addr() -> SocketAddr {
    let addr = std::env::var("SYMPTA_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ADDR);
    let port = std::env::var("SYMPTA_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::new(addr, port)
}
