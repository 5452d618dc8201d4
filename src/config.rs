use std::net::Ipv4Addr;

use crate::capture::CaptureWindow;
use crate::error::ConfigError;

/// Validated settings for one capture run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Address bound to the interface to capture on
    pub interface_addr: Ipv4Addr,
    pub window: CaptureWindow,
}

impl CaptureConfig {
    /// Build a config from raw `-a` / `-t` values.
    pub fn from_args(address: Option<&str>, seconds: Option<i64>) -> Result<Self, ConfigError> {
        let address = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                ConfigError::InvalidArgument("Must provide an ip address (-a flag)".to_string())
            })?;

        let interface_addr = address.parse::<Ipv4Addr>().map_err(|_| {
            ConfigError::InvalidArgument(format!("Invalid IPv4 address: {}", address))
        })?;

        Ok(CaptureConfig {
            interface_addr,
            window: CaptureWindow::from_secs(seconds),
        })
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn tracing_filter(verbose: bool) -> &'static str {
        if verbose {
            "wirefish=debug"
        } else {
            "warn"
        }
    }
}
