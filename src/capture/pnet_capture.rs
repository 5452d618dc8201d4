//! pnet-based frame source.

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::thread;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};

use super::FrameSource;
use crate::error::CaptureError;

/// How long a single read may block before the producer re-checks its stop flag.
const READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Pause after a non-timeout read error before trying the device again.
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// Live capture on a network interface using the pnet library.
pub struct PnetSource {
    name: String,
    rx: Box<dyn DataLinkReceiver>,
}

impl PnetSource {
    /// Open the interface that has `addr` bound to it.
    ///
    /// Both lookup and channel creation must succeed before a source exists,
    /// so a session can never be started on a missing device.
    pub fn open_by_address(addr: Ipv4Addr) -> Result<Self, CaptureError> {
        let interface = find_by_address(datalink::interfaces(), addr)
            .ok_or(CaptureError::DeviceNotFound(addr))?;

        Self::open(interface)
    }

    /// Open an Ethernet channel on an already resolved interface.
    pub fn open(interface: NetworkInterface) -> Result<Self, CaptureError> {
        let config = Config {
            read_timeout: Some(READ_TIMEOUT),
            promiscuous: true,
            ..Config::default()
        };

        let rx = match datalink::channel(&interface, config) {
            Ok(Channel::Ethernet(_tx, rx)) => rx,
            Ok(_) => {
                return Err(CaptureError::DeviceOpenFailed {
                    name: interface.name,
                    reason: "unsupported channel type".to_string(),
                })
            }
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("permission") || msg.contains("Operation not permitted") {
                    return Err(CaptureError::InsufficientPermissions(interface.name));
                }
                return Err(CaptureError::DeviceOpenFailed {
                    name: interface.name,
                    reason: msg,
                });
            }
        };

        tracing::info!("Opened capture device {}", interface.name);

        Ok(Self {
            name: interface.name,
            rx,
        })
    }

    /// One line per interface with the IPv4 addresses `-a` accepts.
    pub fn list_interfaces() -> Vec<String> {
        datalink::interfaces().iter().map(describe_interface).collect()
    }
}

impl FrameSource for PnetSource {
    fn next_frame(&mut self) -> Option<Vec<u8>> {
        match self.rx.next() {
            Ok(frame) => Some(frame.to_vec()),
            Err(e) => {
                if let Some(pause) = read_error_backoff(e.kind()) {
                    tracing::debug!("Capture error on {}: {}", self.name, e);
                    thread::sleep(pause);
                }
                None
            }
        }
    }

    fn interface_name(&self) -> &str {
        &self.name
    }
}

/// Pause after a failed read. Timeouts are expected and get none, so a
/// device that keeps failing does not spin the producer.
fn read_error_backoff(kind: io::ErrorKind) -> Option<Duration> {
    match kind {
        io::ErrorKind::TimedOut => None,
        _ => Some(READ_ERROR_BACKOFF),
    }
}

fn describe_interface(iface: &NetworkInterface) -> String {
    let status = if iface.is_up() { "up" } else { "down" };
    let addrs: Vec<String> = iface
        .ips
        .iter()
        .filter_map(|net| match net.ip() {
            IpAddr::V4(addr) => Some(addr.to_string()),
            IpAddr::V6(_) => None,
        })
        .collect();

    if addrs.is_empty() {
        format!("{:<16} {:<5} (no IPv4 address)", iface.name, status)
    } else {
        format!("{:<16} {:<5} -a {}", iface.name, status, addrs.join(" | -a "))
    }
}

/// Pick the interface with `addr` among its bound addresses.
fn find_by_address(
    interfaces: Vec<NetworkInterface>,
    addr: Ipv4Addr,
) -> Option<NetworkInterface> {
    interfaces
        .into_iter()
        .find(|iface| iface.ips.iter().any(|net| net.ip() == IpAddr::V4(addr)))
}
