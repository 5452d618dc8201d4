//! Decoded header views and decode classification.

use std::net::Ipv4Addr;

use macaddr::MacAddr6;

use crate::error::DecodeError;

/// Which layers of the fixed Ethernet/IPv4/TCP stack were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerPresence {
    pub ethernet: bool,
    pub ipv4: bool,
    pub tcp: bool,
}

/// Header fields extracted from one frame.
///
/// Port fields are `None` when the transport layer is not TCP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// Capture sequence number of the source frame
    pub seq: u64,
    pub src_mac: MacAddr6,
    pub dst_mac: MacAddr6,
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub layers: LayerPresence,
}

impl DecodedRecord {
    /// Record for a frame whose Ethernet and IPv4 headers parsed.
    pub fn network(
        seq: u64,
        src_mac: MacAddr6,
        dst_mac: MacAddr6,
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
    ) -> Self {
        Self {
            seq,
            src_mac,
            dst_mac,
            src_ip,
            dst_ip,
            src_port: None,
            dst_port: None,
            layers: LayerPresence {
                ethernet: true,
                ipv4: true,
                tcp: false,
            },
        }
    }

    /// Attach TCP ports, marking the transport layer present.
    pub fn with_ports(mut self, src_port: u16, dst_port: u16) -> Self {
        self.src_port = Some(src_port);
        self.dst_port = Some(dst_port);
        self.layers.tcp = true;
        self
    }

    /// True when all three layers were decoded.
    pub fn is_complete(&self) -> bool {
        self.layers.ethernet && self.layers.ipv4 && self.layers.tcp
    }
}

/// Result of pushing one frame through the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Ethernet, IPv4 and TCP all parsed.
    Complete(DecodedRecord),
    /// Ethernet and IPv4 parsed; the payload is not a usable TCP segment.
    PartialTransport(DecodedRecord),
    /// The Ethernet or IPv4 layer failed.
    Unprocessed(DecodeError),
}

impl DecodeOutcome {
    /// The record for outcomes that produce a report row.
    pub fn record(&self) -> Option<&DecodedRecord> {
        match self {
            Self::Complete(record) | Self::PartialTransport(record) => Some(record),
            Self::Unprocessed(_) => None,
        }
    }

    pub fn is_unprocessed(&self) -> bool {
        matches!(self, Self::Unprocessed(_))
    }
}
