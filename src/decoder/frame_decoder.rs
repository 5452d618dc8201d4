//! Ethernet -> IPv4 -> TCP header decoder.

use macaddr::MacAddr6;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::{Ipv4Flags, Ipv4Packet};
use pnet::packet::tcp::TcpPacket;
use pnet::packet::Packet;

use crate::domain::{DecodeOutcome, DecodedRecord, FrameBuffer, RawFrame};
use crate::error::DecodeError;

/// Ethernet II header size
const ETHERNET_HEADER_LEN: usize = 14;
/// IPv4 header size without options
const MIN_IPV4_HEADER_LEN: usize = 20;
/// TCP data offset (in 32-bit words) without options
const MIN_TCP_DATA_OFFSET: u8 = 5;

/// Decodes captured frames through a fixed layer stack.
///
/// Decoding never fails outright: every frame yields exactly one
/// [`DecodeOutcome`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameDecoder;

impl FrameDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Classify a single frame.
    pub fn decode(&self, frame: &RawFrame) -> DecodeOutcome {
        match self.decode_network(frame) {
            Ok((record, segment)) => match decode_tcp_ports(segment) {
                Some((src_port, dst_port)) => {
                    DecodeOutcome::Complete(record.with_ports(src_port, dst_port))
                }
                None => DecodeOutcome::PartialTransport(record),
            },
            Err(e) => {
                tracing::trace!("Frame {} unprocessed: {}", frame.seq(), e);
                DecodeOutcome::Unprocessed(e)
            }
        }
    }

    /// Decode every frame of a buffer, keeping capture order.
    pub fn decode_all(&self, frames: &FrameBuffer) -> Vec<DecodeOutcome> {
        frames.iter().map(|frame| self.decode(frame)).collect()
    }

    /// Parse the Ethernet and IPv4 headers.
    ///
    /// Returns the record and the transport segment, or `None` for the
    /// segment when the datagram cannot carry a transport header.
    fn decode_network<'a>(
        &self,
        frame: &'a RawFrame,
    ) -> Result<(DecodedRecord, Option<&'a [u8]>), DecodeError> {
        let data = frame.data();
        let ethernet = EthernetPacket::new(data).ok_or(DecodeError::Truncated {
            layer: "Ethernet",
            expected: ETHERNET_HEADER_LEN,
            actual: data.len(),
        })?;

        let ethertype = ethernet.get_ethertype();
        if ethertype != EtherTypes::Ipv4 {
            return Err(DecodeError::NotIpv4(ethertype.0));
        }

        let src_mac = MacAddr6::from(ethernet.get_source().octets());
        let dst_mac = MacAddr6::from(ethernet.get_destination().octets());

        // Slice from the frame itself so the lifetime outlives `ethernet`.
        let ip_bytes = &data[ETHERNET_HEADER_LEN..];
        let ipv4 = Ipv4Packet::new(ip_bytes).ok_or(DecodeError::Truncated {
            layer: "IPv4",
            expected: MIN_IPV4_HEADER_LEN,
            actual: ip_bytes.len(),
        })?;

        if ipv4.get_version() != 4 {
            return Err(DecodeError::BadIpVersion(ipv4.get_version()));
        }

        let header_len = ipv4.get_header_length() as usize * 4;
        if header_len < MIN_IPV4_HEADER_LEN || header_len > ip_bytes.len() {
            return Err(DecodeError::BadIpHeaderLength(header_len));
        }

        let record = DecodedRecord::network(
            frame.seq(),
            src_mac,
            dst_mac,
            ipv4.get_source(),
            ipv4.get_destination(),
        );

        // Fragments are not reassembled, so only unfragmented datagrams carry TCP.
        let fragmented =
            ipv4.get_flags() & Ipv4Flags::MoreFragments != 0 || ipv4.get_fragment_offset() != 0;
        let carries_tcp =
            ipv4.get_next_level_protocol() == IpNextHeaderProtocols::Tcp && !fragmented;
        if !carries_tcp {
            return Ok((record, None));
        }

        // Trim link-layer padding when the total length is plausible.
        let total_len = ipv4.get_total_length() as usize;
        let end = if (header_len..=ip_bytes.len()).contains(&total_len) {
            total_len
        } else {
            ip_bytes.len()
        };

        Ok((record, Some(&ip_bytes[header_len..end])))
    }
}

/// Extract the port pair from a TCP segment, if it is well formed.
fn decode_tcp_ports(segment: Option<&[u8]>) -> Option<(u16, u16)> {
    let segment = segment?;
    let tcp = TcpPacket::new(segment)?;
    let data_offset = tcp.get_data_offset();
    if data_offset < MIN_TCP_DATA_OFFSET || data_offset as usize * 4 > segment.len() {
        return None;
    }
    Some((tcp.get_source(), tcp.get_destination()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const MAC_A: [u8; 6] = [0xaa; 6];
    const MAC_B: [u8; 6] = [0xbb; 6];

    fn ethernet_header(ethertype: u16) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&MAC_B); // destination
        frame.extend_from_slice(&MAC_A); // source
        frame.extend_from_slice(&ethertype.to_be_bytes());
        frame
    }

    fn ipv4_header(protocol: u8, payload_len: usize) -> Vec<u8> {
        let total = (MIN_IPV4_HEADER_LEN + payload_len) as u16;
        let mut header = vec![0u8; MIN_IPV4_HEADER_LEN];
        header[0] = 0x45;
        header[2..4].copy_from_slice(&total.to_be_bytes());
        header[8] = 64; // TTL
        header[9] = protocol;
        header[12..16].copy_from_slice(&[10, 0, 0, 1]);
        header[16..20].copy_from_slice(&[10, 0, 0, 2]);
        header
    }

    fn tcp_header(src: u16, dst: u16) -> Vec<u8> {
        let mut header = vec![0u8; 20];
        header[0..2].copy_from_slice(&src.to_be_bytes());
        header[2..4].copy_from_slice(&dst.to_be_bytes());
        header[12] = 0x50; // data offset 5
        header[13] = 0x02; // SYN
        header
    }

    fn udp_header(src: u16, dst: u16) -> Vec<u8> {
        let mut header = vec![0u8; 8];
        header[0..2].copy_from_slice(&src.to_be_bytes());
        header[2..4].copy_from_slice(&dst.to_be_bytes());
        header[4..6].copy_from_slice(&8u16.to_be_bytes());
        header
    }

    fn frame_from(parts: &[&[u8]]) -> RawFrame {
        RawFrame::new(0, parts.concat(), None)
    }

    #[test]
    fn test_decode_complete_tcp() {
        let tcp = tcp_header(1234, 80);
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(6, tcp.len()), &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        let record = match outcome {
            DecodeOutcome::Complete(record) => record,
            other => panic!("expected complete decode, got {:?}", other),
        };

        assert_eq!(record.src_mac, MacAddr6::from(MAC_A));
        assert_eq!(record.dst_mac, MacAddr6::from(MAC_B));
        assert_eq!(record.src_ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(record.dst_ip, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(record.src_port, Some(1234));
        assert_eq!(record.dst_port, Some(80));
        assert!(record.is_complete());
    }

    #[test]
    fn test_decode_udp_is_partial() {
        let udp = udp_header(53, 5353);
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(17, udp.len()), &udp]);

        let outcome = FrameDecoder::new().decode(&frame);
        let record = match outcome {
            DecodeOutcome::PartialTransport(record) => record,
            other => panic!("expected partial decode, got {:?}", other),
        };

        assert_eq!(record.src_ip, Ipv4Addr::new(10, 0, 0, 1));
        assert!(record.src_port.is_none());
        assert!(record.dst_port.is_none());
        assert!(!record.layers.tcp);
    }

    #[test]
    fn test_decode_truncated_tcp_is_partial() {
        let tcp = tcp_header(1234, 80);
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(6, 10), &tcp[..10]]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(outcome, DecodeOutcome::PartialTransport(_)));
    }

    #[test]
    fn test_decode_bad_tcp_data_offset_is_partial() {
        let mut tcp = tcp_header(1234, 80);
        tcp[12] = 0x20;
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(6, tcp.len()), &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(outcome, DecodeOutcome::PartialTransport(_)));
    }

    #[test]
    fn test_decode_non_first_fragment_is_partial() {
        let tcp = tcp_header(1234, 80);
        let mut ip = ipv4_header(6, tcp.len());
        ip[6..8].copy_from_slice(&0x0010u16.to_be_bytes());
        let frame = frame_from(&[&ethernet_header(0x0800), &ip, &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(outcome, DecodeOutcome::PartialTransport(_)));
    }

    #[test]
    fn test_decode_first_fragment_is_partial() {
        let tcp = tcp_header(1234, 80);
        let mut ip = ipv4_header(6, tcp.len());
        ip[6..8].copy_from_slice(&0x2000u16.to_be_bytes()); // MF, offset 0
        let frame = frame_from(&[&ethernet_header(0x0800), &ip, &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(outcome, DecodeOutcome::PartialTransport(_)));
    }

    #[test]
    fn test_decode_dont_fragment_is_complete() {
        let tcp = tcp_header(1234, 80);
        let mut ip = ipv4_header(6, tcp.len());
        ip[6..8].copy_from_slice(&0x4000u16.to_be_bytes()); // DF
        let frame = frame_from(&[&ethernet_header(0x0800), &ip, &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(outcome, DecodeOutcome::Complete(_)));
    }

    #[test]
    fn test_decode_tcp_options_past_segment_is_partial() {
        let mut tcp = tcp_header(1234, 80);
        tcp[12] = 0xf0; // data offset 15 (60 bytes) in a 20 byte segment
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(6, tcp.len()), &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(outcome, DecodeOutcome::PartialTransport(_)));
    }

    #[test]
    fn test_decode_tcp_with_options_is_complete() {
        let mut tcp = tcp_header(1234, 80);
        tcp[12] = 0x60; // data offset 6
        tcp.extend_from_slice(&[0x02, 0x04, 0x05, 0xb4]); // MSS 1460
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(6, tcp.len()), &tcp]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert_eq!(outcome.record().and_then(|r| r.dst_port), Some(80));
        assert!(matches!(outcome, DecodeOutcome::Complete(_)));
    }

    #[test]
    fn test_decode_ignores_ethernet_padding() {
        let tcp = tcp_header(443, 50000);
        let padding = [0u8; 6];
        let frame = frame_from(&[
            &ethernet_header(0x0800),
            &ipv4_header(6, tcp.len()),
            &tcp,
            &padding,
        ]);

        let outcome = FrameDecoder::new().decode(&frame);
        let record = outcome.record().unwrap();
        assert_eq!(record.src_port, Some(443));
        assert_eq!(record.dst_port, Some(50000));
    }

    #[test]
    fn test_short_frame_is_unprocessed() {
        let frame = RawFrame::new(0, vec![0u8; 10], None);

        let outcome = FrameDecoder::new().decode(&frame);
        assert_eq!(
            outcome,
            DecodeOutcome::Unprocessed(DecodeError::Truncated {
                layer: "Ethernet",
                expected: 14,
                actual: 10,
            })
        );
    }

    #[test]
    fn test_empty_frame_is_unprocessed() {
        let frame = RawFrame::new(0, Vec::new(), None);
        assert!(FrameDecoder::new().decode(&frame).is_unprocessed());
    }

    #[test]
    fn test_non_ipv4_is_unprocessed() {
        let frame = frame_from(&[&ethernet_header(0x0806), &[0u8; 28]]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert_eq!(outcome, DecodeOutcome::Unprocessed(DecodeError::NotIpv4(0x0806)));
    }

    #[test]
    fn test_truncated_ipv4_is_unprocessed() {
        let ip = ipv4_header(6, 0);
        let frame = frame_from(&[&ethernet_header(0x0800), &ip[..12]]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert!(matches!(
            outcome,
            DecodeOutcome::Unprocessed(DecodeError::Truncated { layer: "IPv4", .. })
        ));
    }

    #[test]
    fn test_wrong_ip_version_is_unprocessed() {
        let mut ip = ipv4_header(6, 0);
        ip[0] = 0x65;
        let frame = frame_from(&[&ethernet_header(0x0800), &ip]);

        let outcome = FrameDecoder::new().decode(&frame);
        assert_eq!(outcome, DecodeOutcome::Unprocessed(DecodeError::BadIpVersion(6)));
    }

    #[test]
    fn test_bad_ip_header_length_is_unprocessed() {
        let mut short_ihl = ipv4_header(6, 0);
        short_ihl[0] = 0x44;
        let mut long_ihl = ipv4_header(6, 0);
        long_ihl[0] = 0x4f;

        let decoder = FrameDecoder::new();
        let short = decoder.decode(&frame_from(&[&ethernet_header(0x0800), &short_ihl]));
        let long = decoder.decode(&frame_from(&[&ethernet_header(0x0800), &long_ihl]));

        assert_eq!(short, DecodeOutcome::Unprocessed(DecodeError::BadIpHeaderLength(16)));
        assert_eq!(long, DecodeOutcome::Unprocessed(DecodeError::BadIpHeaderLength(60)));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let tcp = tcp_header(1, 2);
        let frame = frame_from(&[&ethernet_header(0x0800), &ipv4_header(6, tcp.len()), &tcp]);
        let decoder = FrameDecoder::new();

        assert_eq!(decoder.decode(&frame), decoder.decode(&frame));
    }

    #[test]
    fn test_decode_all_keeps_order() {
        let tcp = tcp_header(1, 2);
        let mut buffer = FrameBuffer::new();
        buffer.push(vec![0u8; 3]);
        buffer.push([ethernet_header(0x0800), ipv4_header(6, tcp.len()), tcp].concat());

        let outcomes = FrameDecoder::new().decode_all(&buffer);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_unprocessed());
        assert_eq!(outcomes[1].record().map(|r| r.seq), Some(1));
    }
}
