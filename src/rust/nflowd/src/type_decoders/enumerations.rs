//! Decoders that map small integer codes onto the names IANA (or the
//! exporting vendor) assigns to them.

use super::protocol_names::ipv4_option_names;
use super::{unsupported, DecodeError, FlowValue};

fn first(kind: &'static str, b: &[u8]) -> Result<u8, DecodeError> {
    b.first().copied().ok_or_else(|| unsupported(kind, b))
}

fn first_u16(kind: &'static str, b: &[u8]) -> Result<u16, DecodeError> {
    match b {
        [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(unsupported(kind, b)),
    }
}

fn text(s: &str) -> Result<FlowValue, DecodeError> {
    Ok(FlowValue::Text(s.to_string()))
}

fn number(v: impl ToString) -> Result<FlowValue, DecodeError> {
    Ok(FlowValue::Text(v.to_string()))
}

/// Renders each bit from 7 down to 0 as its mapping letter or `.`.
fn bit_pattern(flags: u8, mapping: &[char; 8]) -> String {
    (0..8)
        .rev()
        .map(|bit| {
            if (flags >> bit) & 0x01 != 0 {
                mapping[bit]
            } else {
                '.'
            }
        })
        .collect()
}

const TCP_FLAG_LETTERS: [char; 8] = ['F', 'S', 'R', 'P', 'A', 'U', 'E', 'C'];
const FRAGMENT_FLAG_LETTERS: [char; 8] = ['*', '*', '*', '*', '*', 'M', 'D', 'R'];

pub(crate) fn tcp_flags_string(flags: u8) -> String {
    bit_pattern(flags, &TCP_FLAG_LETTERS)
}

/// One byte renders as `CEUAPRSF`. Two bytes (IPFIX) prefix the reserved
/// high byte as `*` per set bit.
pub fn decode_tcp_flags(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b {
        [] => text(""),
        [flags] => Ok(FlowValue::Text(tcp_flags_string(*flags))),
        [reserved, flags, ..] => {
            let mut result = bit_pattern(*reserved, &['*'; 8]);
            result.push_str(&tcp_flags_string(*flags));
            Ok(FlowValue::Text(result))
        }
    }
}

pub fn decode_fragment_flags(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let flags = first("fragment flags", b)?;
    Ok(FlowValue::Text(bit_pattern(flags, &FRAGMENT_FLAG_LETTERS)))
}

pub fn decode_ipv4_options(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let bytes: [u8; 4] = b.try_into().map_err(|_| unsupported("ipv4 options", b))?;
    Ok(FlowValue::Text(ipv4_option_names(u32::from_be_bytes(bytes))))
}

pub fn decode_sample_algo(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("sampling algorithm", b)? {
        1 => text("deterministic"),
        2 => text("random"),
        other => number(other),
    }
}

pub(crate) fn engine_type_name(v: u8) -> String {
    match v {
        0 => "RP".to_string(),
        1 => "VIP/linecard".to_string(),
        2 => "PFC/DFC".to_string(),
        other => other.to_string(),
    }
}

pub fn decode_engine_type(b: &[u8]) -> Result<FlowValue, DecodeError> {
    Ok(FlowValue::Text(engine_type_name(first("engine type", b)?)))
}

pub fn decode_mpls_type(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("mpls type", b)? {
        0 => text("unknown"),
        1 => text("TE-MIDPT"),
        2 => text("Pseudowire"),
        3 => text("VPN"),
        4 => text("BGP"),
        5 => text("LDP"),
        6 => text("Path computation element"),
        7 => text("OSPFv2"),
        8 => text("OSPFv3"),
        9 => text("IS-IS"),
        10 => text("BGP segment routing Prefix-SID"),
        other => number(other),
    }
}

pub fn decode_ip_version(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("ip version", b)? {
        4 => text("IPv4"),
        6 => text("IPv6"),
        other => number(other),
    }
}

pub fn decode_direction(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("direction", b)? {
        0 => text("ingress"),
        1 => text("egress"),
        other => number(other),
    }
}

pub fn decode_fwd_status(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("forwarding status", b)? >> 6 {
        0 => text("unknown"),
        1 => text("forwarded"),
        2 => text("dropped"),
        _ => text("consumed"),
    }
}

pub fn decode_fwd_reason(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let reason = match first("forwarding reason", b)? {
        0 | 64 | 128 | 192 => "unknown",
        65 => "fragmented",
        66 => "not fragmented",
        129 => "ACL deny",
        130 => "ACL drop",
        131 => "unroutable",
        132 => "adjacency",
        133 => "fragmentation and DF set",
        134 => "bad header checksum",
        135 => "bad total length",
        136 => "bad header length",
        137 => "bad TTL",
        138 => "policer",
        139 => "WRED",
        140 => "RPF",
        141 => "for us",
        142 => "bad output interface",
        143 => "hardware",
        193 => "terminate punt adjacency",
        194 => "terminate incomplete adjacency",
        195 => "terminate for us",
        14 => "",
        _ => "invalid",
    };
    text(reason)
}

pub fn decode_fw_event(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("firewall event", b)? {
        0 => text("ignore"),
        1 => text("flow created"),
        2 => text("flow deleted"),
        3 => text("flow denied"),
        4 => text("flow alert"),
        5 => text("flow update"),
        other => number(other),
    }
}

pub fn decode_flow_end_reason(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("flow end reason", b)? {
        0 => text("reserved"),
        1 => text("idle timeout"),
        2 => text("active timeout"),
        3 => text("end of flow"),
        4 => text("forced end"),
        5 => text("lack of resources"),
        _ => text("unassigned"),
    }
}

pub fn decode_biflow_direction(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("biflow direction", b)? {
        0 => text("arbitrary"),
        1 => text("initiator"),
        2 => text("reverse initiator"),
        3 => text("perimeter"),
        _ => text("unassigned"),
    }
}

pub fn decode_ops_point_type(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("observation point type", b)? {
        0 => text("invalid"),
        1 => text("physical port"),
        2 => text("port channel"),
        3 => text("vlan"),
        _ => text("unassigned"),
    }
}

/// Stability class lives in the low two bits of the second octet.
pub fn decode_anon_stability_class(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let class = b
        .get(1)
        .copied()
        .ok_or_else(|| unsupported("anonymization stability class", b))?;
    match class & 0x03 {
        1 => text("session"),
        2 => text("exporter-collector"),
        3 => text("stable"),
        _ => text("undefined"),
    }
}

pub fn decode_anon_flags(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let flags = first("anonymization flags", b)?;
    let mut result = Vec::new();
    if flags & (1 << 2) != 0 {
        result.push("PmA");
    }
    if flags & (1 << 3) != 0 {
        result.push("LOR");
    }
    Ok(FlowValue::Text(result.join(",")))
}

pub fn decode_anon_technique(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first_u16("anonymization technique", b)? {
        0 => text("undefined"),
        1 => text("none"),
        2 => text("precision degradation"),
        3 => text("binning"),
        4 => text("enumeration"),
        5 => text("permutation"),
        6 => text("structure permutation"),
        7 => text("reverse truncation"),
        8 => text("noise"),
        9 => text("offset"),
        _ => text("unassigned"),
    }
}

/// Some exporters send the textual form, others a single code byte.
pub fn decode_technology(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b {
        b"yes" | b"y" | b"1" => return text("yes"),
        b"no" | b"n" | b"2" => return text("no"),
        b"unassigned" | b"u" | b"0" => return text("unassigned"),
        _ => {}
    }
    match first("technology", b)? {
        0 => text("unassigned"),
        1 => text("yes"),
        2 => text("no"),
        _ => text("undefined"),
    }
}

pub fn decode_nat_type(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first_u16("nat type", b)? {
        0 => text("unknown"),
        1 => text("NAT44"),
        2 => text("NAT64"),
        3 => text("NAT46"),
        4 => text("IPv4 no NAT"),
        5 => text("NAT66"),
        6 => text("IPv6 no NAT"),
        _ => text("unassigned"),
    }
}

pub fn decode_selector_algorithm(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first_u16("selector algorithm", b)? {
        0 => text("reserved"),
        1 => text("systematic count-based sampling"),
        2 => text("systematic time-based sampling"),
        3 => text("random n-out-of-N sampling"),
        4 => text("uniform probabilistic sampling"),
        5 => text("property match filtering"),
        6 => text("hash based filtering using BOB"),
        7 => text("hash based filtering using IPSX"),
        8 => text("hash based filtering using CRC"),
        9 => text("flow-state dependent"),
        _ => text("unassigned"),
    }
}

pub fn decode_value_dist_method(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("value distribution method", b)? {
        0 => text("unspecified"),
        1 => text("start interval"),
        2 => text("end interval"),
        3 => text("mid interval"),
        4 => text("simple uniform distribution"),
        5 => text("proportional uniform distribution"),
        6 => text("simulated process"),
        7 => text("direct"),
        _ => text("unassigned"),
    }
}

pub fn decode_data_link_frame_type(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first_u16("data link frame type", b)? {
        0x0001 => text("IEEE802.3 ethernet"),
        0x0002 => text("IEEE802.11 MAC"),
        _ => text("unassigned"),
    }
}

pub fn decode_capture_time_semantics(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match first("capture time semantics", b)? {
        0 => text("undefined"),
        1 => text("begin"),
        2 => text("end"),
        3 => text("export"),
        4 => text("average"),
        _ => text("unassigned"),
    }
}
