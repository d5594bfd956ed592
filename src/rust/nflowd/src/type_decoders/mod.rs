//! Conversion of raw field bytes into typed values.
//!
//! Every decoder is a plain function over the bytes of one field, of the
//! length the template declared. Decoders never index past the slice they
//! are given: a slice that is too short for the encoding yields a
//! `DecodeError` and the caller drops that single field.

mod enumerations;
mod protocol_names;

pub use enumerations::*;
pub(crate) use protocol_names::l4_protocol_name;

use nflow_config::DecodeKind;
use nflow_utils::hex_string::to_hex_string;
use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// A decoded field value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlowValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FlowValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FlowValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlowValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FlowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowValue::Unsigned(v) => write!(f, "{v}"),
            FlowValue::Signed(v) => write!(f, "{v}"),
            FlowValue::Float(v) => write!(f, "{v}"),
            FlowValue::Bool(v) => write!(f, "{v}"),
            FlowValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for FlowValue {
    fn from(value: &str) -> Self {
        FlowValue::Text(value.to_string())
    }
}

impl From<String> for FlowValue {
    fn from(value: String) -> Self {
        FlowValue::Text(value)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported field length {length} for {kind} value")]
    UnsupportedLength { kind: &'static str, length: usize },
}

/// Signature shared by every field decoder.
pub type DecodeFn = fn(&[u8]) -> Result<FlowValue, DecodeError>;

pub(crate) fn unsupported(kind: &'static str, b: &[u8]) -> DecodeError {
    DecodeError::UnsupportedLength {
        kind,
        length: b.len(),
    }
}

/// Unsigned integer of 0, 1, 2, 4 or 8 bytes. An empty field reads as 0.
pub fn decode_uint(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let v = match b.len() {
        0 => 0,
        1 => b[0] as u64,
        2 => u16::from_be_bytes([b[0], b[1]]) as u64,
        4 => u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as u64,
        8 => u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        _ => return Err(unsupported("uint", b)),
    };
    Ok(FlowValue::Unsigned(v))
}

/// Signed integer of 0, 1, 2, 4 or 8 bytes.
pub fn decode_int(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let v = match b.len() {
        0 => 0,
        1 => b[0] as i8 as i64,
        2 => i16::from_be_bytes([b[0], b[1]]) as i64,
        4 => i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as i64,
        8 => i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        _ => return Err(unsupported("int", b)),
    };
    Ok(FlowValue::Signed(v))
}

pub fn decode_float32(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b {
        [a, b, c, d] => Ok(FlowValue::Float(f32::from_be_bytes([*a, *b, *c, *d]) as f64)),
        _ => Err(unsupported("float32", b)),
    }
}

pub fn decode_float64(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let bytes: [u8; 8] = b.try_into().map_err(|_| unsupported("float64", b))?;
    Ok(FlowValue::Float(f64::from_be_bytes(bytes)))
}

/// IEEE float of either width, used for operator-defined fields.
pub fn decode_float(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b.len() {
        4 => decode_float32(b),
        8 => decode_float64(b),
        _ => Err(unsupported("float", b)),
    }
}

/// RFC 5101 section 6.1.5 booleans: 1 is true, 2 is false. Anything else
/// is passed through as a number.
pub fn decode_bool(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b.first() {
        Some(1) => Ok(FlowValue::Bool(true)),
        Some(2) => Ok(FlowValue::Bool(false)),
        Some(v) => Ok(FlowValue::Unsigned(*v as u64)),
        None => Err(unsupported("bool", b)),
    }
}

pub fn decode_hex(b: &[u8]) -> Result<FlowValue, DecodeError> {
    Ok(FlowValue::Text(to_hex_string(b)))
}

/// Text with trailing NUL padding removed.
pub fn decode_string(b: &[u8]) -> Result<FlowValue, DecodeError> {
    let end = b.iter().rposition(|c| *c != 0).map(|i| i + 1).unwrap_or(0);
    Ok(FlowValue::Text(String::from_utf8_lossy(&b[..end]).into_owned()))
}

pub fn decode_mac(b: &[u8]) -> Result<FlowValue, DecodeError> {
    if b.is_empty() {
        return Ok(FlowValue::Text(String::new()));
    }
    let parts: Vec<String> = b.iter().map(|octet| format!("{octet:02x}")).collect();
    Ok(FlowValue::Text(parts.join(":")))
}

/// IPv4 (4 bytes) or IPv6 (16 bytes) address in textual form.
pub fn decode_ip(b: &[u8]) -> Result<FlowValue, DecodeError> {
    if let Ok(octets) = <[u8; 4]>::try_from(b) {
        return Ok(FlowValue::Text(Ipv4Addr::from(octets).to_string()));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(b) {
        return Ok(FlowValue::Text(Ipv6Addr::from(octets).to_string()));
    }
    Err(unsupported("ip", b))
}

/// Layer 4 protocol number translated to its IANA keyword.
pub fn decode_l4_proto(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b.first() {
        Some(id) => Ok(FlowValue::Text(l4_protocol_name(*id))),
        None => Err(unsupported("protocol", b)),
    }
}

/// First octet of a packed field, e.g. the ICMP type of a type/code pair.
pub fn decode_first_byte(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b.first() {
        Some(v) => Ok(FlowValue::Unsigned(*v as u64)),
        None => Err(unsupported("byte 0", b)),
    }
}

/// Second octet of a packed field, e.g. the ICMP code of a type/code pair.
pub fn decode_second_byte(b: &[u8]) -> Result<FlowValue, DecodeError> {
    match b.get(1) {
        Some(v) => Ok(FlowValue::Unsigned(*v as u64)),
        None => Err(unsupported("byte 1", b)),
    }
}

/// Decoder for an operator-configured field kind.
pub fn decoder_for_kind(kind: DecodeKind) -> DecodeFn {
    match kind {
        DecodeKind::Uint => decode_uint,
        DecodeKind::Int => decode_int,
        DecodeKind::Float => decode_float,
        DecodeKind::Bool => decode_bool,
        DecodeKind::Hex => decode_hex,
        DecodeKind::String => decode_string,
        DecodeKind::Ip => decode_ip,
        DecodeKind::Mac => decode_mac,
        DecodeKind::Proto => decode_l4_proto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_widths() {
        assert_eq!(decode_uint(&[]).unwrap(), FlowValue::Unsigned(0));
        assert_eq!(decode_uint(&[0x2a]).unwrap(), FlowValue::Unsigned(42));
        assert_eq!(decode_uint(&[0x01, 0x00]).unwrap(), FlowValue::Unsigned(256));
        assert_eq!(
            decode_uint(&[0xff, 0xff, 0xff, 0xff]).unwrap(),
            FlowValue::Unsigned(u32::MAX as u64)
        );
        assert_eq!(
            decode_uint(&[0, 0, 0, 1, 0, 0, 0, 0]).unwrap(),
            FlowValue::Unsigned(1 << 32)
        );
    }

    #[test]
    fn uint_rejects_odd_lengths() {
        assert_eq!(
            decode_uint(&[1, 2, 3]),
            Err(DecodeError::UnsupportedLength {
                kind: "uint",
                length: 3
            })
        );
        assert!(decode_uint(&[0; 16]).is_err());
    }

    #[test]
    fn int_sign_extends() {
        assert_eq!(decode_int(&[0xff]).unwrap(), FlowValue::Signed(-1));
        assert_eq!(decode_int(&[0xff, 0xfe]).unwrap(), FlowValue::Signed(-2));
        assert!(decode_int(&[0; 5]).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(
            decode_float64(&0.25f64.to_be_bytes()).unwrap(),
            FlowValue::Float(0.25)
        );
        assert_eq!(
            decode_float(&1.5f32.to_be_bytes()).unwrap(),
            FlowValue::Float(1.5)
        );
        assert!(decode_float64(&[0; 4]).is_err());
    }

    #[test]
    fn bools_follow_rfc5101() {
        assert_eq!(decode_bool(&[1]).unwrap(), FlowValue::Bool(true));
        assert_eq!(decode_bool(&[2]).unwrap(), FlowValue::Bool(false));
        assert_eq!(decode_bool(&[7]).unwrap(), FlowValue::Unsigned(7));
        assert!(decode_bool(&[]).is_err());
    }

    #[test]
    fn hex_and_strings() {
        assert_eq!(decode_hex(&[0x0a, 0x0b]).unwrap(), FlowValue::from("0x0a0b"));
        assert_eq!(decode_hex(&[]).unwrap(), FlowValue::from(""));
        assert_eq!(decode_string(b"eth0\0\0\0").unwrap(), FlowValue::from("eth0"));
        assert_eq!(decode_string(&[0, 0]).unwrap(), FlowValue::from(""));
    }

    #[test]
    fn addresses() {
        assert_eq!(decode_ip(&[10, 0, 0, 1]).unwrap(), FlowValue::from("10.0.0.1"));
        let mut v6 = [0u8; 16];
        v6[0] = 0x20;
        v6[1] = 0x01;
        v6[15] = 1;
        assert_eq!(decode_ip(&v6).unwrap(), FlowValue::from("2001::1"));
        assert!(decode_ip(&[1, 2, 3]).is_err());
        assert_eq!(
            decode_mac(&[0x00, 0x1b, 0x21, 0xab, 0xcd, 0xef]).unwrap(),
            FlowValue::from("00:1b:21:ab:cd:ef")
        );
    }

    #[test]
    fn packed_bytes() {
        assert_eq!(decode_first_byte(&[3, 1]).unwrap(), FlowValue::Unsigned(3));
        assert_eq!(decode_second_byte(&[3, 1]).unwrap(), FlowValue::Unsigned(1));
        assert!(decode_second_byte(&[3]).is_err());
    }

    #[test]
    fn protocol_names() {
        assert_eq!(decode_l4_proto(&[6]).unwrap(), FlowValue::from("tcp"));
        assert_eq!(decode_l4_proto(&[17]).unwrap(), FlowValue::from("udp"));
        assert_eq!(decode_l4_proto(&[253]).unwrap(), FlowValue::from("253"));
    }

    #[test]
    fn configured_kinds() {
        let decode = decoder_for_kind(DecodeKind::Ip);
        assert_eq!(decode(&[192, 0, 2, 1]).unwrap(), FlowValue::from("192.0.2.1"));
        let decode = decoder_for_kind(DecodeKind::Proto);
        assert_eq!(decode(&[1]).unwrap(), FlowValue::from("icmp"));
    }
}
