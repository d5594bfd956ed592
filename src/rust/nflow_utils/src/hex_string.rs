use log::error;
use std::fmt::Write;
use thiserror::Error;

/// `to_hex_string` renders a byte slice in C-friendly Hex format
/// (e.g. `0x0a0b`). An empty slice renders as an empty string.
///
/// ## Example
///
/// ```rust
/// use nflow_utils::hex_string::to_hex_string;
/// assert_eq!(to_hex_string(&[0x0a, 0xff]), "0x0aff");
/// ```
pub fn to_hex_string(bytes: &[u8]) -> String {
  if bytes.is_empty() {
    return String::new();
  }
  let mut result = String::with_capacity(2 + bytes.len() * 2);
  result.push_str("0x");
  push_hex(&mut result, bytes);
  result
}

/// `hex_preview` renders at most `max_bytes` of a payload as plain
/// hex, followed by the total length. Used to keep log lines about
/// dropped or malformed packets short.
///
/// ## Example
///
/// ```rust
/// use nflow_utils::hex_string::hex_preview;
/// assert_eq!(hex_preview(&[0, 9, 0, 1], 2), "0009... (4 bytes)");
/// ```
pub fn hex_preview(bytes: &[u8], max_bytes: usize) -> String {
  let shown = bytes.len().min(max_bytes);
  let mut result = String::with_capacity(shown * 2 + 16);
  push_hex(&mut result, &bytes[..shown]);
  if shown < bytes.len() {
    result.push_str("...");
  }
  let _ = write!(result, " ({} bytes)", bytes.len());
  result
}

fn push_hex(target: &mut String, bytes: &[u8]) {
  for b in bytes {
    let _ = write!(target, "{b:02x}");
  }
}

/// `read_hex_string` converts a string from C-friendly Hex format
/// (e.g. `0xC12`) into a hexadecimal `u32`.
///
/// ## Parameters
///
/// * `s`: the string to attempt to parse.
///
/// ## Returns
///
/// Either a converted `u32` or a `HexParseError`.
///
/// ## Example
///
/// ```rust
/// use nflow_utils::hex_string::read_hex_string;
/// assert_eq!(read_hex_string("0x12AD").unwrap(), 4781);
/// ```
pub fn read_hex_string(s: &str) -> Result<u32, HexParseError> {
  if s.is_empty() {
    return Ok(0);
  }
  let trimmed = s.trim_start_matches("0x").trim_start_matches("0X");
  match u32::from_str_radix(trimmed, 16) {
    Ok(data) => Ok(data),
    Err(e) => {
      error!("Unable to convert {s} to a u32");
      error!("{:?}", e);
      Err(HexParseError::ParseError)
    }
  }
}

/// `HexParseError` is an error type defining what can go wrong
/// parsing a string into a `u32` hex number.
#[derive(Error, Debug)]
pub enum HexParseError {
  /// The hex string could not be decoded
  #[error("Unable to decode string into valid hex")]
  ParseError,
}
