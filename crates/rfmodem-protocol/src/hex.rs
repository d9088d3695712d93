//! Hex payload codec.
//!
//! Outbound payloads arrive on the serial line as hex strings and leave as
//! byte buffers; inbound packets go the other way. The decode side is
//! deliberately permissive about length: an odd-length string is not an
//! error, its final lone character is taken as the complete low-order
//! nibble of the final byte, so the byte count is always `ceil(len / 2)`.
//! Non-hex characters, however, are rejected outright.

use crate::error::HexError;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Decode a hex string into bytes, refusing payloads longer than `max_len`.
///
/// Digits are matched case-insensitively. The length check runs before any
/// digit is inspected so an oversized payload fails with
/// [`HexError::TooLong`] carrying both the offered and the allowed size.
pub fn decode_hex(s: &str, max_len: usize) -> Result<Vec<u8>, HexError> {
    let size = s.len().div_ceil(2);
    if size > max_len {
        return Err(HexError::TooLong { size, max: max_len });
    }

    let mut out = Vec::with_capacity(size);
    let mut chunks = s.as_bytes().chunks_exact(2);
    let mut position = 0;
    for pair in &mut chunks {
        let hi = nibble(pair[0], position)?;
        let lo = nibble(pair[1], position + 1)?;
        out.push(hi << 4 | lo);
        position += 2;
    }
    if let [last] = chunks.remainder() {
        out.push(nibble(*last, position)?);
    }
    Ok(out)
}

/// Encode bytes as uppercase hex, two digits per byte, no separators.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

fn nibble(byte: u8, position: usize) -> Result<u8, HexError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(HexError::InvalidDigit { position, byte }),
    }
}
