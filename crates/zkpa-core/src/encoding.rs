//! # Hex and Circuit Literal Encoding
//!
//! Helpers shared by every crate that parses provisioned key material or
//! renders witness values for the proving toolchain.

use crate::error::AttestError;

/// Strip surrounding whitespace and an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string into exactly `N` bytes.
pub fn hex_to_array<const N: usize>(s: &str) -> Result<[u8; N], AttestError> {
    let bytes = hex::decode(strip_hex_prefix(s))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| AttestError::Hex(format!("expected {N} bytes, got {len}")))
}

/// Decode a big-endian hex string of at most `N` bytes, left-padding with
/// zeros. Odd-length input is accepted (a leading zero nibble is implied).
pub fn hex_to_padded_array<const N: usize>(s: &str) -> Result<[u8; N], AttestError> {
    let digits = strip_hex_prefix(s);
    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))?
    } else {
        hex::decode(digits)?
    };
    if bytes.len() > N {
        return Err(AttestError::Hex(format!(
            "expected at most {N} bytes, got {}",
            bytes.len()
        )));
    }
    let mut out = [0u8; N];
    out[N - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// Render bytes as an uppercase circuit byte-array literal: `[0x0A, 0xFF]`.
pub fn noir_byte_array(bytes: &[u8]) -> String {
    let items: Vec<String> = bytes.iter().map(|b| format!("0x{b:02X}")).collect();
    format!("[{}]", items.join(", "))
}

/// First four bytes as hex, for redacted `Debug` output.
pub fn hex_prefix(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(4)])
}
