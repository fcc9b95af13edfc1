//! Base64 decoding utilities
//!
//! Whole-body subscription decoding and the per-link decoding used by the
//! VMess and Shadowsocks decoders. Only the standard alphabet with padding is
//! accepted. Line breaks embedded in the input are skipped; any other
//! character outside the alphabet fails the decode.

use anyhow::{Context, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::{debug, trace};

/// Standard alphabet with required padding. Non-zero trailing bits in the
/// last symbol are tolerated, as many subscription encoders emit them.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical)
        .with_decode_allow_trailing_bits(true),
);

// ============================================================================
// Base64 Decoding
// ============================================================================

/// Decodes standard-alphabet Base64, ignoring `\r` and `\n`
pub fn decode_base64(content: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = content
        .iter()
        .copied()
        .filter(|b| *b != b'\r' && *b != b'\n')
        .collect();
    trace!(
        "Attempting Base64 decode, cleaned length: {} bytes",
        cleaned.len()
    );

    LENIENT_STANDARD
        .decode(&cleaned)
        .context("Failed to decode Base64 content")
}

/// Decodes Base64 text into a UTF-8 string
pub fn decode_base64_str(content: &str) -> Result<String> {
    let decoded = decode_base64(content.as_bytes())?;
    String::from_utf8(decoded).context("Decoded Base64 content is not valid UTF-8")
}

// ============================================================================
// Body Normalization
// ============================================================================

/// Turns a fetched subscription body into candidate link lines
///
/// The whole body is tried as Base64 first and the original bytes are used
/// when that fails. There is no content check: a body that happens to be
/// valid Base64 is decoded even if it was plain text. Lines are trimmed, and
/// blank lines and `#` comments are dropped.
pub fn normalize_body(body: &[u8]) -> Vec<String> {
    let source = match decode_base64(body) {
        Ok(decoded) => {
            debug!(
                "Subscription body is Base64 encoded ({} -> {} bytes)",
                body.len(),
                decoded.len()
            );
            decoded
        }
        Err(_) => {
            debug!("Subscription body is not Base64, using raw content");
            body.to_vec()
        }
    };

    String::from_utf8_lossy(&source)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
