//! Reversible obfuscation applied to secret values before they hit disk.
//!
//! This is plain base64: it hides values from casual viewing, nothing more.
//! It is deliberately not encryption: existing property files carry base64
//! values, and upgrading the transform would break them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::PropfillError;

/// Encode a plaintext value into its on-disk form.
pub fn encode(plaintext: &str) -> String {
    STANDARD.encode(plaintext.as_bytes())
}

/// Decode an on-disk value back to plaintext.
/// Fails if the input is not valid base64, or if the decoded bytes are not UTF-8.
pub fn decode(encoded: &str) -> Result<String, PropfillError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| PropfillError::Decode(format!("not valid base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| PropfillError::Decode("decoded bytes are not valid UTF-8".into()))
}
