//! Decoding of on-chain `vector<u8>` fields (hex strings) into text

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HexTextError {
    #[error("missing 0x prefix")]
    MissingPrefix,
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn strip_marker(value: &str) -> Option<&str> {
    value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))
}

/// Decode a `0x`-prefixed hex string into the UTF-8 text it encodes
pub fn decode_hex_text(value: &str) -> Result<String, HexTextError> {
    let payload = strip_marker(value).ok_or(HexTextError::MissingPrefix)?;
    let bytes = hex::decode(payload)?;
    Ok(String::from_utf8(bytes)?)
}

/// Decode for display; never fails.
///
/// Invalid UTF-8 sequences become U+FFFD. A value that is not hex at all is
/// shown as-is rather than dropped.
pub fn decode_hex_text_lossy(value: &str) -> String {
    let Some(payload) = strip_marker(value) else {
        return value.to_string();
    };
    match hex::decode(payload) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Inverse of [`decode_hex_text`]; used to build fixtures and export raw fields
pub fn encode_hex_text(text: &str) -> String {
    format!("0x{}", hex::encode(text.as_bytes()))
}
