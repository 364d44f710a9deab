//! Base64 and character set helpers.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use encoding_rs::{Encoding, UTF_8};

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Looks up a character set by label, defaulting to UTF-8 when absent.
///
/// # Errors
///
/// Returns an error for labels the WHATWG encoding standard does not know.
pub fn charset_encoding(charset: Option<&str>) -> Result<&'static Encoding> {
    match charset.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(UTF_8),
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::InvalidEncoding(format!("Unknown charset: {label}"))),
    }
}

/// Decodes bytes into text using the given charset.
///
/// # Errors
///
/// Returns an error if the charset is unknown or the bytes are malformed.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> Result<String> {
    let encoding = charset_encoding(charset)?;
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::InvalidEncoding(format!(
            "Body is not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Encodes text into bytes using the given charset.
///
/// # Errors
///
/// Returns an error if the charset is unknown or cannot represent the text.
pub fn encode_text(text: &str, charset: Option<&str>) -> Result<Vec<u8>> {
    let encoding = charset_encoding(charset)?;
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(Error::InvalidEncoding(format!(
            "Text not representable in {}",
            encoding.name()
        )));
    }
    Ok(bytes.into_owned())
}
