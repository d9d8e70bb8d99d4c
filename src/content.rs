//! Transfer-encoding and charset decoding for body segments

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

use crate::error::Result;

static CHARSET_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset=["']?([^"';\s]+)"#).unwrap());

static BOUNDARY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)boundary=["']?([^"';\s]+)"#).unwrap());

/// Best-effort result of decoding one body segment: text in the
/// declared charset, or the raw bytes of a binary part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedContent {
    Text(String),
    Binary(Vec<u8>),
}

impl DecodedContent {
    /// Force a text view; binary falls back to lossy UTF-8
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Binary(bytes) => UTF_8.decode(&bytes).0.into_owned(),
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// Extract the `charset=` parameter from a content-type, default `utf-8`
#[must_use]
pub(crate) fn charset_param(content_type: &str) -> String {
    CHARSET_PARAM
        .captures(content_type)
        .map_or_else(|| "utf-8".to_string(), |caps| caps[1].to_ascii_lowercase())
}

/// Extract the `boundary=` parameter from a content-type
#[must_use]
pub(crate) fn boundary_param(content_type: &str) -> Option<String> {
    BOUNDARY_PARAM
        .captures(content_type)
        .map(|caps| caps[1].to_string())
}

/// Decode a body segment under its declared transfer encoding.
///
/// Unrecognized or absent encodings (7bit, 8bit, ...) pass the body
/// through unchanged. An undecodable base64 payload falls back to the
/// original text rather than failing.
#[must_use]
pub fn decode_content(body: &str, transfer_encoding: &str, content_type: &str) -> DecodedContent {
    let charset = charset_param(content_type);
    let is_text = content_type.starts_with("text/");

    match transfer_encoding.to_ascii_lowercase().as_str() {
        "base64" => match decode_base64(body) {
            Ok(bytes) if is_text => DecodedContent::Text(decode_charset(&bytes, &charset)),
            Ok(bytes) => DecodedContent::Binary(bytes),
            Err(err) => {
                debug!("undecodable base64 body, keeping verbatim: {err}");
                DecodedContent::Text(body.to_string())
            }
        },
        "quoted-printable" => {
            let bytes = decode_quoted_printable(body);
            if is_text {
                DecodedContent::Text(decode_charset(&bytes, &charset))
            } else {
                DecodedContent::Binary(bytes)
            }
        }
        _ => DecodedContent::Text(body.to_string()),
    }
}

/// Base64-decode a body, tolerating folded lines and stray whitespace
pub(crate) fn decode_base64(body: &str) -> Result<Vec<u8>> {
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64.decode(compact).map_err(Into::into)
}

/// Quoted-printable decode to raw bytes.
///
/// Soft line breaks (`=` before a line terminator) are removed, `=XX`
/// hex escapes become the corresponding byte, and invalid escapes are
/// kept verbatim. The caller decides the charset.
#[must_use]
pub(crate) fn decode_quoted_printable(body: &str) -> Vec<u8> {
    let cleaned = body.replace("=\r\n", "").replace("=\n", "");
    let bytes = cleaned.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'='
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2]))
        {
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

fn decode_charset(bytes: &[u8], charset: &str) -> String {
    // Unknown labels degrade to UTF-8 rather than failing the part
    let encoding = Encoding::for_label(charset.as_bytes()).unwrap_or(UTF_8);
    encoding.decode(bytes).0.into_owned()
}

const fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
