//! Header block parsing and RFC 2047 encoded-word decoding

use std::collections::HashMap;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use encoding_rs::Encoding;
use regex::{Captures, Regex};

use crate::content::decode_quoted_printable;
use crate::error::{DecodeError, Result};

static ENCODED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)=\?([^?]+)\?([bq])\?([^?]*)\?=").unwrap());

/// Case-insensitive header name → decoded value map.
///
/// A repeated header name overwrites the earlier value, so the last
/// occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: String) {
        self.inner.insert(name.to_ascii_lowercase(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Look up a header, falling back to `default` when absent
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Decode RFC 2047 encoded-word runs embedded in a header value.
///
/// Tokens that fail to decode (bad base64, unknown charset label) are
/// left verbatim, so this is total and never fails for the caller.
#[must_use]
pub fn decode_header_value(value: &str) -> String {
    ENCODED_WORD
        .replace_all(value, |caps: &Captures| {
            decode_encoded_word(&caps[1], &caps[2], &caps[3])
                .unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

fn decode_encoded_word(charset: &str, encoding: &str, payload: &str) -> Result<String> {
    let bytes = if encoding.eq_ignore_ascii_case("b") {
        BASE64.decode(payload)?
    } else {
        // Q encoding is quoted-printable with `_` standing for space
        decode_quoted_printable(&payload.replace('_', " "))
    };

    let encoding = Encoding::for_label(charset.as_bytes())
        .ok_or_else(|| DecodeError::UnknownCharset(charset.to_string()))?;
    Ok(encoding.decode(&bytes).0.into_owned())
}

/// Parse a raw header block into a [`HeaderMap`].
///
/// Lines are split on CRLF or LF. A line starting with whitespace is a
/// folded continuation of the previous header; its trimmed content is
/// appended space-joined. Values pass through [`decode_header_value`].
/// Colon-less lines with no header pending are ignored.
#[must_use]
pub fn parse_header_block(block: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut pending: Option<(String, String)> = None;

    for raw_line in block.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = pending.as_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((name, value)) = pending.take() {
            headers.insert(&name, decode_header_value(&value));
        }
        if let Some(idx) = line.find(':')
            && idx > 0
        {
            pending = Some((
                line[..idx].trim().to_string(),
                line[idx + 1..].trim().to_string(),
            ));
        }
    }

    if let Some((name, value)) = pending.take() {
        headers.insert(&name, decode_header_value(&value));
    }
    headers
}
