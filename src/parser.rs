//! Message assembly: header/body split, multipart walking, and part
//! classification

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::content::{DecodedContent, boundary_param, decode_content};
use crate::headers::{decode_header_value, parse_header_block};
use crate::types::{Attachment, ParsedEmail};

/// Nested multipart parts deeper than this are ignored. Depth is
/// otherwise bounded only by the input, which an adversarial message
/// could use to exhaust the stack.
const MAX_MULTIPART_DEPTH: usize = 16;

/// Total decoded attachment bytes retained per message
const MAX_ATTACHMENT_BYTES: usize = 32 * 1024 * 1024;

static ANGLE_ADDR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]+)>").unwrap());

static BARE_ADDR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\s<>]+@[^\s<>]+").unwrap());

static FILENAME_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename=["']?([^"';\r\n]+)"#).unwrap());

/// Parse a raw RFC 5322 message into a [`ParsedEmail`].
///
/// Total and lenient: malformed or partial MIME structure never fails,
/// it degrades to a partially-populated record. Input without a
/// header/body divider is treated as all headers with an empty body.
#[must_use]
pub fn parse_email(raw: &str) -> ParsedEmail {
    let (header_block, body) = split_on_divider(raw).unwrap_or((raw, ""));
    let headers = parse_header_block(header_block);

    let mut email = ParsedEmail {
        from: headers.get("from").map(extract_address).unwrap_or_default(),
        to: headers.get("to").map(extract_address_list).unwrap_or_default(),
        subject: headers.get_or("subject", "(No Subject)").to_string(),
        ..ParsedEmail::default()
    };

    let content_type = headers.get_or("content-type", "text/plain");
    let transfer_encoding = headers.get_or("content-transfer-encoding", "");

    if content_type.contains("multipart/") {
        if let Some(boundary) = boundary_param(content_type) {
            let mut walker = Walker {
                email: &mut email,
                attachment_bytes: 0,
            };
            walker.walk(body, &boundary, 0);
        }
    } else {
        // Single-part bodies always decode to text
        let decoded = decode_content(body, transfer_encoding, content_type).into_text();
        if content_type.contains("text/html") {
            email.html = decoded;
        } else {
            email.text = decoded;
        }
    }

    debug!(
        "decoded email: subject={:?}, text={}B, html={}B, {} attachment(s)",
        email.subject,
        email.text.len(),
        email.html.len(),
        email.attachments.len()
    );
    email
}

/// Locate the header/body divider: CRLFCRLF if present, else LFLF
fn split_on_divider(raw: &str) -> Option<(&str, &str)> {
    if let Some(idx) = raw.find("\r\n\r\n") {
        return Some((&raw[..idx], &raw[idx + 4..]));
    }
    raw.find("\n\n").map(|idx| (&raw[..idx], &raw[idx + 2..]))
}

/// Pull a bare address out of a header value: the `<...>` angle form if
/// present, else the first `user@host` token, else the raw value
fn extract_address(value: &str) -> String {
    ANGLE_ADDR
        .captures(value)
        .map(|caps| caps[1].to_string())
        .or_else(|| BARE_ADDR.find(value).map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| value.to_string())
}

fn extract_address_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(extract_address)
        .collect()
}

/// Recursive descent over borrowed slices of the message body. The
/// sink fields of [`ParsedEmail`] are overwritten as parts are seen, so
/// the last part of a kind wins.
struct Walker<'a> {
    email: &'a mut ParsedEmail,
    attachment_bytes: usize,
}

impl Walker<'_> {
    fn walk(&mut self, body: &str, boundary: &str, depth: usize) {
        if depth >= MAX_MULTIPART_DEPTH {
            warn!("multipart nesting deeper than {MAX_MULTIPART_DEPTH}, ignoring subtree");
            return;
        }

        let marker = format!("--{boundary}");
        for segment in body.split(marker.as_str()) {
            let segment = segment.trim();
            // Skip the preamble, blank runs, and the closing marker
            if segment.is_empty() || segment == "--" {
                continue;
            }
            self.part(segment, depth);
        }
    }

    fn part(&mut self, segment: &str, depth: usize) {
        // Segments without a header/body divider carry nothing usable
        let Some((header_block, body)) = split_on_divider(segment) else {
            return;
        };
        let headers = parse_header_block(header_block);

        let content_type = headers.get_or("content-type", "text/plain");
        let transfer_encoding = headers.get_or("content-transfer-encoding", "");
        let disposition = headers.get_or("content-disposition", "");

        // The only recursion path
        if content_type.contains("multipart/") {
            if let Some(boundary) = boundary_param(content_type) {
                self.walk(body, &boundary, depth + 1);
            }
            return;
        }

        let inline_text = content_type.starts_with("text/");
        let decoded = decode_content(body, transfer_encoding, content_type);

        let declared_attachment = disposition.contains("attachment")
            || (disposition.contains("filename") && !inline_text);

        if declared_attachment || (!inline_text && decoded.is_binary()) {
            self.push_attachment(disposition, content_type, decoded);
        } else if content_type.contains("text/html") {
            self.email.html = decoded.into_text();
        } else if content_type.contains("text/plain") {
            self.email.text = decoded.into_text();
        }
        // Anything else is discarded
    }

    fn push_attachment(&mut self, disposition: &str, content_type: &str, decoded: DecodedContent) {
        let content = decoded.into_bytes();
        if self.attachment_bytes + content.len() > MAX_ATTACHMENT_BYTES {
            warn!(
                "attachment budget exceeded, dropping {}-byte part",
                content.len()
            );
            return;
        }
        self.attachment_bytes += content.len();

        let filename = FILENAME_PARAM.captures(disposition).map_or_else(
            || "attachment".to_string(),
            |caps| decode_header_value(caps[1].trim()),
        );
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_string();

        self.email.attachments.push(Attachment {
            filename,
            content_type: media_type,
            content,
        });
    }
}
