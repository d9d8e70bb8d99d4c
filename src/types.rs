//! Core output types for decoded messages

use serde::{Deserialize, Serialize};

/// A decoded email record.
///
/// Always populated as far as the input allows; fields the message does
/// not provide keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEmail {
    /// Sender address (angle-bracket form preferred over the raw value)
    pub from: String,

    /// Recipient addresses in header order
    pub to: Vec<String>,

    /// Decoded subject, `"(No Subject)"` when the header is absent
    pub subject: String,

    /// Last `text/plain` part seen during the walk
    pub text: String,

    /// Last `text/html` part seen during the walk
    pub html: String,

    /// Non-body parts in walk order
    pub attachments: Vec<Attachment>,
}

impl Default for ParsedEmail {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: Vec::new(),
            subject: "(No Subject)".to_string(),
            text: String::new(),
            html: String::new(),
            attachments: Vec::new(),
        }
    }
}

impl ParsedEmail {
    #[must_use]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Check whether the message carried any displayable body
    #[must_use]
    pub fn body_is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.html.trim().is_empty()
    }
}

/// A non-body MIME part extracted from the message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Decoded filename, `"attachment"` when undeterminable
    pub filename: String,

    /// Media type only, parameters stripped
    pub content_type: String,

    /// Decoded bytes; byte-identical for byte-identical encoded input
    pub content: Vec<u8>,
}
