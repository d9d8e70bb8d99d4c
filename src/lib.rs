// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Lenient MIME Email Decoder
//!
//! Turns raw RFC 5322 messages into structured records and runs a
//! best-effort, tiered heuristic over the decoded content to find
//! one-time verification codes.
//!
//! The decoder is total: malformed, truncated, or adversarial input
//! degrades to a partially-populated record instead of an error.
//!
//! # Features
//!
//! - Recursive multipart walking with bounded nesting depth
//! - Base64 and quoted-printable transfer decoding
//! - Charset handling for any `encoding_rs` label
//! - RFC 2047 encoded-word header decoding
//! - Byte-identical attachment content for byte-identical input
//! - Three-tier verification-code extraction with false-positive
//!   suppression (years, ZIP codes, street numbers)
//!
//! # Example
//!
//! ```rust
//! use mailcode::{extract_verification_code, parse_email};
//!
//! let raw = "From: noreply@example.com\r\n\
//!            Subject: Your code is 482913\r\n\
//!            \r\n\
//!            Use code 482913 to sign in.";
//! let email = parse_email(raw);
//!
//! assert_eq!(email.from, "noreply@example.com");
//! let code = extract_verification_code(&email.subject, &email.text, &email.html);
//! assert_eq!(code.as_deref(), Some("482913"));
//! ```

mod content;
mod error;
mod headers;
mod parser;
mod types;
mod verification;

pub use content::{DecodedContent, decode_content};
pub use error::{DecodeError, Result};
pub use headers::{HeaderMap, decode_header_value, parse_header_block};
pub use parser::parse_email;
pub use types::{Attachment, ParsedEmail};
pub use verification::{extract_verification_code, strip_html};
