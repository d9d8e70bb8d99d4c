//! Verification-code extraction from decoded message content
//!
//! Three priority tiers: the subject with a tight keyword/code window,
//! then the body with progressively looser windows. Candidate digit
//! runs pass a false-positive filter that suppresses calendar years,
//! ZIP codes, and street numbers.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

/// Verification-related terms, English plus CJK/Korean
const KEYWORDS: &str = "(?:verification|one[-\\s]?time|two[-\\s]?factor|2fa|security|auth|login|confirm|code|otp|pin|验证码|校验码|驗證碼|確認碼|認證碼|認証コード|인증코드|코드)";

/// Separators tolerated between code digits: NBSP, whitespace, dashes,
/// underscore, period, middle dot, bullets, apostrophe variants
const SEP_CLASS: &str = r"[\x{00A0}\s\-–—_.·•∙‧'’‘]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Subject,
    Body,
}

struct Tier {
    scope: Scope,
    window: usize,
}

/// Priority order: subject first with a tight window, then the body
/// with progressively looser windows
const TIERS: [Tier; 3] = [
    Tier {
        scope: Scope::Subject,
        window: 20,
    },
    Tier {
        scope: Scope::Body,
        window: 30,
    },
    Tier {
        scope: Scope::Body,
        window: 80,
    },
];

static TIER_PATTERNS: LazyLock<Vec<(Scope, [Regex; 2])>> = LazyLock::new(|| {
    TIERS
        .iter()
        .map(|tier| (tier.scope, compile_directions(tier.window)))
        .collect()
});

static ADDRESS_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:street|st|avenue|ave|road|rd|address|zip|postal)\b").unwrap()
});

static STREET_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([0-9]+)\s+[a-z][a-z]+\s+(?:street|st|avenue|ave|road|rd)").unwrap()
});

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").unwrap());

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#([0-9]+);").unwrap());

static NAMED_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)&[a-z]+;").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Build both directional patterns for one window width.
///
/// The `regex` engine has no lookaround, so the digit-boundary
/// assertions are emulated: a code may not start or end inside a longer
/// digit run.
fn compile_directions(window: usize) -> [Regex; 2] {
    let code = format!("([0-9](?:{SEP_CLASS}?[0-9]){{3,7}})");
    let keyword_first = Regex::new(&format!(
        r"(?i){KEYWORDS}[^\n\r\d]{{0,{window}}}{code}(?:[^0-9]|$)"
    ))
    .unwrap();
    let code_first = Regex::new(&format!(
        r"(?i)(?:^|[^0-9]){code}[^\n\r\d]{{0,{window}}}{KEYWORDS}"
    ))
    .unwrap();
    [keyword_first, code_first]
}

/// Scan subject and body for a 4-8 digit verification code.
///
/// Body text is the plain text when non-empty, else the stripped HTML.
/// Returns the separator-stripped digits, or `None` when nothing
/// plausible is found -- a normal outcome, not an error.
#[must_use]
pub fn extract_verification_code(subject: &str, text: &str, html: &str) -> Option<String> {
    let stripped;
    let body = if text.is_empty() {
        stripped = strip_html(html);
        stripped.as_str()
    } else {
        text
    };

    for (tier, (scope, directions)) in TIER_PATTERNS.iter().enumerate() {
        let haystack = match scope {
            Scope::Subject => subject,
            Scope::Body => body,
        };
        if let Some(code) = try_directions(haystack, directions) {
            debug!("verification code found at tier {}", tier + 1);
            return Some(code);
        }
    }
    None
}

/// Try both directional patterns in order. Only the leftmost match of
/// each pattern is considered; a rejected candidate moves on to the
/// next pattern rather than the next occurrence.
fn try_directions(text: &str, directions: &[Regex; 2]) -> Option<String> {
    for pattern in directions {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let whole = caps.get(0)?;
        let digits = clean_digits(caps.get(1)?.as_str());

        let start = snap_to_char_boundary(text, whole.start().saturating_sub(50));
        let end = snap_to_char_boundary(text, (whole.end() + 50).min(text.len()));
        let context = &text[start..end];

        if !is_likely_non_code(&digits, context) {
            return Some(digits);
        }
    }
    None
}

fn clean_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Heuristics for digit runs that are statistically not codes
fn is_likely_non_code(digits: &str, context: &str) -> bool {
    // Calendar years masquerading as 4-digit codes
    if digits.len() == 4
        && let Ok(year) = digits.parse::<u32>()
        && (2000..=2099).contains(&year)
    {
        return true;
    }

    // US ZIP codes near address vocabulary
    if digits.len() == 5 && ADDRESS_CONTEXT.is_match(context) {
        return true;
    }

    // House numbers, e.g. "123 Main Street"
    STREET_NUMBER
        .captures_iter(context)
        .any(|caps| &caps[1] == digits)
}

/// Reduce HTML to plain text: drop script/style blocks, strip tags,
/// decode numeric and core named entities, collapse whitespace
#[must_use]
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, " ");
    let text = STYLE_BLOCK.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = NUMERIC_ENTITY.replace_all(&text, |caps: &Captures| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map_or_else(String::new, String::from)
    });
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");
    let text = NAMED_ENTITY.replace_all(&text, " ");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

/// Snap a byte index to the nearest valid UTF-8 char boundary (backwards)
const fn snap_to_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while !s.is_char_boundary(i) && i > 0 {
        i -= 1;
    }
    i
}
