//! Regex-based PII redaction for blind scoring.
//!
//! Patterns run in declaration order; each match is replaced by a typed
//! placeholder so the redacted text stays readable.

use std::sync::LazyLock;

use regex::Regex;

use crate::services::PiiRedactor;

struct PiiPattern {
    name: &'static str,
    regex: &'static LazyLock<Option<Regex>>,
    replacement: &'static str,
}

macro_rules! pii_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

pii_pattern!(
    RE_EMAIL,
    r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}"
);

pii_pattern!(
    RE_PHONE,
    r"(?:\+\d{1,3}[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b"
);

pii_pattern!(
    RE_ADDRESS,
    r"\b\d{1,5}\s+(?:[A-Z][a-z]+\s?){1,4}(?:St|Street|Ave|Avenue|Blvd|Boulevard|Dr|Drive|Ln|Lane|Rd|Road|Ct|Court|Pl|Place|Way)\b"
);

// "Name: Jane Doe" header lines; the label is kept, the value is replaced.
pii_pattern!(
    RE_NAME_HEADER,
    r"(?im)^(\s*(?:full\s+)?name\s*:\s*)[^\r\n]*?[^\s\r\n][^\r\n]*$"
);

static PATTERNS: &[PiiPattern] = &[
    PiiPattern {
        name: "email",
        regex: &RE_EMAIL,
        replacement: "<EMAIL_ADDRESS>",
    },
    PiiPattern {
        name: "phone",
        regex: &RE_PHONE,
        replacement: "<PHONE_NUMBER>",
    },
    PiiPattern {
        name: "address",
        regex: &RE_ADDRESS,
        replacement: "<LOCATION>",
    },
    PiiPattern {
        name: "name_header",
        regex: &RE_NAME_HEADER,
        replacement: "${1}<PERSON>",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RegexPiiRedactor;

impl PiiRedactor for RegexPiiRedactor {
    fn redact(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for pattern in PATTERNS {
            let Some(re) = pattern.regex.as_ref() else {
                tracing::warn!(pattern = pattern.name, "PII pattern failed to compile; skipping");
                continue;
            };
            redacted = re.replace_all(&redacted, pattern.replacement).into_owned();
        }
        redacted
    }
}
