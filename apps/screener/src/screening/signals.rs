//! Text signal extraction — years of experience, profile handles, and the
//! normalized token set of a résumé.
//!
//! Every pattern is first-match-wins. A missing match is a fallback, not an error.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static RE_YEARS_EXP: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)\s*(?:of\s*)?experience").ok()
});

static RE_GITHUB: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"github\.com/([\w-]+)").ok());

static RE_LINKEDIN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/in/([\w-]+)").ok());

static RE_WALLET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b0x[0-9a-fA-F]{40}\b").ok());

/// External profiles found in a résumé.
///
/// `github` is a bare username used for further lookups; `linkedin` is the full
/// matched URL and is only ever displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileHandles {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
}

/// Structured facts pulled from raw résumé text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSignals {
    pub years_exp: u32,
    pub handles: ProfileHandles,
    pub tokens: CandidateTokens,
}

/// Extracts all signals from a résumé in one pass.
pub fn extract_signals(text: &str) -> TextSignals {
    TextSignals {
        years_exp: extract_years_experience(text),
        handles: extract_handles(text),
        tokens: CandidateTokens::from_text(text),
    }
}

/// First "N+ years of experience" mention, or 0.
pub fn extract_years_experience(text: &str) -> u32 {
    RE_YEARS_EXP
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

pub fn extract_handles(text: &str) -> ProfileHandles {
    let github = RE_GITHUB
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let linkedin = RE_LINKEDIN
        .as_ref()
        .and_then(|re| re.find(text))
        .map(|m| m.as_str().to_string());

    let wallet = RE_WALLET
        .as_ref()
        .and_then(|re| re.find(text))
        .map(|m| m.as_str().to_string());

    ProfileHandles {
        github,
        linkedin,
        wallet,
    }
}

/// Splits text into lowercase tokens.
///
/// `+` and `#` are word characters so `c++` and `c#` survive; a `.` is kept
/// only inside a token (`node.js`), never at its edges.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-' | '_')))
        .map(|raw| raw.trim_matches(|c| c == '.' || c == '-'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Normalized token view of a candidate document.
///
/// Keeps both the token set (single-word lookups) and the ordered token
/// sequence (multi-word phrases such as "machine learning").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateTokens {
    set: BTreeSet<String>,
    sequence: Vec<String>,
}

impl CandidateTokens {
    pub fn from_text(text: &str) -> Self {
        let sequence = tokenize(text);
        let set = sequence.iter().cloned().collect();
        Self { set, sequence }
    }

    /// True when `term` appears as a token, or as a contiguous token phrase
    /// for multi-word terms.
    pub fn contains_term(&self, term: &str) -> bool {
        let needle = tokenize(term);
        match needle.as_slice() {
            [] => false,
            [single] => self.set.contains(single),
            phrase => self
                .sequence
                .windows(phrase.len())
                .any(|window| window == phrase),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateTokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let sequence: Vec<String> = iter.into_iter().map(|s| s.into().to_lowercase()).collect();
        let set = sequence.iter().cloned().collect();
        Self { set, sequence }
    }
}
