use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static VERDICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)verdict\**\s*:\s*\**\s*(fake|real)\b").unwrap()
});
static CONFIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)confidence\**\s*:\s*\**\s*(\d{1,3})(?:\.\d+)?\s*%?").unwrap()
});
static REASONS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\s*#]*reasons[\s*]*:").unwrap());
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.+?)\s*$").unwrap());
static ANALYSIS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\s*#]*analysis[\s*]*:").unwrap());

/// Outcome of classifying a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Fake,
    Real,
    /// The response carried no recognizable verdict.
    Inconclusive,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fake => "FAKE",
            Verdict::Real => "REAL",
            Verdict::Inconclusive => "INCONCLUSIVE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model response split into the parts the dashboard displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub verdict: Verdict,
    /// 0-100 when the response states one.
    pub confidence: Option<u8>,
    pub reasons: Vec<String>,
    /// The response text, verbatim.
    pub raw: String,
}

impl Analysis {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            verdict: parse_verdict(&raw),
            confidence: parse_confidence(&raw),
            reasons: parse_reasons(&raw),
            raw,
        }
    }
}

/// Exact `Verdict: FAKE` / `Verdict: REAL` sentinels match anywhere. Looser
/// spellings (case, markdown, spacing) must end on a word boundary. A FAKE
/// verdict anywhere in the text wins over a REAL one.
pub fn parse_verdict(text: &str) -> Verdict {
    if text.contains("Verdict: FAKE") {
        return Verdict::Fake;
    }
    let mut verdict = if text.contains("Verdict: REAL") {
        Verdict::Real
    } else {
        Verdict::Inconclusive
    };
    for caps in VERDICT_RE.captures_iter(text) {
        if caps[1].eq_ignore_ascii_case("fake") {
            return Verdict::Fake;
        }
        verdict = Verdict::Real;
    }
    verdict
}

pub fn parse_confidence(text: &str) -> Option<u8> {
    let caps = CONFIDENCE_RE.captures(text)?;
    let value: u16 = caps[1].parse().ok()?;
    u8::try_from(value).ok().filter(|v| *v <= 100)
}

/// Numbered lines following a `Reasons:` header, up to the `Analysis:` header.
pub fn parse_reasons(text: &str) -> Vec<String> {
    let mut reasons = Vec::new();
    let mut in_reasons = false;

    for line in text.lines() {
        if REASONS_HEADER_RE.is_match(line) {
            in_reasons = true;
            continue;
        }
        if !in_reasons {
            continue;
        }
        if ANALYSIS_HEADER_RE.is_match(line) {
            break;
        }
        if let Some(caps) = NUMBERED_RE.captures(line) {
            reasons.push(caps[1].to_string());
        } else if line.trim().is_empty() && !reasons.is_empty() {
            break;
        }
    }

    reasons
}
