use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Sentinel written for dates that cannot be parsed.
pub const UNKNOWN: &str = "Unknown";

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?\S*|www\S*").unwrap());
static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,!?]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Accepted date layouts, tried in order. The second field is how many
/// leading whitespace tokens of the raw value the layout spans.
const DATE_PATTERNS: [(&str, usize); 5] = [
    ("%Y-%m-%d", 1), // 2020-01-15
    ("%d-%m-%Y", 1), // 15-01-2020
    ("%m/%d/%Y", 1), // 01/15/2020
    ("%B %d, %Y", 3), // January 15, 2020
    ("%b %d, %Y", 3), // Jan 15, 2020
];

/// Normalize article text: lowercase, drop URLs, replace anything outside
/// `[\w\s.,!?]` with a space, collapse whitespace.
pub fn clean_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let lowered = text.to_lowercase();
    let without_urls = URL_RE.replace_all(&lowered, "");
    let filtered = DISALLOWED_RE.replace_all(&without_urls, " ");
    WHITESPACE_RE.replace_all(&filtered, " ").trim().to_string()
}

/// Parse a loosely formatted date into `YYYY-MM-DD`, or [`UNKNOWN`].
///
/// Only the leading tokens of the value are considered, so trailing text
/// such as a time of day is ignored.
pub fn clean_date(date: Option<&str>) -> String {
    let Some(date) = date else {
        return UNKNOWN.to_string();
    };
    if date == UNKNOWN {
        return UNKNOWN.to_string();
    }

    let tokens: Vec<&str> = date.split_whitespace().collect();
    if tokens.is_empty() {
        return UNKNOWN.to_string();
    }

    for (pattern, width) in DATE_PATTERNS {
        if tokens.len() < width {
            continue;
        }
        let candidate = tokens[..width].join(" ");
        if let Ok(parsed) = NaiveDate::parse_from_str(&candidate, pattern) {
            return parsed.format("%Y-%m-%d").to_string();
        }
    }

    UNKNOWN.to_string()
}

/// Number of whitespace separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_allowed(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == ' ' || ".,!?".contains(c)
    }

    #[test]
    fn test_text_normalization() {
        assert_eq!(
            clean_text(Some("BREAKING: Read more at https://t.co/abc now!!")),
            "breaking read more at now!!"
        );
        assert_eq!(clean_text(Some("  Trump\t\n says   (again) ")), "trump says again");
        assert_eq!(clean_text(Some("visit www.example.com, today")), "visit today");
        assert_eq!(clean_text(Some("it's #fake_news")), "it s fake_news");
    }

    #[test]
    fn test_missing_text_is_empty() {
        assert_eq!(clean_text(None), "");
        assert_eq!(clean_text(Some("")), "");
        assert_eq!(clean_text(Some("@@@ ###")), "");
    }

    #[test]
    fn test_no_urls_or_disallowed_chars_survive() {
        let inputs = [
            "Click http://bit.ly/x?y=1&z=2 or HTTPS://EXAMPLE.COM/path",
            "a bare http and a bare www token",
            "emoji 🎉 and «quotes» — dashes; colons: [brackets]",
            "xhttp://glued.example yhttps://glued www.www.www",
            "tabs\tand\r\nnewlines\u{a0}nbsp",
        ];

        for input in inputs {
            let cleaned = clean_text(Some(input));
            assert!(!cleaned.contains("http"), "{cleaned:?}");
            assert!(!cleaned.contains("www"), "{cleaned:?}");
            assert!(cleaned.chars().all(is_allowed), "{cleaned:?}");
            assert!(!cleaned.contains("  "), "{cleaned:?}");
            assert_eq!(cleaned, cleaned.trim());
        }
    }

    #[test]
    fn test_text_normalization_is_idempotent() {
        let inputs = [
            "WASHINGTON (Reuters) - The U.S. Senate on Friday...",
            "Donald Trump just couldn t wish all Americans a Happy New Year!",
            "see pic.twitter.com/abc https://t.co/xyz #MAGA",
            "Ünïcödé & ÇÅPS??",
        ];

        for input in inputs {
            let once = clean_text(Some(input));
            assert_eq!(clean_text(Some(&once)), once);
        }
    }

    #[test]
    fn test_supported_date_formats() {
        for raw in [
            "2020-01-15",
            "15-01-2020",
            "01/15/2020",
            "January 15, 2020",
            "Jan 15, 2020",
        ] {
            assert_eq!(clean_date(Some(raw)), "2020-01-15", "{raw}");
        }
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        assert_eq!(clean_date(Some("2017-12-31 10:42:00")), "2017-12-31");
        assert_eq!(clean_date(Some("December 31, 2017 ")), "2017-12-31");
        assert_eq!(clean_date(Some("Dec 31, 2017 at noon")), "2017-12-31");
    }

    #[test]
    fn test_unparseable_dates_are_unknown() {
        assert_eq!(clean_date(None), UNKNOWN);
        assert_eq!(clean_date(Some("Unknown")), UNKNOWN);
        assert_eq!(clean_date(Some("")), UNKNOWN);
        assert_eq!(clean_date(Some("   ")), UNKNOWN);
        assert_eq!(clean_date(Some("https://100percentfedup.com/")), UNKNOWN);
        assert_eq!(clean_date(Some("2020-13-45")), UNKNOWN);
        assert_eq!(clean_date(Some("yesterday")), UNKNOWN);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("one two  three"), 3);
    }
}
