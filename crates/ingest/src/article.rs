use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Ground-truth label stamped on every article by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "FAKE")]
    Fake,
    #[serde(rename = "REAL")]
    Real,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Fake, Label::Real];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "FAKE",
            Label::Real => "REAL",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FAKE" => Ok(Label::Fake),
            "REAL" => Ok(Label::Real),
            other => anyhow::bail!("Unknown label: {}", other),
        }
    }
}

/// One row of `Fake.csv` / `True.csv`. Empty cells deserialize as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub text: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
}

/// One row of `all_news.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledArticle {
    pub id: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub label: Label,
}

impl LabeledArticle {
    pub fn new(raw: RawArticle, label: Label, row: usize) -> Self {
        // Generate a stable id from the source position and headline
        let id = Self::generate_id(label, row, raw.title.as_deref().unwrap_or(""));

        Self {
            id,
            title: raw.title,
            text: raw.text,
            subject: raw.subject,
            date: raw.date,
            label,
        }
    }

    fn generate_id(label: Label, row: usize, title: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(label.as_str().as_bytes());
        hasher.update(row.to_string().as_bytes());
        hasher.update(title.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16]) // First 16 bytes (32 hex chars)
    }

    /// Count of the four source columns that are missing.
    pub fn missing_fields(&self) -> usize {
        [&self.title, &self.text, &self.subject, &self.date]
            .iter()
            .filter(|field| field.is_none())
            .count()
    }
}

/// One row of `cleaned_news.csv` / `sample_news.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanArticle {
    pub id: String,
    pub title: String,
    pub text: String,
    pub subject: String,
    pub date: String,
    pub label: Label,
    pub clean_title: String,
    pub clean_text: String,
    pub clean_date: String,
    pub text_length: usize,
    pub word_count: usize,
}
