use ingest::{CleanArticle, Label};
use serde::Serialize;
use std::collections::HashMap;

pub const TOP_SUBJECTS: usize = 10;
pub const TOP_TITLE_WORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCountSummary {
    pub mean: f64,
    /// Sample standard deviation; undefined below two rows.
    pub std: Option<f64>,
    pub min: usize,
    pub max: usize,
}

impl WordCountSummary {
    pub fn from_counts(counts: &[usize]) -> Option<Self> {
        let min = *counts.iter().min()?;
        let max = *counts.iter().max()?;
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let std = (values.len() > 1).then(|| statistical::standard_deviation(&values, None));

        Some(Self {
            mean: statistical::mean(&values),
            std,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelStats {
    pub label: Label,
    pub count: usize,
    pub text_lengths: Vec<usize>,
    pub word_counts: Option<WordCountSummary>,
    pub top_title_words: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRow {
    pub subject: String,
    pub fake: usize,
    pub real: usize,
}

/// Everything the analysis figure and the dashboard charts are drawn from.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    /// FAKE first, then REAL.
    pub labels: Vec<LabelStats>,
    /// Top subjects ordered by FAKE count.
    pub subjects: Vec<SubjectRow>,
}

impl DatasetStats {
    pub fn from_articles(articles: &[CleanArticle]) -> Self {
        let labels = Label::ALL
            .iter()
            .map(|&label| label_stats(articles, label))
            .collect();

        Self {
            total: articles.len(),
            labels,
            subjects: subject_table(articles, TOP_SUBJECTS),
        }
    }

    pub fn label(&self, label: Label) -> Option<&LabelStats> {
        self.labels.iter().find(|s| s.label == label)
    }

    pub fn count(&self, label: Label) -> usize {
        self.label(label).map_or(0, |s| s.count)
    }
}

fn label_stats(articles: &[CleanArticle], label: Label) -> LabelStats {
    let rows: Vec<&CleanArticle> = articles.iter().filter(|a| a.label == label).collect();
    let word_counts: Vec<usize> = rows.iter().map(|a| a.word_count).collect();

    LabelStats {
        label,
        count: rows.len(),
        text_lengths: rows.iter().map(|a| a.text_length).collect(),
        word_counts: WordCountSummary::from_counts(&word_counts),
        top_title_words: top_words(rows.iter().map(|a| a.clean_title.as_str()), TOP_TITLE_WORDS),
    }
}

/// Subject x label counts, highest FAKE count first. Ties keep the larger
/// REAL count first, then subject name.
pub fn subject_table(articles: &[CleanArticle], limit: usize) -> Vec<SubjectRow> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for article in articles {
        let entry = counts.entry(article.subject.as_str()).or_default();
        match article.label {
            Label::Fake => entry.0 += 1,
            Label::Real => entry.1 += 1,
        }
    }

    let mut rows: Vec<SubjectRow> = counts
        .into_iter()
        .map(|(subject, (fake, real))| SubjectRow {
            subject: subject.to_string(),
            fake,
            real,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.fake
            .cmp(&a.fake)
            .then(b.real.cmp(&a.real))
            .then_with(|| a.subject.cmp(&b.subject))
    });
    rows.truncate(limit);
    rows
}

/// Most frequent whitespace tokens, count desc then word.
pub fn top_words<'a>(texts: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for text in texts {
        for word in text.split_whitespace() {
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut words: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    words
}

/// A histogram bin: left edge, right edge, density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub density: f64,
}

/// Equal-width bins spanning the data, normalized so the area sums to 1.
pub fn density_histogram(values: &[usize], bins: usize) -> Vec<Bin> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    // A single distinct value gets a unit-wide range around it.
    let (lo, hi) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v as f64 - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let n = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            density: c as f64 / (n * width),
        })
        .collect()
}
