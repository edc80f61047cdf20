use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::DataLayout;
use crate::article::{CleanArticle, Label, LabeledArticle};
use crate::error::Result;
use crate::normalizer::{UNKNOWN, clean_date, clean_text, word_count};
use crate::reader::CsvFile;

/// Articles whose cleaned body is shorter than this are reported as "very short".
pub const SHORT_ARTICLE_CHARS: usize = 50;

pub struct PipelineConfig {
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            seed: 42,
        }
    }
}

/// Summary of one cleaning run, logged by the `clean_data` binary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub rows: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    pub short_articles: usize,
    pub mean_length: f64,
    pub min_length: usize,
    pub max_length: usize,
    pub fake_rows: usize,
    pub real_rows: usize,
    pub sample_rows: usize,
}

pub struct CleaningPipeline {
    config: PipelineConfig,
}

impl CleaningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Stage 1: replace missing title/text with "" and subject/date with "Unknown".
    pub fn fill_missing(article: LabeledArticle) -> LabeledArticle {
        LabeledArticle {
            title: Some(article.title.unwrap_or_default()),
            text: Some(article.text.unwrap_or_default()),
            subject: Some(article.subject.unwrap_or_else(|| UNKNOWN.to_string())),
            date: Some(article.date.unwrap_or_else(|| UNKNOWN.to_string())),
            ..article
        }
    }

    /// Stages 2 and 3: normalize title, body and date, then derive length stats.
    pub fn clean(article: LabeledArticle) -> CleanArticle {
        let clean_title = clean_text(article.title.as_deref());
        let clean_body = clean_text(article.text.as_deref());
        let clean_date = clean_date(article.date.as_deref());

        let text_length = clean_body.chars().count();
        let word_count = word_count(&clean_body);

        CleanArticle {
            id: article.id,
            title: article.title.unwrap_or_default(),
            text: article.text.unwrap_or_default(),
            subject: article.subject.unwrap_or_else(|| UNKNOWN.to_string()),
            date: article.date.unwrap_or_else(|| UNKNOWN.to_string()),
            label: article.label,
            clean_title,
            clean_text: clean_body,
            clean_date,
            text_length,
            word_count,
        }
    }

    /// Run stages 1-3 over the whole table.
    pub fn clean_all(&self, rows: Vec<LabeledArticle>) -> Vec<CleanArticle> {
        rows.into_iter()
            .map(Self::fill_missing)
            .map(Self::clean)
            .collect()
    }

    /// Stage 4: uniform sample without replacement, reproducible for a given seed.
    /// Returns every row when the table is smaller than the sample size.
    pub fn draw_sample(&self, rows: &[CleanArticle]) -> Vec<CleanArticle> {
        let amount = self.config.sample_size.min(rows.len());
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        rand::seq::index::sample(&mut rng, rows.len(), amount)
            .into_iter()
            .map(|i| rows[i].clone())
            .collect()
    }

    /// Clean `all_news.csv` into `cleaned_news.csv` and `sample_news.csv`.
    ///
    /// Nothing is written unless the input exists and parses completely.
    pub fn run(&self, layout: &DataLayout) -> Result<CleaningReport> {
        let input = layout.all_news();
        CsvFile::require(&input, "Run prepare_data first!")?;

        info!(path = %input.display(), "Loading combined data...");
        let rows: Vec<LabeledArticle> = CsvFile::read(&input)?;
        info!(articles = rows.len(), "Loaded combined data");

        let missing_before: usize = rows.iter().map(LabeledArticle::missing_fields).sum();
        debug!(missing_before, "Handling missing values");

        let cleaned = self.clean_all(rows);
        let sample = self.draw_sample(&cleaned);
        let report = Self::report(&cleaned, missing_before, sample.len());

        // Both outputs are staged before either replaces the previous run's.
        let cleaned_path = layout.cleaned_news();
        let sample_path = layout.sample_news();
        let cleaned_tmp = CsvFile::stage(&cleaned_path, &cleaned)?;
        let sample_tmp = match CsvFile::stage(&sample_path, &sample) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = std::fs::remove_file(&cleaned_tmp);
                return Err(e);
            }
        };
        CsvFile::commit(&[
            (cleaned_tmp, cleaned_path.as_path()),
            (sample_tmp, sample_path.as_path()),
        ])?;
        info!(path = %cleaned_path.display(), "Saved cleaned data");
        info!(path = %sample_path.display(), rows = sample.len(), "Saved sample data");

        Ok(report)
    }

    fn report(cleaned: &[CleanArticle], missing_before: usize, sample_rows: usize) -> CleaningReport {
        let lengths: Vec<usize> = cleaned.iter().map(|a| a.text_length).collect();
        let mean_length = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };

        CleaningReport {
            rows: cleaned.len(),
            missing_before,
            // Every source column is filled by stage 1.
            missing_after: 0,
            short_articles: lengths.iter().filter(|&&l| l < SHORT_ARTICLE_CHARS).count(),
            mean_length,
            min_length: lengths.iter().copied().min().unwrap_or(0),
            max_length: lengths.iter().copied().max().unwrap_or(0),
            fake_rows: cleaned.iter().filter(|a| a.label == Label::Fake).count(),
            real_rows: cleaned.iter().filter(|a| a.label == Label::Real).count(),
            sample_rows,
        }
    }
}
