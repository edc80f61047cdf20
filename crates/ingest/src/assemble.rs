use std::collections::BTreeMap;
use tracing::info;

use crate::DataLayout;
use crate::article::{Label, LabeledArticle, RawArticle};
use crate::error::Result;
use crate::reader::CsvFile;

/// Stamp labels onto both sources and concatenate them, fake rows first.
pub fn assemble(fake: Vec<RawArticle>, real: Vec<RawArticle>) -> Vec<LabeledArticle> {
    let mut combined = Vec::with_capacity(fake.len() + real.len());

    for (row, raw) in fake.into_iter().enumerate() {
        combined.push(LabeledArticle::new(raw, Label::Fake, row));
    }
    for (row, raw) in real.into_iter().enumerate() {
        combined.push(LabeledArticle::new(raw, Label::Real, row));
    }

    combined
}

/// Row counts per subject, sorted by count descending then name.
pub fn subject_counts(rows: &[RawArticle]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.subject.as_deref().unwrap_or("Unknown")).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(subject, n)| (subject.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleSummary {
    pub fake_rows: usize,
    pub real_rows: usize,
}

impl AssembleSummary {
    pub fn total(&self) -> usize {
        self.fake_rows + self.real_rows
    }
}

/// Read `Fake.csv` and `True.csv`, write the labeled union to `all_news.csv`.
///
/// Both inputs are checked before anything is read or written.
pub fn prepare_dataset(layout: &DataLayout) -> Result<AssembleSummary> {
    let fake_path = layout.fake_csv();
    let true_path = layout.true_csv();

    info!("Checking for data files...");
    CsvFile::require(&fake_path, "Please download it from Kaggle and place it in the data folder.")?;
    info!(path = %fake_path.display(), "Found fake news source");
    CsvFile::require(&true_path, "Please download it from Kaggle and place it in the data folder.")?;
    info!(path = %true_path.display(), "Found true news source");

    let fake: Vec<RawArticle> = CsvFile::read(&fake_path)?;
    let real: Vec<RawArticle> = CsvFile::read(&true_path)?;

    let fake_columns = CsvFile::columns(&fake_path)?;
    let true_columns = CsvFile::columns(&true_path)?;

    info!(
        articles = fake.len(),
        columns = ?fake_columns,
        subjects = ?subject_counts(&fake),
        "Loaded fake news dataset"
    );
    info!(
        articles = real.len(),
        columns = ?true_columns,
        subjects = ?subject_counts(&real),
        "Loaded true news dataset"
    );

    let summary = AssembleSummary {
        fake_rows: fake.len(),
        real_rows: real.len(),
    };

    let combined = assemble(fake, real);
    let out = layout.all_news();
    CsvFile::write(&out, &combined)?;

    info!(
        total = summary.total(),
        fake = summary.fake_rows,
        real = summary.real_rows,
        path = %out.display(),
        "Saved combined dataset"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use std::fs;

    fn raw(title: &str, subject: Option<&str>) -> RawArticle {
        RawArticle {
            title: Some(title.to_string()),
            text: Some(format!("{title} body")),
            subject: subject.map(str::to_string),
            date: None,
        }
    }

    #[test]
    fn test_assemble_preserves_counts_labels_and_order() {
        let fake = vec![raw("f1", None), raw("f2", None), raw("f3", None)];
        let real = vec![raw("r1", None), raw("r2", None)];

        let combined = assemble(fake, real);

        assert_eq!(combined.len(), 5);
        let titles: Vec<_> = combined.iter().map(|a| a.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["f1", "f2", "f3", "r1", "r2"]);
        assert!(combined[..3].iter().all(|a| a.label == Label::Fake));
        assert!(combined[3..].iter().all(|a| a.label == Label::Real));
    }

    #[test]
    fn test_subject_counts() {
        let rows = vec![
            raw("a", Some("politics")),
            raw("b", Some("News")),
            raw("c", Some("politics")),
            raw("d", None),
        ];
        assert_eq!(
            subject_counts(&rows),
            vec![
                ("politics".to_string(), 2),
                ("News".to_string(), 1),
                ("Unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_prepare_dataset_writes_all_news() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        fs::write(
            layout.fake_csv(),
            "title,text,subject,date\nFake one,body,News,\"December 31, 2017\"\nFake two,,politics,\n",
        )
        .unwrap();
        fs::write(
            layout.true_csv(),
            "title,text,subject,date\nReal one,body,worldnews,\"December 30, 2017 \"\n",
        )
        .unwrap();

        let summary = prepare_dataset(&layout).unwrap();
        assert_eq!(summary.total(), 3);

        let combined: Vec<LabeledArticle> = CsvFile::read(&layout.all_news()).unwrap();
        assert_eq!(combined.len(), 3);
        assert_eq!(combined[2].label, Label::Real);
        assert_eq!(combined[1].text, None);
    }

    #[test]
    fn test_prepare_dataset_fails_fast_without_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        fs::write(layout.fake_csv(), "title,text,subject,date\n").unwrap();

        let err = prepare_dataset(&layout).unwrap_err();
        assert!(matches!(err, IngestError::MissingInput { .. }));
        assert!(!layout.all_news().exists());
    }
}
