pub mod article;
pub mod assemble;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod reader;

pub use article::{CleanArticle, Label, LabeledArticle, RawArticle};
pub use assemble::{AssembleSummary, assemble, prepare_dataset};
pub use error::IngestError;
pub use normalizer::{clean_date, clean_text};
pub use pipeline::{CleaningPipeline, CleaningReport, PipelineConfig};
pub use reader::CsvFile;

use std::path::{Path, PathBuf};

/// File locations inside the data directory shared by every stage.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fake_csv(&self) -> PathBuf {
        self.root.join("Fake.csv")
    }

    pub fn true_csv(&self) -> PathBuf {
        self.root.join("True.csv")
    }

    pub fn all_news(&self) -> PathBuf {
        self.root.join("all_news.csv")
    }

    pub fn cleaned_news(&self) -> PathBuf {
        self.root.join("cleaned_news.csv")
    }

    pub fn sample_news(&self) -> PathBuf {
        self.root.join("sample_news.csv")
    }

    pub fn analysis_png(&self) -> PathBuf {
        self.root.join("data_analysis.png")
    }

    pub fn graph_html(&self) -> PathBuf {
        self.root.join("graph.html")
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new("data")
    }
}

/// Load the cleaned dataset consumed by the dashboard and the reporter.
pub fn load_cleaned(layout: &DataLayout) -> Result<Vec<CleanArticle>, IngestError> {
    let path = layout.cleaned_news();
    CsvFile::require(&path, "Run clean_data first!")?;
    CsvFile::read(&path)
}

/// Initialize `tracing` for the batch binaries (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
