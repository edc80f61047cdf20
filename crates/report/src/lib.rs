pub mod plots;
pub mod stats;

pub use plots::{generate_report, label_pie_svg, subject_bars_svg};
pub use stats::{DatasetStats, LabelStats, SubjectRow, WordCountSummary};
