pub mod analyzer;
pub mod detector;
pub mod llm;
pub mod prompt;
pub mod verdict;

pub use analyzer::VerdictGenerator;
pub use detector::{DetectionOutcome, DetectionReport, DetectionTrace, Detector};
pub use llm::{ChatModel, ChatRequest, GroqClient};
pub use verdict::{Analysis, Verdict};
