use serde::Serialize;
use std::time::Instant;
use tracing::info;

use index::{EntityMention, GraphReader, SimilarArticle};

use crate::analyzer::VerdictGenerator;
use crate::verdict::Analysis;

/// Articles fetched from the graph per query.
pub const SIMILAR_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub query: String,
    pub similar: Vec<SimilarArticle>,
    pub entities: Vec<EntityMention>,
    pub analysis: Analysis,
    pub trace: DetectionTrace,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionTrace {
    pub keyword: String,
    pub articles_found: usize,
    pub entities_found: usize,
    pub prompt_chars: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub enum DetectionOutcome {
    /// Empty input; the backend was not contacted.
    EmptyQuery,
    Report(DetectionReport),
}

/// The detector flow: keyword search, entity aggregation, LLM analysis.
#[derive(Clone)]
pub struct Detector {
    graph: GraphReader,
    generator: VerdictGenerator,
}

impl Detector {
    pub fn new(graph: GraphReader, generator: VerdictGenerator) -> Self {
        Self { graph, generator }
    }

    pub fn graph(&self) -> &GraphReader {
        &self.graph
    }

    pub fn generator(&self) -> &VerdictGenerator {
        &self.generator
    }

    /// Only the empty string short-circuits. Whitespace-only input has no
    /// keyword and reaches the store's broad match (see `index::search_keyword`).
    pub async fn run(&self, query: &str) -> DetectionOutcome {
        if query.is_empty() {
            return DetectionOutcome::EmptyQuery;
        }
        let start = Instant::now();

        // Step 1: Keyword search over News nodes
        let similar = self.graph.find_similar_news(query, SIMILAR_LIMIT).await;

        // Step 2: Entities mentioned by the matches
        let news_ids: Vec<String> = similar.iter().map(|a| a.id.clone()).collect();
        let entities = self.graph.related_entities(&news_ids).await;

        // Step 3: LLM verdict
        let prompt_chars = VerdictGenerator::request(query, &similar, &entities).user.len();
        let text = self.generator.analyze(query, &similar, &entities).await;
        let analysis = Analysis::parse(text);

        let trace = DetectionTrace {
            keyword: index::search_keyword(query).to_string(),
            articles_found: similar.len(),
            entities_found: entities.len(),
            prompt_chars,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            verdict = %analysis.verdict,
            articles = trace.articles_found,
            entities = trace.entities_found,
            elapsed_ms = trace.elapsed_ms,
            "Detection complete"
        );

        DetectionOutcome::Report(DetectionReport {
            query: query.to_string(),
            similar,
            entities,
            analysis,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatModel, ChatRequest};
    use crate::verdict::Verdict;
    use anyhow::Result;
    use async_trait::async_trait;
    use index::{InMemoryGraph, NewsNode};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedModel {
        reply: String,
        calls: AtomicUsize,
    }

    impl CannedModel {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatModel for CannedModel {
        async fn chat(&self, _: &ChatRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn graph() -> GraphReader {
        let mut graph = InMemoryGraph::new();
        graph
            .add_news(NewsNode {
                id: "n1".to_string(),
                title: "Pope Francis shocks world, endorses Donald Trump".to_string(),
                label: "FAKE".to_string(),
                subject: "News".to_string(),
                text_preview: "News outlets around the world are reporting...".to_string(),
                has_embedding: true,
            })
            .add_entity("Pope Francis", "PERSON")
            .add_mention("n1", "Pope Francis");
        GraphReader::new(Arc::new(graph))
    }

    fn report(outcome: DetectionOutcome) -> DetectionReport {
        match outcome {
            DetectionOutcome::Report(report) => report,
            DetectionOutcome::EmptyQuery => panic!("expected a report"),
        }
    }

    #[tokio::test]
    async fn test_empty_query_never_reaches_backend() {
        let model = CannedModel::new("Verdict: FAKE");
        let detector = Detector::new(graph(), VerdictGenerator::new(model.clone()));

        assert!(matches!(detector.run("").await, DetectionOutcome::EmptyQuery));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_query_reaches_broad_match() {
        let model = CannedModel::new("Verdict: REAL");
        let detector = Detector::new(graph(), VerdictGenerator::new(model.clone()));

        let report = report(detector.run("   ").await);

        assert_eq!(report.trace.keyword, "");
        assert_eq!(report.similar.len(), 1);
        assert_eq!(report.similar[0].id, "n1");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_matches_and_free_text_reply_is_inconclusive() {
        let model = CannedModel::new(
            "There is not enough context in the database to judge this claim.",
        );
        let detector = Detector::new(graph(), VerdictGenerator::new(model.clone()));

        let report = report(detector.run("election fraud").await);

        assert!(report.similar.is_empty());
        assert!(report.entities.is_empty());
        assert!(!report.analysis.raw.is_empty());
        assert_eq!(report.analysis.verdict, Verdict::Inconclusive);
        assert_eq!(report.trace.keyword, "election");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fake_sentinel_selects_fake() {
        let model = CannedModel::new("After review.\nVerdict: FAKE\nConfidence: 91%\nReasons:\n1. Satire site.");
        let detector = Detector::new(graph(), VerdictGenerator::new(model));

        let report = report(detector.run("Pope endorses Trump").await);

        assert_eq!(report.similar.len(), 1);
        assert_eq!(report.entities[0].entity, "Pope Francis");
        assert_eq!(report.entities[0].mention_count, 1);
        assert_eq!(report.analysis.verdict, Verdict::Fake);
        assert_eq!(report.analysis.confidence, Some(91));
        assert_eq!(report.analysis.reasons, vec!["Satire site."]);
    }

    #[tokio::test]
    async fn test_everything_disconnected_still_reports() {
        let detector = Detector::new(GraphReader::disconnected(), VerdictGenerator::disconnected());

        let report = report(detector.run("anything at all").await);

        assert_eq!(report.analysis.raw, "Groq client not initialized.");
        assert_eq!(report.analysis.verdict, Verdict::Inconclusive);
    }
}
