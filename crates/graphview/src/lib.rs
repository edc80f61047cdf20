pub mod graph_export;
pub mod render;

pub use graph_export::{GraphData, VisEdge, VisNode};
pub use render::{render_html, save_graph};

use anyhow::Result;
use index::GraphReader;
use tracing::info;

/// Mentions drawn on the graph page.
pub const GRAPH_EDGE_LIMIT: usize = 50;

/// Fetches a slice of the mention graph and renders it. `None` when the
/// store returned nothing to draw.
pub async fn mention_graph_page(reader: &GraphReader, limit: usize) -> Result<Option<String>> {
    let mentions = reader.mention_edges(limit).await;
    if mentions.is_empty() {
        return Ok(None);
    }

    let graph = GraphData::from_mentions(&mentions);
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "Built mention graph"
    );
    render_html(&graph).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use index::{InMemoryGraph, NewsNode};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_page_from_reader() {
        let mut graph = InMemoryGraph::new();
        graph
            .add_news(NewsNode {
                id: "n1".to_string(),
                title: "Senate passes budget".to_string(),
                label: "REAL".to_string(),
                subject: "politicsNews".to_string(),
                text_preview: String::new(),
                has_embedding: false,
            })
            .add_entity("Senate", "ORG")
            .add_mention("n1", "Senate");

        let page = mention_graph_page(&GraphReader::new(Arc::new(graph)), GRAPH_EDGE_LIMIT)
            .await
            .unwrap()
            .unwrap();
        assert!(page.contains("Senate passes budget..."));
        assert!(page.contains("#4ECDC4"));
    }

    #[tokio::test]
    async fn test_disconnected_reader_draws_nothing() {
        let page = mention_graph_page(&GraphReader::disconnected(), GRAPH_EDGE_LIMIT)
            .await
            .unwrap();
        assert!(page.is_none());
    }
}
