use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of entities returned by [`NewsGraph::related_entities`].
pub const RELATED_ENTITY_LIMIT: usize = 10;

/// A `News` node matched by keyword search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarArticle {
    pub id: String,
    pub title: String,
    pub label: String,
    pub subject: String,
    /// The node's text preview.
    pub text: String,
}

/// An `Entity` with the number of distinct matched articles mentioning it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mention_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// One `(News)-[:MENTIONS]->(Entity)` edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionEdge {
    pub title: String,
    pub label: String,
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// Keyword used by [`NewsGraph::find_similar_news`]: the first whitespace
/// token of the query, or `""` when there is none.
///
/// An empty keyword matches every embedded `News` node.
pub fn search_keyword(query: &str) -> &str {
    query.split_whitespace().next().unwrap_or("")
}

/// Read operations over the news/entity property graph.
#[async_trait]
pub trait NewsGraph: Send + Sync {
    /// `News` nodes with an embedding whose title or preview contains the
    /// query's keyword (case-insensitive), in store order, at most `limit`.
    async fn find_similar_news(&self, query: &str, limit: usize) -> Result<Vec<SimilarArticle>>;

    /// Entities mentioned by the given articles, most mentioned first.
    async fn related_entities(&self, news_ids: &[String]) -> Result<Vec<EntityMention>>;

    /// Node count per node label.
    async fn node_label_counts(&self) -> Result<Vec<LabelCount>>;

    /// Up to `limit` mention edges.
    async fn mention_edges(&self, limit: usize) -> Result<Vec<MentionEdge>>;
}

/// Graph access that degrades instead of failing: every read returns an
/// empty result when no store is connected, the input is empty, or the
/// store reports an error.
#[derive(Clone, Default)]
pub struct GraphReader {
    store: Option<Arc<dyn NewsGraph>>,
}

impl GraphReader {
    pub fn new(store: Arc<dyn NewsGraph>) -> Self {
        Self { store: Some(store) }
    }

    pub fn disconnected() -> Self {
        Self { store: None }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    pub async fn find_similar_news(&self, query: &str, limit: usize) -> Vec<SimilarArticle> {
        let Some(store) = &self.store else {
            return Vec::new();
        };

        match store.find_similar_news(query, limit).await {
            Ok(articles) => {
                debug!(keyword = search_keyword(query), matches = articles.len(), "Keyword search");
                articles
            }
            Err(e) => {
                warn!(error = %e, "Keyword search failed");
                Vec::new()
            }
        }
    }

    pub async fn related_entities(&self, news_ids: &[String]) -> Vec<EntityMention> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        if news_ids.is_empty() {
            return Vec::new();
        }

        store.related_entities(news_ids).await.unwrap_or_else(|e| {
            warn!(error = %e, "Entity aggregation failed");
            Vec::new()
        })
    }

    pub async fn node_label_counts(&self) -> Vec<LabelCount> {
        let Some(store) = &self.store else {
            return Vec::new();
        };

        store.node_label_counts().await.unwrap_or_else(|e| {
            warn!(error = %e, "Label count query failed");
            Vec::new()
        })
    }

    pub async fn mention_edges(&self, limit: usize) -> Vec<MentionEdge> {
        let Some(store) = &self.store else {
            return Vec::new();
        };

        store.mention_edges(limit).await.unwrap_or_else(|e| {
            warn!(error = %e, "Mention edge query failed");
            Vec::new()
        })
    }
}
