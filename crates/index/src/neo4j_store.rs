use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{Graph, Query};
use tracing::info;

use crate::store::{
    EntityMention, LabelCount, MentionEdge, NewsGraph, RELATED_ENTITY_LIMIT, SimilarArticle,
    search_keyword,
};

/// [`NewsGraph`] backed by a Neo4j database. Each call runs on its own
/// pooled connection; no transaction spans two calls.
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Connect and verify the server answers a trivial query.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .with_context(|| format!("Failed to connect to Neo4j at {}", uri))?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j connectivity check failed")?;

        info!(uri, "Connected to Neo4j");
        Ok(Self { graph })
    }
}

#[async_trait]
impl NewsGraph for Neo4jStore {
    async fn find_similar_news(&self, query: &str, limit: usize) -> Result<Vec<SimilarArticle>> {
        let keyword = search_keyword(query);

        let query = Query::new(
            r#"
            MATCH (n:News)
            WHERE n.embedding IS NOT NULL
              AND (toLower(n.title) CONTAINS toLower($keyword)
                   OR toLower(n.text_preview) CONTAINS toLower($keyword))
            RETURN n.id as id, n.title as title, n.label as label,
                   n.subject as subject, n.text_preview as text
            LIMIT $limit
            "#.to_string()
        )
        .param("keyword", keyword.to_string())
        .param("limit", limit as i64);

        let mut result = self.graph.execute(query).await
            .context("Failed to run keyword search")?;

        let mut articles = Vec::new();
        while let Some(row) = result.next().await? {
            articles.push(SimilarArticle {
                id: row.get("id")?,
                title: row.get("title").unwrap_or_default(),
                label: row.get("label").unwrap_or_default(),
                subject: row.get("subject").unwrap_or_else(|_| "Unknown".to_string()),
                text: row.get("text").unwrap_or_default(),
            });
        }

        Ok(articles)
    }

    async fn related_entities(&self, news_ids: &[String]) -> Result<Vec<EntityMention>> {
        if news_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = Query::new(
            r#"
            MATCH (n:News)-[:MENTIONS]->(e:Entity)
            WHERE n.id IN $ids
            RETURN e.name as entity, e.type as type, count(DISTINCT n) as mention_count
            ORDER BY mention_count DESC
            LIMIT $limit
            "#.to_string()
        )
        .param("ids", news_ids.to_vec())
        .param("limit", RELATED_ENTITY_LIMIT as i64);

        let mut result = self.graph.execute(query).await
            .context("Failed to aggregate related entities")?;

        let mut entities = Vec::new();
        while let Some(row) = result.next().await? {
            entities.push(EntityMention {
                entity: row.get("entity")?,
                entity_type: row.get("type").unwrap_or_else(|_| "UNKNOWN".to_string()),
                mention_count: row.get::<i64>("mention_count").unwrap_or(0),
            });
        }

        Ok(entities)
    }

    async fn node_label_counts(&self) -> Result<Vec<LabelCount>> {
        let query = Query::new(
            "MATCH (n) RETURN labels(n)[0] as label, count(*) as count".to_string()
        );

        let mut result = self.graph.execute(query).await
            .context("Failed to count nodes by label")?;

        let mut counts = Vec::new();
        while let Some(row) = result.next().await? {
            counts.push(LabelCount {
                label: row.get("label").unwrap_or_else(|_| "(unlabeled)".to_string()),
                count: row.get::<i64>("count").unwrap_or(0),
            });
        }

        Ok(counts)
    }

    async fn mention_edges(&self, limit: usize) -> Result<Vec<MentionEdge>> {
        let query = Query::new(
            r#"
            MATCH (n:News)-[r:MENTIONS]->(e:Entity)
            RETURN n.title as title, n.label as label, e.name as entity, e.type as type
            LIMIT $limit
            "#.to_string()
        )
        .param("limit", limit as i64);

        let mut result = self.graph.execute(query).await
            .context("Failed to list mention edges")?;

        let mut edges = Vec::new();
        while let Some(row) = result.next().await? {
            edges.push(MentionEdge {
                title: row.get("title").unwrap_or_default(),
                label: row.get("label").unwrap_or_default(),
                entity: row.get("entity")?,
                entity_type: row.get("type").unwrap_or_else(|_| "UNKNOWN".to_string()),
            });
        }

        Ok(edges)
    }
}
