use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::store::{
    EntityMention, LabelCount, MentionEdge, NewsGraph, RELATED_ENTITY_LIMIT, SimilarArticle,
    search_keyword,
};

#[derive(Debug, Clone)]
pub struct NewsNode {
    pub id: String,
    pub title: String,
    pub label: String,
    pub subject: String,
    pub text_preview: String,
    pub has_embedding: bool,
}

#[derive(Debug, Clone)]
pub struct EntityNode {
    pub name: String,
    pub entity_type: String,
}

/// A [`NewsGraph`] held in memory, with the same query semantics as the
/// Neo4j store. Insertion order is the store order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    news: Vec<NewsNode>,
    entities: Vec<EntityNode>,
    /// (news id, entity name)
    mentions: Vec<(String, String)>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_news(&mut self, node: NewsNode) -> &mut Self {
        self.news.push(node);
        self
    }

    pub fn add_entity(&mut self, name: &str, entity_type: &str) -> &mut Self {
        if !self.entities.iter().any(|e| e.name == name) {
            self.entities.push(EntityNode {
                name: name.to_string(),
                entity_type: entity_type.to_string(),
            });
        }
        self
    }

    pub fn add_mention(&mut self, news_id: &str, entity_name: &str) -> &mut Self {
        self.mentions.push((news_id.to_string(), entity_name.to_string()));
        self
    }

    fn news_by_id(&self, id: &str) -> Option<&NewsNode> {
        self.news.iter().find(|n| n.id == id)
    }

    fn entity_by_name(&self, name: &str) -> Option<&EntityNode> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[async_trait]
impl NewsGraph for InMemoryGraph {
    async fn find_similar_news(&self, query: &str, limit: usize) -> Result<Vec<SimilarArticle>> {
        let keyword = search_keyword(query).to_lowercase();

        Ok(self
            .news
            .iter()
            .filter(|n| n.has_embedding)
            .filter(|n| {
                n.title.to_lowercase().contains(&keyword)
                    || n.text_preview.to_lowercase().contains(&keyword)
            })
            .take(limit)
            .map(|n| SimilarArticle {
                id: n.id.clone(),
                title: n.title.clone(),
                label: n.label.clone(),
                subject: n.subject.clone(),
                text: n.text_preview.clone(),
            })
            .collect())
    }

    async fn related_entities(&self, news_ids: &[String]) -> Result<Vec<EntityMention>> {
        let wanted: HashSet<&str> = news_ids.iter().map(String::as_str).collect();

        // entity name -> distinct mentioning articles, in first-seen order
        let mut order: Vec<&str> = Vec::new();
        let mut mentioned_by: HashMap<&str, HashSet<&str>> = HashMap::new();
        for (news_id, entity) in &self.mentions {
            if !wanted.contains(news_id.as_str()) || self.news_by_id(news_id).is_none() {
                continue;
            }
            let Some(node) = self.entity_by_name(entity) else {
                continue;
            };
            let readers = mentioned_by.entry(node.name.as_str()).or_insert_with(|| {
                order.push(node.name.as_str());
                HashSet::new()
            });
            readers.insert(news_id.as_str());
        }

        let mut entities: Vec<EntityMention> = order
            .into_iter()
            .filter_map(|name| {
                let node = self.entity_by_name(name)?;
                Some(EntityMention {
                    entity: node.name.clone(),
                    entity_type: node.entity_type.clone(),
                    mention_count: mentioned_by[name].len() as i64,
                })
            })
            .collect();

        // Stable sort keeps first-seen order among ties.
        entities.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
        entities.truncate(RELATED_ENTITY_LIMIT);
        Ok(entities)
    }

    async fn node_label_counts(&self) -> Result<Vec<LabelCount>> {
        let mut counts = Vec::new();
        if !self.news.is_empty() {
            counts.push(LabelCount {
                label: "News".to_string(),
                count: self.news.len() as i64,
            });
        }
        if !self.entities.is_empty() {
            counts.push(LabelCount {
                label: "Entity".to_string(),
                count: self.entities.len() as i64,
            });
        }
        Ok(counts)
    }

    async fn mention_edges(&self, limit: usize) -> Result<Vec<MentionEdge>> {
        Ok(self
            .mentions
            .iter()
            .filter_map(|(news_id, entity)| {
                let news = self.news_by_id(news_id)?;
                let entity = self.entity_by_name(entity)?;
                Some(MentionEdge {
                    title: news.title.clone(),
                    label: news.label.clone(),
                    entity: entity.name.clone(),
                    entity_type: entity.entity_type.clone(),
                })
            })
            .take(limit)
            .collect())
    }
}
