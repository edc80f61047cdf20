use index::MentionEdge;
use serde::Serialize;
use std::collections::HashMap;

pub const FAKE_COLOR: &str = "#FF6B6B";
pub const REAL_COLOR: &str = "#4ECDC4";
pub const ENTITY_COLOR: &str = "#FFD93D";

/// Characters of a headline kept in a news node's label.
const TITLE_LABEL_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    /// Hover text.
    pub title: String,
    pub color: &'static str,
    pub size: u32,
    pub shape: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
}

/// Node-link data for the mention graph. Nodes are deduplicated by id; the
/// first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct GraphData {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<(usize, usize)>, // (news_idx, entity_idx)
    pub node_to_idx: HashMap<String, usize>,
}

impl GraphData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mentions(mentions: &[MentionEdge]) -> Self {
        let mut graph = Self::new();

        for mention in mentions {
            let news_label = short_title(&mention.title);
            let news_color = if mention.label == "FAKE" { FAKE_COLOR } else { REAL_COLOR };
            let news_idx = graph.add_node(VisNode {
                id: news_label.clone(),
                label: news_label,
                title: mention.title.clone(),
                color: news_color,
                size: 25,
                shape: "dot",
            });

            let entity_idx = graph.add_node(VisNode {
                id: mention.entity.clone(),
                label: mention.entity.clone(),
                title: format!("Type: {}", mention.entity_type),
                color: ENTITY_COLOR,
                size: 15,
                shape: "diamond",
            });

            graph.add_edge(news_idx, entity_idx);
        }

        graph
    }

    pub fn add_node(&mut self, node: VisNode) -> usize {
        if let Some(&idx) = self.node_to_idx.get(&node.id) {
            return idx;
        }

        let idx = self.nodes.len();
        self.node_to_idx.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    pub fn add_edge(&mut self, source: usize, target: usize) {
        self.edges.push((source, target));
    }

    pub fn vis_edges(&self) -> Vec<VisEdge> {
        self.edges
            .iter()
            .map(|&(from, to)| VisEdge {
                from: self.nodes[from].id.clone(),
                to: self.nodes[to].id.clone(),
            })
            .collect()
    }
}

fn short_title(title: &str) -> String {
    let head: String = title.chars().take(TITLE_LABEL_CHARS).collect();
    format!("{}...", head)
}
