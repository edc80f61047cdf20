pub mod memory;
pub mod neo4j_store;
pub mod store;

pub use memory::{InMemoryGraph, NewsNode};
pub use neo4j_store::Neo4jStore;
pub use store::{
    EntityMention, GraphReader, LabelCount, MentionEdge, NewsGraph, SimilarArticle, search_keyword,
};
