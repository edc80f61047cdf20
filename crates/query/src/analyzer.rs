use std::sync::Arc;
use tracing::{info, warn};

use index::{EntityMention, SimilarArticle};

use crate::llm::{ChatModel, ChatRequest};
use crate::prompt::{SYSTEM_PROMPT, build_analysis_prompt};

pub const TEMPERATURE: f32 = 0.1;
pub const MAX_TOKENS: u32 = 800;

pub const NOT_INITIALIZED: &str = "Groq client not initialized.";

/// Turns retrieved context into a free-text verdict from the chat model.
#[derive(Clone, Default)]
pub struct VerdictGenerator {
    llm: Option<Arc<dyn ChatModel>>,
}

impl VerdictGenerator {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn disconnected() -> Self {
        Self { llm: None }
    }

    pub fn is_connected(&self) -> bool {
        self.llm.is_some()
    }

    pub fn request(
        query: &str,
        articles: &[SimilarArticle],
        entities: &[EntityMention],
    ) -> ChatRequest {
        ChatRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_analysis_prompt(query, articles, entities),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// The model's reply verbatim, or a message describing why there is none.
    pub async fn analyze(
        &self,
        query: &str,
        articles: &[SimilarArticle],
        entities: &[EntityMention],
    ) -> String {
        let Some(llm) = &self.llm else {
            return NOT_INITIALIZED.to_string();
        };

        let request = Self::request(query, articles, entities);
        match llm.chat(&request).await {
            Ok(text) => {
                info!(
                    articles = articles.len(),
                    entities = entities.len(),
                    response_chars = text.len(),
                    "LLM analysis complete"
                );
                text
            }
            Err(e) => {
                warn!(error = %e, "LLM analysis failed");
                format!("Error analyzing with Groq: {}", e)
            }
        }
    }
}
