use index::{EntityMention, SimilarArticle};

pub const SYSTEM_PROMPT: &str = "You are a fake news detection expert.";

/// Characters of each article body quoted in the prompt.
pub const PREVIEW_CHARS: usize = 200;

pub fn format_articles(articles: &[SimilarArticle]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let preview: String = article.text.chars().take(PREVIEW_CHARS).collect();
            format!(
                "Article {}: {} (Label: {})\n{}...",
                i + 1,
                article.title,
                article.label,
                preview
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_entities(entities: &[EntityMention]) -> String {
    entities
        .iter()
        .map(|e| {
            format!(
                "- {} ({}): Mentioned {} times",
                e.entity, e.entity_type, e.mention_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_analysis_prompt(
    query: &str,
    articles: &[SimilarArticle],
    entities: &[EntityMention],
) -> String {
    format!(
        r#"FAKE NEWS ANALYSIS TASK:

USER QUERY: "{}"

CONTEXT FROM DATABASE:

SIMILAR PAST ARTICLES:
{}

RELATED ENTITIES:
{}

INSTRUCTIONS:
1. Analyze if the user's query/news is likely FAKE or REAL
2. Base your analysis on the similar articles and entities
3. If entities are frequently associated with fake news, mention this
4. Provide a confidence score (0-100%)
5. Give specific reasons for your verdict

OUTPUT FORMAT:
Verdict: [FAKE/REAL]
Confidence: [X]%
Reasons:
1. [Reason 1]
2. [Reason 2]

Analysis:
[Detailed Analysis]
"#,
        query,
        format_articles(articles),
        format_entities(entities)
    )
}
