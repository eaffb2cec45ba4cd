//! Prompt construction for the LLM providers.

use searchboost_core::{OptimizationSettings, RawResourceContent, ResourceType};

pub(crate) const SYSTEM_PROMPT: &str = "You optimize e-commerce content so that \
LLM-based search agents can discover, summarize, and cite it accurately. Stay \
strictly grounded in the supplied content: never invent facts, figures, \
certifications, or guarantees. Respond with a single JSON object and nothing \
else.";

/// Builds the single user instruction sent to the provider, embedding the raw
/// resource fields, the requested tone, target LLM, keywords, and the required
/// response shape.
pub(crate) fn build_prompt(
    content: &RawResourceContent,
    kind: ResourceType,
    settings: &OptimizationSettings,
) -> String {
    let keywords = if settings.keywords.is_empty() {
        "(none provided)".to_owned()
    } else {
        settings.keywords.join(", ")
    };
    let product_type = content.product_type.as_deref().unwrap_or("(unspecified)");
    let vendor = content.vendor.as_deref().unwrap_or("(unspecified)");

    format!(
        "Rewrite the following Shopify {kind} so that it is maximally useful to \
         {target} and similar LLM search agents. Use a {tone} tone. Work the \
         keywords in naturally where they are truthful: {keywords}.\n\
         \n\
         Title: {title}\n\
         Type: {product_type}\n\
         Vendor: {vendor}\n\
         Description:\n{description}\n\
         \n\
         Return ONLY a JSON object with exactly these keys:\n\
         {{\n\
           \"optimizedTitle\": string,\n\
           \"optimizedDescription\": string,\n\
           \"summary\": string (2-3 grounded sentences),\n\
           \"faqs\": [{{\"question\": string, \"answer\": string}}, ...] (3-5 entries),\n\
           \"jsonLd\": object (schema.org {schema_type}),\n\
           \"llmDescription\": string (dense, factual, for machine consumption)\n\
         }}",
        kind = kind,
        target = settings.target_llm,
        tone = settings.tone,
        keywords = keywords,
        title = content.title,
        product_type = product_type,
        vendor = vendor,
        description = content.description,
        schema_type = match kind {
            ResourceType::Product => "Product",
            ResourceType::Article => "Article",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_content_and_settings() {
        let content = RawResourceContent {
            title: "Copper Kettle".to_owned(),
            description: "Hand-hammered copper kettle, 1.5L.".to_owned(),
            product_type: Some("Kitchenware".to_owned()),
            vendor: None,
        };
        let settings = OptimizationSettings {
            target_llm: "claude".to_owned(),
            keywords: vec!["copper".to_owned(), "kettle".to_owned()],
            tone: "warm".to_owned(),
            enable_versioning: false,
        };
        let prompt = build_prompt(&content, ResourceType::Product, &settings);
        assert!(prompt.contains("Copper Kettle"));
        assert!(prompt.contains("Hand-hammered"));
        assert!(prompt.contains("copper, kettle"));
        assert!(prompt.contains("warm tone"));
        assert!(prompt.contains("claude"));
        assert!(prompt.contains("\"optimizedTitle\""));
        assert!(prompt.contains("schema.org Product"));
    }

    #[test]
    fn article_prompt_requests_article_schema() {
        let content = RawResourceContent {
            title: "Care Guide".to_owned(),
            ..RawResourceContent::default()
        };
        let prompt = build_prompt(&content, ResourceType::Article, &OptimizationSettings::default());
        assert!(prompt.contains("schema.org Article"));
        assert!(prompt.contains("(none provided)"));
    }
}
