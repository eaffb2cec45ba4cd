//! Deterministic fallback optimization.
//!
//! Used when no provider is configured, mock mode is on, or the provider call
//! fails. Built entirely from the raw content with templated phrasing — no
//! invented facts.

use searchboost_core::{
    Faq, OptimizationResult, OptimizationSettings, RawResourceContent, ResourceType,
};

const MAX_LLM_DESCRIPTION_CHARS: usize = 500;

/// Builds an [`OptimizationResult`] directly from the raw content.
///
/// `optimized_title` is the raw title verbatim and `summary` always contains
/// the literal title text.
#[must_use]
pub fn fallback_result(
    content: &RawResourceContent,
    kind: ResourceType,
    settings: &OptimizationSettings,
) -> OptimizationResult {
    let title = content.title.trim();
    let description = content.description.trim();

    let summary = if description.is_empty() {
        format!("{title} — full details are available on the {kind} page.")
    } else {
        format!("{title}: {}", first_sentence(description))
    };

    let optimized_description = if description.is_empty() {
        format!("{title}. See the {kind} page for specifications, sizing, and care details.")
    } else {
        description.to_owned()
    };

    let mut faqs = vec![
        Faq {
            question: format!("What is {title}?"),
            answer: if description.is_empty() {
                format!("{title} is described in full on its {kind} page.")
            } else {
                first_sentence(description)
            },
        },
        Faq {
            question: format!("Where can I find more details about {title}?"),
            answer: "The description covers materials, sizing, and care information where \
                     available."
                .to_owned(),
        },
    ];
    let keywords: Vec<&str> = settings
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        faqs.push(Faq {
            question: format!("What topics does {title} relate to?"),
            answer: format!("Related topics include {}.", keywords.join(", ")),
        });
    }

    let json_ld = match kind {
        ResourceType::Product => serde_json::json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "name": title,
            "description": optimized_description,
        }),
        ResourceType::Article => serde_json::json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": title,
            "description": optimized_description,
        }),
    };

    let llm_description = truncate_chars(
        &format!("{title}. {optimized_description}"),
        MAX_LLM_DESCRIPTION_CHARS,
    );

    OptimizationResult {
        optimized_title: title.to_owned(),
        optimized_description,
        summary,
        faqs,
        json_ld,
        llm_description,
    }
}

/// First sentence of the text, capped at 140 characters.
fn first_sentence(text: &str) -> String {
    let sentence = text
        .split_inclusive(['.', '!', '?'])
        .next()
        .unwrap_or(text)
        .trim();
    truncate_chars(sentence, 140)
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        text.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_with_no_provider_keeps_title_and_summary_contains_it() {
        let content = RawResourceContent {
            title: "Widget".to_owned(),
            description: String::new(),
            ..RawResourceContent::default()
        };
        let result = fallback_result(
            &content,
            ResourceType::Product,
            &OptimizationSettings::default(),
        );
        assert_eq!(result.optimized_title, "Widget");
        assert!(
            result.summary.contains("Widget"),
            "summary must contain the literal title: {}",
            result.summary
        );
        assert!(result.faqs.len() >= 2);
        assert_eq!(result.json_ld["@type"], serde_json::json!("Product"));
    }

    #[test]
    fn fallback_is_deterministic() {
        let content = RawResourceContent {
            title: "Teapot".to_owned(),
            description: "Cast iron teapot. Holds 900ml.".to_owned(),
            ..RawResourceContent::default()
        };
        let settings = OptimizationSettings::default();
        let a = fallback_result(&content, ResourceType::Product, &settings);
        let b = fallback_result(&content, ResourceType::Product, &settings);
        assert_eq!(a, b);
    }

    #[test]
    fn keywords_appear_in_a_faq_answer() {
        let content = RawResourceContent {
            title: "Trail Shoe".to_owned(),
            description: "Lightweight trail running shoe.".to_owned(),
            ..RawResourceContent::default()
        };
        let settings = OptimizationSettings {
            keywords: vec!["trail running".to_owned(), "grip".to_owned()],
            ..OptimizationSettings::default()
        };
        let result = fallback_result(&content, ResourceType::Product, &settings);
        let answers: String = result
            .faqs
            .iter()
            .map(|f| f.answer.clone())
            .collect::<Vec<_>>()
            .join(" ");
        assert!(answers.contains("trail running"));
        assert!(answers.contains("grip"));
    }

    #[test]
    fn article_fallback_uses_article_schema() {
        let content = RawResourceContent {
            title: "How to Season Cast Iron".to_owned(),
            description: "A practical guide. Covers oils and temperatures.".to_owned(),
            ..RawResourceContent::default()
        };
        let result = fallback_result(
            &content,
            ResourceType::Article,
            &OptimizationSettings::default(),
        );
        assert_eq!(result.json_ld["@type"], serde_json::json!("Article"));
        assert_eq!(
            result.json_ld["headline"],
            serde_json::json!("How to Season Cast Iron")
        );
    }

    #[test]
    fn long_descriptions_are_truncated_for_llm_description() {
        let content = RawResourceContent {
            title: "Rug".to_owned(),
            description: "word ".repeat(300),
            ..RawResourceContent::default()
        };
        let result = fallback_result(
            &content,
            ResourceType::Product,
            &OptimizationSettings::default(),
        );
        assert!(result.llm_description.chars().count() <= 500);
    }
}
