//! Parsing of provider completions into an [`OptimizationResult`].

use searchboost_core::OptimizationResult;

use crate::error::OptimizerError;

/// Parses the text of a provider completion as the required JSON shape.
///
/// Providers frequently wrap JSON in Markdown code fences or lead-in prose;
/// anything outside the outermost `{...}` is ignored.
///
/// # Errors
///
/// Returns [`OptimizerError::InvalidCompletion`] when no JSON object is
/// present or the parsed result has an empty title, and
/// [`OptimizerError::Deserialize`] when the object does not match the
/// expected shape.
pub(crate) fn parse_completion(text: &str) -> Result<OptimizationResult, OptimizerError> {
    let start = text
        .find('{')
        .ok_or_else(|| OptimizerError::InvalidCompletion("no JSON object in completion".into()))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| OptimizerError::InvalidCompletion("unterminated JSON object".into()))?;
    let json = &text[start..=end];

    let result: OptimizationResult =
        serde_json::from_str(json).map_err(|e| OptimizerError::Deserialize {
            context: "provider completion".to_owned(),
            source: e,
        })?;

    if result.optimized_title.trim().is_empty() {
        return Err(OptimizerError::InvalidCompletion(
            "completion has empty optimizedTitle".into(),
        ));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "optimizedTitle": "Widget Pro",
        "optimizedDescription": "A precise widget.",
        "summary": "Widget Pro: a precise widget.",
        "faqs": [{"question": "What is it?", "answer": "A widget."}],
        "jsonLd": {"@type": "Product"},
        "llmDescription": "Widget Pro, precise."
    }"#;

    #[test]
    fn parses_bare_json() {
        let result = parse_completion(VALID).expect("parse");
        assert_eq!(result.optimized_title, "Widget Pro");
        assert_eq!(result.faqs.len(), 1);
    }

    #[test]
    fn parses_code_fenced_json() {
        let fenced = format!("Here you go:\n```json\n{VALID}\n```\nHope that helps!");
        let result = parse_completion(&fenced).expect("parse fenced");
        assert_eq!(result.optimized_title, "Widget Pro");
    }

    #[test]
    fn rejects_prose_without_json() {
        let err = parse_completion("I cannot do that.").unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidCompletion(_)));
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = parse_completion(r#"{"title": "nope"}"#).unwrap_err();
        assert!(matches!(err, OptimizerError::Deserialize { .. }));
    }

    #[test]
    fn rejects_empty_title() {
        let json = VALID.replace("Widget Pro\",", "\",");
        let err = parse_completion(&json).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidCompletion(_)));
    }
}
