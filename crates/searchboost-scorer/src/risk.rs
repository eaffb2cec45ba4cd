//! Hallucination-risk heuristic.

use searchboost_core::{OptimizationResult, RawResourceContent};

use crate::lexicon::{contains_any, HYPE_TERMS};

/// Fixed penalty applied per triggered risk signal.
const PENALTY: f64 = 0.2;

/// Smaller penalty for a summary that merely duplicates the title.
const DUPLICATE_SUMMARY_PENALTY: f64 = 0.1;

/// Bonus (subtracted) for a short, hype-free summary that echoes the original
/// title — grounded output.
const GROUNDED_SUMMARY_BONUS: f64 = 0.2;

/// Summaries at or below this length qualify for the grounded bonus.
const SHORT_SUMMARY_CHARS: usize = 200;

/// Estimates how likely the generated content diverged ungroundedly from the
/// source material. Returns a value in `[0.0, 1.0]` rounded to 2 decimals.
///
/// Penalties (0.2 each): hype superlatives anywhere in the generated text,
/// "guarantee" language in FAQs, generated text more than 3x the original
/// length, and none of the requested keywords appearing anywhere. A 0.1
/// penalty applies when the summary duplicates the title verbatim, and a 0.2
/// bonus when the summary is short, hype-free, and echoes the original title.
#[must_use]
pub fn hallucination_risk(
    result: &OptimizationResult,
    original: &RawResourceContent,
    keywords: &[String],
) -> f64 {
    let mut risk = 0.0_f64;

    let generated = generated_text(result);
    let faq_text = faq_text(result);

    if contains_any(&generated, HYPE_TERMS) {
        risk += PENALTY;
    }

    if faq_text.contains("guarantee") {
        risk += PENALTY;
    }

    let original_len = original.title.chars().count() + original.description.chars().count();
    let generated_len = generated.chars().count() + faq_text.chars().count();
    if generated_len > original_len.saturating_mul(3) {
        risk += PENALTY;
    }

    let requested: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if !requested.is_empty() {
        let searchable = format!("{generated} {faq_text}");
        if !requested.iter().any(|k| searchable.contains(k)) {
            risk += PENALTY;
        }
    }

    let summary = result.summary.trim();
    let title = result.optimized_title.trim();
    if !summary.is_empty() && summary.eq_ignore_ascii_case(title) {
        risk += DUPLICATE_SUMMARY_PENALTY;
    }

    if is_grounded_summary(summary, &original.title) {
        risk -= GROUNDED_SUMMARY_BONUS;
    }

    round2(risk.clamp(0.0, 1.0))
}

/// Short, free of hype, and textually echoing the original title.
fn is_grounded_summary(summary: &str, original_title: &str) -> bool {
    let title = original_title.trim().to_lowercase();
    if summary.is_empty() || title.is_empty() {
        return false;
    }
    let summary_lower = summary.to_lowercase();
    summary.chars().count() <= SHORT_SUMMARY_CHARS
        && !contains_any(&summary_lower, HYPE_TERMS)
        && summary_lower.contains(&title)
}

fn generated_text(result: &OptimizationResult) -> String {
    format!(
        "{} {} {} {}",
        result.optimized_title, result.optimized_description, result.summary,
        result.llm_description
    )
    .to_lowercase()
}

fn faq_text(result: &OptimizationResult) -> String {
    result
        .faqs
        .iter()
        .map(|f| format!("{} {}", f.question, f.answer))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
