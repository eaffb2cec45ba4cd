//! LLM-agent visibility heuristic.

use searchboost_core::{OptimizationResult, RawResourceContent};

use crate::lexicon::{contains_any, PRACTICAL_TERMS, TECHNICAL_TERMS};

const MISSING_FIELD_PENALTY: i32 = 10;
const BONUS: i32 = 5;

/// FAQs shorter than these limits are considered trivial.
const SUBSTANTIVE_QUESTION_CHARS: usize = 10;
const SUBSTANTIVE_ANSWER_CHARS: usize = 20;

/// Estimates how useful the generated content is to an LLM-based search agent.
/// Returns an integer in `[0, 100]`.
///
/// Starts at 100; subtracts 10 for each empty field (summary, LLM description,
/// original body, optimized description), 10 more for fewer than 2 FAQs, and
/// 10 more when no practical/informational terms appear anywhere. Adds 5 back
/// for four or more substantive FAQs and 5 for domain-specific technical
/// vocabulary.
#[must_use]
pub fn visibility_score(result: &OptimizationResult, original: &RawResourceContent) -> u8 {
    let mut score: i32 = 100;

    if result.summary.trim().is_empty() {
        score -= MISSING_FIELD_PENALTY;
    }
    if result.llm_description.trim().is_empty() {
        score -= MISSING_FIELD_PENALTY;
    }
    if original.description.trim().is_empty() {
        score -= MISSING_FIELD_PENALTY;
    }
    if result.optimized_description.trim().is_empty() {
        score -= MISSING_FIELD_PENALTY;
    }

    if result.faqs.len() < 2 {
        score -= MISSING_FIELD_PENALTY;
    }

    let all_text = all_text(result);
    if !contains_any(&all_text, PRACTICAL_TERMS) {
        score -= MISSING_FIELD_PENALTY;
    }

    let substantive = result
        .faqs
        .iter()
        .filter(|f| {
            f.question.trim().chars().count() >= SUBSTANTIVE_QUESTION_CHARS
                && f.answer.trim().chars().count() >= SUBSTANTIVE_ANSWER_CHARS
        })
        .count();
    if substantive >= 4 {
        score += BONUS;
    }

    if contains_any(&all_text, TECHNICAL_TERMS) {
        score += BONUS;
    }

    u8::try_from(score.clamp(0, 100)).unwrap_or(100)
}

fn all_text(result: &OptimizationResult) -> String {
    let faq_text = result
        .faqs
        .iter()
        .map(|f| format!("{} {}", f.question, f.answer))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} {} {} {} {}",
        result.optimized_title,
        result.optimized_description,
        result.summary,
        result.llm_description,
        faq_text
    )
    .to_lowercase()
}
