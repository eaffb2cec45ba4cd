//! Pure quality scoring for optimization results.
//!
//! Both scores are total functions over their inputs: no I/O, no failure path,
//! so scoring can never block the draft/publish workflow.

mod lexicon;
mod risk;
mod visibility;

use searchboost_core::{OptimizationResult, QualityScores, RawResourceContent};

pub use risk::hallucination_risk;
pub use visibility::visibility_score;

/// Risk value substituted by callers when a stored assessment is missing or
/// unreadable.
pub const NEUTRAL_RISK: f64 = 0.5;

/// Visibility value substituted by callers when a stored assessment is missing
/// or unreadable.
pub const NEUTRAL_VISIBILITY: u8 = 50;

/// Scores a candidate optimization against the resource's original content.
#[must_use]
pub fn assess(
    result: &OptimizationResult,
    original: &RawResourceContent,
    keywords: &[String],
) -> QualityScores {
    QualityScores {
        risk_score: hallucination_risk(result, original, keywords),
        visibility_score: visibility_score(result, original),
    }
}

/// Neutral scores for content that cannot be assessed.
#[must_use]
pub fn neutral_scores() -> QualityScores {
    QualityScores {
        risk_score: NEUTRAL_RISK,
        visibility_score: NEUTRAL_VISIBILITY,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use searchboost_core::{Faq, OptimizationResult, RawResourceContent};

    pub fn original() -> RawResourceContent {
        RawResourceContent {
            title: "Linen Throw Blanket".to_owned(),
            description: "A soft linen throw blanket woven in Portugal. \
                          Machine washable, 130x170cm."
                .to_owned(),
            ..RawResourceContent::default()
        }
    }

    pub fn grounded_result() -> OptimizationResult {
        OptimizationResult {
            optimized_title: "Linen Throw Blanket — Machine Washable".to_owned(),
            optimized_description: "A soft linen throw blanket woven in Portugal. \
                                    Machine washable for easy care; size 130x170cm."
                .to_owned(),
            summary: "Linen Throw Blanket: soft, machine-washable linen woven in Portugal."
                .to_owned(),
            faqs: vec![
                Faq {
                    question: "What material is the blanket made of?".to_owned(),
                    answer: "It is woven from linen in Portugal.".to_owned(),
                },
                Faq {
                    question: "How do I care for the blanket?".to_owned(),
                    answer: "It is machine washable on a cold, gentle cycle.".to_owned(),
                },
            ],
            json_ld: serde_json::json!({"@type": "Product"}),
            llm_description: "Soft linen throw blanket from Portugal, machine washable, \
                              130x170cm."
                .to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{grounded_result, original};

    #[test]
    fn assess_combines_both_scores() {
        let scores = assess(&grounded_result(), &original(), &[]);
        assert!((0.0..=1.0).contains(&scores.risk_score));
        assert!(scores.visibility_score <= 100);
    }

    #[test]
    fn grounded_result_scores_low_risk_high_visibility() {
        let scores = assess(&grounded_result(), &original(), &["linen".to_owned()]);
        assert!(
            scores.risk_score <= 0.2,
            "grounded output should be low risk, got {}",
            scores.risk_score
        );
        assert!(
            scores.visibility_score >= 80,
            "complete output should be highly visible, got {}",
            scores.visibility_score
        );
    }

    #[test]
    fn neutral_scores_are_the_documented_defaults() {
        let scores = neutral_scores();
        assert!((scores.risk_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(scores.visibility_score, 50);
    }
}
