//! Fixed term lists used by the risk and visibility heuristics.
//!
//! All entries are lowercase; matching is case-insensitive substring search
//! over the lowercased candidate text.

/// Marketing superlatives that signal templated, ungrounded copy.
pub(crate) const HYPE_TERMS: &[&str] = &[
    "industry-leading",
    "world-class",
    "best-in-class",
    "best in class",
    "revolutionary",
    "luxury",
    "luxurious",
    "unparalleled",
    "cutting-edge",
    "game-changing",
    "award-winning",
    "must-have",
    "premium quality",
    "the ultimate",
];

/// Practical/informational terms an LLM search agent can answer questions from.
pub(crate) const PRACTICAL_TERMS: &[&str] = &[
    "size",
    "sizing",
    "material",
    "care",
    "wash",
    "dimension",
    "weight",
    "warranty",
    "shipping",
    "return",
    "instruction",
    "how to",
    "fit",
    "ingredient",
    "compatib",
    "assembly",
    "storage",
    "maintenance",
];

/// Domain-specific technical vocabulary rewarded by the visibility score.
pub(crate) const TECHNICAL_TERMS: &[&str] = &[
    "specification",
    "certified",
    "capacity",
    "voltage",
    "wattage",
    "stainless",
    "aluminum",
    "cotton",
    "polyester",
    "waterproof",
    "bluetooth",
    "usb",
    "lithium",
    "thread count",
];

/// True when any lexicon term occurs in the (lowercased) text.
pub(crate) fn contains_any(text_lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text_lower.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_any_matches_substring() {
        assert!(contains_any("full dimensions listed below", PRACTICAL_TERMS));
        assert!(!contains_any("nothing relevant here", PRACTICAL_TERMS));
    }

    #[test]
    fn hype_terms_are_all_lowercase() {
        for term in HYPE_TERMS {
            assert_eq!(*term, term.to_lowercase(), "{term} must be lowercase");
        }
    }
}
