//! Metafield key layout for the draft/publish/rollback lifecycle.
//!
//! All keys live under the single `ai_search_booster` namespace. The backup
//! key is never deleted by rollback; everything else is fair game.

pub(crate) const ORIGINAL_BACKUP: &str = "original_backup";

pub(crate) const DRAFT_CONTENT: &str = "optimized_content_draft";
pub(crate) const DRAFT_FAQ: &str = "faq_data_draft";
pub(crate) const DRAFT_SETTINGS: &str = "optimization_settings_draft";
pub(crate) const DRAFT_TIMESTAMP: &str = "draft_timestamp";

pub(crate) const LIVE_CONTENT: &str = "optimized_content";
pub(crate) const LIVE_FAQ: &str = "faq_data";
pub(crate) const LIVE_SETTINGS: &str = "optimization_settings";
pub(crate) const ENABLE_SCHEMA: &str = "enable_schema";
pub(crate) const PUBLISHED_TIMESTAMP: &str = "published_timestamp";

pub(crate) const CURRENT_VERSION: &str = "current_version";

/// The single draft slot, written and cleared as a unit.
pub(crate) const DRAFT_KEYS: [&str; 4] =
    [DRAFT_CONTENT, DRAFT_FAQ, DRAFT_SETTINGS, DRAFT_TIMESTAMP];

pub(crate) fn version_key(n: u32) -> String {
    format!("optimized_v{n}")
}

pub(crate) fn version_timestamp_key(n: u32) -> String {
    format!("optimized_v{n}_timestamp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_keys_are_numbered() {
        assert_eq!(version_key(1), "optimized_v1");
        assert_eq!(version_timestamp_key(12), "optimized_v12_timestamp");
    }

    #[test]
    fn draft_keys_exclude_the_backup() {
        assert!(!DRAFT_KEYS.contains(&ORIGINAL_BACKUP));
    }
}
