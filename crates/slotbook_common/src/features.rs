// --- File: crates/slotbook_common/src/features.rs ---
//! Runtime feature gating.
//!
//! A collaborator is active only when its runtime flag is set AND its
//! configuration section is present; either alone is not enough.

/// Check whether a configured collaborator is enabled at runtime.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}
