//! Plan customization options

use serde::{Deserialize, Serialize};

/// Trade-off between migration speed and caution
///
/// Only affects time estimates (and the migration-guide predicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl Aggressiveness {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
        }
    }
}

/// Caller-supplied planning options
///
/// Every field is optional in serialized form; missing values fall back
/// to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanCustomization {
    pub aggressiveness: Aggressiveness,

    /// Transformation ids explicitly enabled (informational)
    pub enabled_transformations: Vec<String>,

    /// Pattern ids to exclude (deny-list)
    pub disabled_transformations: Vec<String>,

    /// Pattern ids to keep (allow-list); empty means "all"
    pub selected_patterns: Vec<String>,

    pub skip_tests: bool,

    pub skip_documentation: bool,
}

impl PlanCustomization {
    /// Fresh customization carrying the given default aggressiveness
    pub fn with_aggressiveness(aggressiveness: Aggressiveness) -> Self {
        Self {
            aggressiveness,
            ..Default::default()
        }
    }

    /// Merge caller options over defaults
    ///
    /// `None` yields the defaults unchanged. Lists are copied so the caller's
    /// instance is never shared with the plan.
    pub fn merged_with_defaults(
        options: Option<&PlanCustomization>,
        defaults: &PlanCustomization,
    ) -> Self {
        match options {
            Some(opts) => opts.clone(),
            None => defaults.clone(),
        }
    }

    /// Inclusion gate for a pattern id
    ///
    /// A pattern is excluded when a non-empty allow-list exists and does not
    /// contain it, or when it is on the deny-list.
    pub fn should_include_pattern(&self, pattern_id: &str) -> bool {
        if !self.selected_patterns.is_empty()
            && !self.selected_patterns.iter().any(|id| id == pattern_id)
        {
            return false;
        }
        !self.disabled_transformations.iter().any(|id| id == pattern_id)
    }
}
