//! Planning request record

use serde::{Deserialize, Serialize};

use super::customization::PlanCustomization;
use super::stack::{CodebaseStats, DetectedPattern, HealthScore, SourceStack, TargetStack};

/// Everything needed to build a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub source: SourceStack,

    pub target: TargetStack,

    #[serde(default)]
    pub patterns: Vec<DetectedPattern>,

    #[serde(default)]
    pub codebase_stats: CodebaseStats,

    /// Missing means "use the engine defaults"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<PlanCustomization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<HealthScore>,
}
