use serde::{Deserialize, Serialize};

use super::progress::ProgressScope;
use super::results::ScoringPolicy;

/// Knobs for the open product decisions around aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub policy: ScoringPolicy,
    #[serde(default)]
    pub progress_scope: ProgressScope,
}
