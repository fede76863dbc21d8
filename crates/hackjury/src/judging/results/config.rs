use serde::{Deserialize, Serialize};

/// How recorded values are folded into jury and team totals.
///
/// `RawSum` is the canonical policy used for official rankings. `Weighted`
/// multiplies each value by its criterion weight and must be opted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    #[default]
    RawSum,
    Weighted,
}

impl ScoringPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" | "raw_sum" | "sum" => Some(Self::RawSum),
            "weighted" => Some(Self::Weighted),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RawSum => "raw_sum",
            Self::Weighted => "weighted",
        }
    }
}
