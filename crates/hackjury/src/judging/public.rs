use serde::Serialize;

use super::completion::CompletionStatus;
use super::results::{RankedResult, ScoringPolicy};
use super::snapshot::EventSnapshot;

/// What the public results page may show.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PublicResults {
    /// Deliberation still running; only completion figures are disclosed.
    Pending { completion: CompletionStatus },
    Revealed {
        forced: bool,
        ranking: Vec<RankedResult>,
    },
}

impl PublicResults {
    pub fn is_revealed(&self) -> bool {
        matches!(self, PublicResults::Revealed { .. })
    }
}

/// Gate the leaderboard on completion. Drafts never reach the public ranking.
///
/// `reveal` lets an organizer force the reveal before every card is locked.
pub fn public_results(snapshot: &EventSnapshot, policy: ScoringPolicy, reveal: bool) -> PublicResults {
    let official = snapshot.locked_only();
    let completion = official.completion();

    if !completion.complete && !reveal {
        return PublicResults::Pending { completion };
    }

    PublicResults::Revealed {
        forced: !completion.complete,
        ranking: official.results(policy),
    }
}
