//! Hackathon judging: scorecards, aggregation, ranking and completion.
//!
//! The pure computations (`results`, `completion`, `progress`, `queue`) take
//! borrowed slices of an event's data and never mutate them. The `scoring`
//! module layers scorecard entry and an HTTP surface on top.

pub mod completion;
pub mod config;
pub mod domain;
pub mod export;
pub mod progress;
pub mod public;
pub mod queue;
pub mod results;
pub mod roster;
pub mod scoring;
pub mod snapshot;

pub use completion::{are_all_teams_scored, completion_status, CompletionStatus};
pub use config::ScoringConfig;
pub use domain::{Criterion, CriterionId, Jury, JuryId, Team, TeamId, TeamScore};
pub use progress::{get_jury_progress, get_jury_progress_with, ProgressInfo, ProgressScope};
pub use public::{public_results, PublicResults};
pub use queue::{live_queue, LiveQueue};
pub use results::{
    calculate_results, calculate_results_with, RankedResult, ResultsCalculator, ScoringPolicy,
};
pub use snapshot::{EventRoster, EventSnapshot};
