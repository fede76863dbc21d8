//! Scorecard entry and locking over an injected repository, plus the HTTP
//! surface exposing the standings derived from locked cards.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    RepositoryError, ScoreRepository, ScoreSubmission, ScorecardView,
};
pub use router::scoring_router;
pub use service::{ScoringService, ScoringServiceError};
