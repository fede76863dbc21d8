use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::judging::config::ScoringConfig;
use crate::judging::domain::{Criterion, CriterionId, Jury, JuryId, Team, TeamId, TeamScore};
use crate::judging::scoring::repository::{RepositoryError, ScoreRepository, ScoreSubmission};
use crate::judging::scoring::{scoring_router, ScoringService};
use crate::judging::snapshot::EventRoster;

pub(super) fn roster() -> EventRoster {
    let mut design_only = Jury::new("j3", "carol");
    design_only
        .assigned_criteria
        .insert(CriterionId::new("design"));

    EventRoster {
        event: None,
        teams: vec![Team::new("t1", "Byte Club"), Team::new("t2", "Null Pointers")],
        juries: vec![Jury::new("j1", "alice"), Jury::new("j2", "bob"), design_only],
        criteria: vec![
            Criterion {
                id: CriterionId::new("impact"),
                name: "Impact".to_string(),
                max_score: 10.0,
                weight: 1.0,
                priority_order: 1,
            },
            Criterion {
                id: CriterionId::new("design"),
                name: "Design".to_string(),
                max_score: 5.0,
                weight: 1.0,
                priority_order: 2,
            },
        ],
    }
}

pub(super) fn submission(jury: &str, team: &str, values: &[(&str, f64)]) -> ScoreSubmission {
    ScoreSubmission {
        jury: JuryId::new(jury),
        team: TeamId::new(team),
        scores: values
            .iter()
            .map(|(criterion, value)| (CriterionId::new(*criterion), *value))
            .collect(),
        global_comments: None,
        criterion_comments: BTreeMap::new(),
    }
}

pub(super) fn build_service() -> (ScoringService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ScoringService::new(roster(), repository.clone(), ScoringConfig::default());
    (service, repository)
}

pub(super) fn router_with_service(service: ScoringService<MemoryRepository>) -> axum::Router {
    scoring_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<(JuryId, TeamId), TeamScore>>>,
}

impl ScoreRepository for MemoryRepository {
    fn upsert(&self, record: TeamScore) -> Result<TeamScore, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert((record.jury.clone(), record.team.clone()), record.clone());
        Ok(record)
    }

    fn upsert_unlocked(&self, record: TeamScore) -> Result<TeamScore, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = (record.jury.clone(), record.team.clone());
        if guard.get(&key).is_some_and(|stored| stored.locked) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn fetch(&self, jury: &JuryId, team: &TeamId) -> Result<Option<TeamScore>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(jury.clone(), team.clone())).cloned())
    }

    fn list(&self) -> Result<Vec<TeamScore>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<TeamScore> = guard.values().cloned().collect();
        records.sort_by(|a, b| (&a.jury, &a.team).cmp(&(&b.jury, &b.team)));
        Ok(records)
    }

    fn remove_team(&self, team: &TeamId) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|(_, candidate), _| candidate != team);
        Ok(before - guard.len())
    }

    fn remove_jury(&self, jury: &JuryId) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|(candidate, _), _| candidate != jury);
        Ok(before - guard.len())
    }
}

pub(super) struct UnavailableRepository;

impl ScoreRepository for UnavailableRepository {
    fn upsert(&self, _record: TeamScore) -> Result<TeamScore, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_unlocked(&self, _record: TeamScore) -> Result<TeamScore, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _jury: &JuryId, _team: &TeamId) -> Result<Option<TeamScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<TeamScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_team(&self, _team: &TeamId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_jury(&self, _jury: &JuryId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that applies a queued write right after a read, standing in for a
/// second writer that lands between a fetch and the following write.
#[derive(Default)]
pub(super) struct InterleavingRepository {
    pub(super) inner: MemoryRepository,
    pub(super) after_fetch: Mutex<Option<TeamScore>>,
}

impl InterleavingRepository {
    pub(super) fn queue_after_fetch(&self, record: TeamScore) {
        *self.after_fetch.lock().expect("queue mutex poisoned") = Some(record);
    }
}

impl ScoreRepository for InterleavingRepository {
    fn upsert(&self, record: TeamScore) -> Result<TeamScore, RepositoryError> {
        self.inner.upsert(record)
    }

    fn upsert_unlocked(&self, record: TeamScore) -> Result<TeamScore, RepositoryError> {
        self.inner.upsert_unlocked(record)
    }

    fn fetch(&self, jury: &JuryId, team: &TeamId) -> Result<Option<TeamScore>, RepositoryError> {
        let fetched = self.inner.fetch(jury, team)?;
        let queued = self.after_fetch.lock().expect("queue mutex poisoned").take();
        if let Some(record) = queued {
            self.inner.upsert(record)?;
        }
        Ok(fetched)
    }

    fn list(&self) -> Result<Vec<TeamScore>, RepositoryError> {
        self.inner.list()
    }

    fn remove_team(&self, team: &TeamId) -> Result<usize, RepositoryError> {
        self.inner.remove_team(team)
    }

    fn remove_jury(&self, jury: &JuryId) -> Result<usize, RepositoryError> {
        self.inner.remove_jury(jury)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
