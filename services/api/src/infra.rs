use hackjury::error::AppError;
use chrono::NaiveDate;
use hackjury::judging::domain::{
    Criterion, CriterionId, Event, EventId, EventStatus, Jury, JuryId, Team, TeamId, TeamScore,
};
use hackjury::judging::scoring::{RepositoryError, ScoreRepository};
use hackjury::judging::{EventRoster, EventSnapshot, ScoringPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local scorecard store; contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreRepository {
    records: Arc<Mutex<HashMap<(JuryId, TeamId), TeamScore>>>,
}

impl InMemoryScoreRepository {
    fn records(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<(JuryId, TeamId), TeamScore>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("score store lock poisoned".to_string()))
    }
}

impl ScoreRepository for InMemoryScoreRepository {
    fn upsert(&self, record: TeamScore) -> Result<TeamScore, RepositoryError> {
        let mut guard = self.records()?;
        guard.insert((record.jury.clone(), record.team.clone()), record.clone());
        Ok(record)
    }

    fn upsert_unlocked(&self, record: TeamScore) -> Result<TeamScore, RepositoryError> {
        let mut guard = self.records()?;
        let key = (record.jury.clone(), record.team.clone());
        if guard.get(&key).is_some_and(|stored| stored.locked) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn fetch(&self, jury: &JuryId, team: &TeamId) -> Result<Option<TeamScore>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.get(&(jury.clone(), team.clone())).cloned())
    }

    fn list(&self) -> Result<Vec<TeamScore>, RepositoryError> {
        let guard = self.records()?;
        let mut records: Vec<TeamScore> = guard.values().cloned().collect();
        // stable output for the first-match-per-jury rule
        records.sort_by(|a, b| (&a.jury, &a.team).cmp(&(&b.jury, &b.team)));
        Ok(records)
    }

    fn remove_team(&self, team: &TeamId) -> Result<usize, RepositoryError> {
        let mut guard = self.records()?;
        let before = guard.len();
        guard.retain(|(_, candidate), _| candidate != team);
        Ok(before - guard.len())
    }

    fn remove_jury(&self, jury: &JuryId) -> Result<usize, RepositoryError> {
        let mut guard = self.records()?;
        let before = guard.len();
        guard.retain(|(candidate, _), _| candidate != jury);
        Ok(before - guard.len())
    }
}

pub(crate) fn load_roster(path: &Path) -> Result<EventRoster, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn load_snapshot(path: &Path) -> Result<EventSnapshot, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_policy(raw: &str) -> Result<ScoringPolicy, String> {
    ScoringPolicy::parse(raw).ok_or_else(|| format!("unknown scoring policy '{raw}' (raw|weighted)"))
}

/// Small event used by `serve` without a roster file and by the demo.
pub(crate) fn demo_roster() -> EventRoster {
    let slots = [
        ("team-1", "Byte Club", "14h00"),
        ("team-2", "Null Pointers", "14h15"),
        ("team-3", "Rusty Gears", "14h30"),
        ("team-4", "Lambda Lounge", "14h45"),
    ];
    let teams = slots
        .iter()
        .zip(1..)
        .map(|((id, name, time), order)| {
            let mut team = Team::new(*id, *name);
            team.passage_order = Some(order);
            team.passage_time = Some(time.to_string());
            team
        })
        .collect();

    let mut grace = Jury::new("jury-grace", "grace");
    grace.assigned_criteria.insert(CriterionId::new("pitch"));

    let event = NaiveDate::from_ymd_opt(2026, 4, 18).map(|date| Event {
        id: EventId::new("spring-hack-night"),
        name: "Spring Hack Night".to_string(),
        date,
        status: EventStatus::Ongoing,
        description: None,
    });

    EventRoster {
        event,
        teams,
        juries: vec![
            Jury::new("jury-ada", "ada"),
            Jury::new("jury-linus", "linus"),
            grace,
        ],
        criteria: vec![
            criterion("innovation", "Innovation", 10.0, 1.5, 1),
            criterion("execution", "Technical execution", 10.0, 1.0, 2),
            criterion("pitch", "Pitch", 5.0, 0.5, 3),
        ],
    }
}

fn criterion(id: &str, name: &str, max_score: f64, weight: f64, priority_order: u32) -> Criterion {
    Criterion {
        id: CriterionId::new(id),
        name: name.to_string(),
        max_score,
        weight,
        priority_order,
    }
}
