use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier wrapper for scoring criteria.
    CriterionId
);
string_id!(
    /// Identifier wrapper for participating teams.
    TeamId
);
string_id!(
    /// Identifier wrapper for jury members.
    JuryId
);
string_id!(EventId);

fn default_weight() -> f64 {
    1.0
}

/// Named, bounded scoring dimension with a tie-break priority rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub max_score: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub priority_order: u32,
}

impl Criterion {
    /// Bound a raw input value to `[0, max_score]`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.min(self.max_score).max(0.0)
    }
}

/// Criteria sorted by ascending `priority_order`, the tie-break visiting order.
pub fn by_priority(criteria: &[Criterion]) -> Vec<&Criterion> {
    let mut sorted: Vec<&Criterion> = criteria.iter().collect();
    sorted.sort_by_key(|criterion| criterion.priority_order);
    sorted
}

/// Jury member. An empty assignment set means the jury scores every criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jury {
    pub id: JuryId,
    pub username: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub assigned_criteria: BTreeSet<CriterionId>,
}

impl Jury {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: JuryId::new(id),
            username: username.into(),
            assigned_criteria: BTreeSet::new(),
        }
    }

    pub fn is_assigned(&self, criterion: &CriterionId) -> bool {
        self.assigned_criteria.is_empty() || self.assigned_criteria.contains(criterion)
    }
}

/// Participating project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage_time: Option<String>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(id),
            name: name.into(),
            email: None,
            description: None,
            passage_order: None,
            passage_time: None,
        }
    }

    /// Name used on submission platforms: whitespace runs become `_`.
    pub fn platform_name(&self) -> String {
        platform_name(&self.name)
    }
}

pub fn platform_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// One jury's scorecard for one team. Only locked cards count officially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    pub jury: JuryId,
    pub team: TeamId,
    #[serde(default)]
    pub scores: BTreeMap<CriterionId, f64>,
    #[serde(default)]
    pub global_comments: String,
    #[serde(default)]
    pub criterion_comments: BTreeMap<CriterionId, String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TeamScore {
    /// Fresh, unlocked scorecard with nothing recorded.
    pub fn new(jury: JuryId, team: TeamId) -> Self {
        Self {
            jury,
            team,
            scores: BTreeMap::new(),
            global_comments: String::new(),
            criterion_comments: BTreeMap::new(),
            locked: false,
            submitted_at: None,
        }
    }

    pub fn matches(&self, jury: &JuryId, team: &TeamId) -> bool {
        &self.jury == jury && &self.team == team
    }

    /// Raw sum of every recorded value.
    pub fn total(&self) -> f64 {
        self.scores.values().fold(0.0, |acc, value| acc + value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: NaiveDate,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
