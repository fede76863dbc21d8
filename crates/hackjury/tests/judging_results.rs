use hackjury::judging::domain::{Criterion, CriterionId, Jury, JuryId, Team, TeamId, TeamScore};
use hackjury::judging::{
    are_all_teams_scored, calculate_results, get_jury_progress, EventSnapshot, ProgressInfo,
    RankedResult,
};

fn criterion(id: &str, max_score: f64, priority_order: u32) -> Criterion {
    Criterion {
        id: CriterionId::new(id),
        name: id.to_uppercase(),
        max_score,
        weight: 1.0,
        priority_order,
    }
}

fn locked(jury: &str, team: &str, values: &[(&str, f64)]) -> TeamScore {
    let mut record = TeamScore::new(JuryId::new(jury), TeamId::new(team));
    for (criterion, value) in values {
        record.scores.insert(CriterionId::new(*criterion), *value);
    }
    record.locked = true;
    record
}

fn teams() -> Vec<Team> {
    vec![Team::new("T1", "Team One"), Team::new("T2", "Team Two")]
}

fn juries() -> Vec<Jury> {
    vec![Jury::new("J1", "alice"), Jury::new("J2", "bob")]
}

fn order(results: &[RankedResult]) -> Vec<&str> {
    results.iter().map(|result| result.team_id.as_str()).collect()
}

#[test]
fn end_to_end_deliberation() {
    let teams = teams();
    let juries = juries();
    let criteria = vec![criterion("C1", 10.0, 1)];
    let scores = vec![
        locked("J1", "T1", &[("C1", 8.0)]),
        locked("J1", "T2", &[("C1", 8.0)]),
        locked("J2", "T1", &[("C1", 6.0)]),
        locked("J2", "T2", &[("C1", 9.0)]),
    ];

    let results = calculate_results(&teams, &scores, &juries, &criteria);

    assert_eq!(order(&results), vec!["T2", "T1"]);
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[0].total_score, 17.0);
    assert_eq!(results[0].average_score, 8.5);
    assert_eq!(results[1].rank, 2);
    assert_eq!(results[1].total_score, 14.0);
    assert!(are_all_teams_scored(&teams, &juries, &scores));
    assert_eq!(
        get_jury_progress(&JuryId::new("J1"), &teams, &scores),
        ProgressInfo {
            scored: 2,
            total: 2,
            percentage: 100,
        }
    );
}

#[test]
fn tie_on_total_falls_to_priority_criterion() {
    // listed out of priority order on purpose
    let criteria = vec![criterion("C2", 10.0, 2), criterion("C1", 10.0, 1)];
    let juries = vec![Jury::new("J1", "alice")];
    let scores = vec![
        locked("J1", "T1", &[("C1", 4.0), ("C2", 6.0)]),
        locked("J1", "T2", &[("C1", 7.0), ("C2", 3.0)]),
    ];

    let results = calculate_results(&teams(), &scores, &juries, &criteria);

    assert_eq!(results[0].total_score, results[1].total_score);
    assert_eq!(order(&results), vec!["T2", "T1"]);
}

#[test]
fn tie_on_criteria_falls_to_perfect_scores_before_spread() {
    let criteria = vec![criterion("C1", 10.0, 1)];
    let scores = vec![
        locked("J1", "T1", &[("C1", 7.0)]),
        locked("J2", "T1", &[("C1", 7.0)]),
        locked("J1", "T2", &[("C1", 10.0)]),
        locked("J2", "T2", &[("C1", 4.0)]),
    ];

    let results = calculate_results(&teams(), &scores, &juries(), &criteria);

    assert_eq!(order(&results), vec!["T2", "T1"]);
    assert_eq!(results[0].perfect_scores_count, 1);
    assert_eq!(results[0].standard_deviation, 3.0);
    assert_eq!(results[1].standard_deviation, 0.0);
}

#[test]
fn remaining_tie_prefers_consistent_juries() {
    let criteria = vec![criterion("C1", 10.0, 1)];
    let scores = vec![
        locked("J1", "T1", &[("C1", 5.0)]),
        locked("J2", "T1", &[("C1", 9.0)]),
        locked("J1", "T2", &[("C1", 6.0)]),
        locked("J2", "T2", &[("C1", 8.0)]),
    ];

    let results = calculate_results(&teams(), &scores, &juries(), &criteria);

    assert_eq!(order(&results), vec!["T2", "T1"]);
    assert_eq!(results[0].standard_deviation, 1.0);
    assert_eq!(results[1].standard_deviation, 2.0);
}

#[test]
fn full_tie_keeps_input_order() {
    let criteria = vec![criterion("C1", 10.0, 1)];
    let scores = vec![
        locked("J1", "T1", &[("C1", 6.0)]),
        locked("J1", "T2", &[("C1", 6.0)]),
    ];
    let juries = vec![Jury::new("J1", "alice")];

    let forward = calculate_results(&teams(), &scores, &juries, &criteria);
    let mut reversed_teams = teams();
    reversed_teams.reverse();
    let backward = calculate_results(&reversed_teams, &scores, &juries, &criteria);

    assert_eq!(order(&forward), vec!["T1", "T2"]);
    assert_eq!(order(&backward), vec!["T2", "T1"]);
    assert_eq!(
        backward.iter().map(|result| result.rank).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = EventSnapshot {
        teams: teams(),
        juries: juries(),
        criteria: vec![criterion("C1", 10.0, 1)],
        team_scores: vec![locked("J1", "T1", &[("C1", 8.0)])],
    };

    let raw = serde_json::to_string(&snapshot).expect("serializes");
    let parsed: EventSnapshot = serde_json::from_str(&raw).expect("parses");

    assert_eq!(parsed, snapshot);
    assert!(!parsed.all_teams_scored());
}

#[test]
fn snapshot_json_defaults_weight_and_lock_state() {
    let raw = r#"{
        "teams": [{ "id": "T1", "name": "Team One" }],
        "juries": [{ "id": "J1", "username": "alice" }],
        "criteria": [{ "id": "C1", "name": "Impact", "max_score": 10, "priority_order": 1 }],
        "team_scores": [{ "jury": "J1", "team": "T1", "scores": { "C1": 9 } }]
    }"#;

    let snapshot: EventSnapshot = serde_json::from_str(raw).expect("parses");

    assert_eq!(snapshot.criteria[0].weight, 1.0);
    assert!(!snapshot.team_scores[0].locked);
    assert!(snapshot.locked_only().team_scores.is_empty());
}
