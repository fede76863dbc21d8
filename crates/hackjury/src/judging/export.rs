use std::collections::HashMap;
use std::io::Write;

use super::domain::{by_priority, Criterion, CriterionId, Jury, JuryId, Team, TeamId, TeamScore};
use super::results::RankedResult;

const MISSING: &str = "-";
const GLOBAL_COMMENT: &str = "global";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Whole numbers without a decimal tail, everything else to two places.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Ranked leaderboard with the per-criterion and per-jury breakdown.
pub fn export_results<W: Write>(
    writer: W,
    results: &[RankedResult],
    criteria: &[Criterion],
    juries: &[Jury],
) -> Result<(), ExportError> {
    let prioritized = by_priority(criteria);
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        "Rank".to_string(),
        "Team".to_string(),
        "Platform Name".to_string(),
        "Total".to_string(),
        "Average".to_string(),
    ];
    header.extend(prioritized.iter().map(|criterion| criterion.name.clone()));
    header.push("Perfect Scores".to_string());
    header.push("Std Dev".to_string());
    header.extend(juries.iter().map(|jury| jury.username.clone()));
    csv_writer.write_record(&header)?;

    for result in results {
        let mut row = vec![
            result.rank.to_string(),
            result.team_name.clone(),
            result.platform_name.clone(),
            format_score(result.total_score),
            format!("{:.2}", result.average_score),
        ];
        row.extend(
            prioritized
                .iter()
                .map(|criterion| format_score(result.criterion_score(&criterion.id))),
        );
        row.push(result.perfect_scores_count.to_string());
        row.push(format!("{:.2}", result.standard_deviation));
        row.extend(juries.iter().map(|jury| {
            result
                .jury_scores
                .iter()
                .find(|breakdown| breakdown.jury_id == jury.id)
                .map(|breakdown| format_score(breakdown.total))
                .unwrap_or_else(|| MISSING.to_string())
        }));
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Every non-empty jury comment, in roster order.
pub fn export_comments<W: Write>(
    writer: W,
    team_scores: &[TeamScore],
    teams: &[Team],
    juries: &[Jury],
    criteria: &[Criterion],
) -> Result<(), ExportError> {
    let criterion_names: HashMap<&CriterionId, &str> = criteria
        .iter()
        .map(|criterion| (&criterion.id, criterion.name.as_str()))
        .collect();
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Team", "Jury", "Criterion", "Comment"])?;

    for team in teams {
        for jury in juries {
            let Some(record) = find_card(team_scores, &jury.id, &team.id) else {
                continue;
            };

            let global = record.global_comments.trim();
            if !global.is_empty() {
                csv_writer.write_record([
                    team.name.as_str(),
                    jury.username.as_str(),
                    GLOBAL_COMMENT,
                    global,
                ])?;
            }

            for (criterion, comment) in &record.criterion_comments {
                let comment = comment.trim();
                if comment.is_empty() {
                    continue;
                }
                let name = criterion_names
                    .get(criterion)
                    .copied()
                    .unwrap_or(criterion.as_str());
                csv_writer.write_record([team.name.as_str(), jury.username.as_str(), name, comment])?;
            }
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Team roster with platform names and pitch slots.
pub fn export_teams<W: Write>(writer: W, teams: &[Team]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Project Name",
        "Platform Name",
        "Email",
        "Passage Order",
        "Passage Time",
    ])?;

    for team in teams {
        csv_writer.write_record([
            team.name.clone(),
            team.platform_name(),
            team.email.clone().unwrap_or_else(|| MISSING.to_string()),
            team.passage_order
                .map(|order| order.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            team.passage_time
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn results_to_csv(
    results: &[RankedResult],
    criteria: &[Criterion],
    juries: &[Jury],
) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    export_results(&mut buffer, results, criteria, juries)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn comments_to_csv(
    team_scores: &[TeamScore],
    teams: &[Team],
    juries: &[Jury],
    criteria: &[Criterion],
) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    export_comments(&mut buffer, team_scores, teams, juries, criteria)?;
    Ok(String::from_utf8(buffer)?)
}

fn find_card<'a>(team_scores: &'a [TeamScore], jury: &JuryId, team: &TeamId) -> Option<&'a TeamScore> {
    team_scores.iter().find(|record| record.matches(jury, team))
}
