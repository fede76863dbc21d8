use crate::cli::OutputFormat;
use crate::infra::{demo_roster, load_snapshot, InMemoryScoreRepository};
use clap::Args;
use hackjury::error::AppError;
use hackjury::judging::domain::{by_priority, Criterion, CriterionId, JuryId, TeamId};
use hackjury::judging::export::{export_results, export_teams, format_score};
use hackjury::judging::roster::{ColumnMapping, RosterImporter};
use hackjury::judging::scoring::{ScoreSubmission, ScoringService, ScoringServiceError};
use hackjury::judging::{
    EventRoster, LiveQueue, PublicResults, RankedResult, ScoringConfig, ScoringPolicy,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ResultsArgs {
    /// JSON file holding teams, juries, criteria and team_scores
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Count unlocked drafts too (the official ranking ignores them)
    #[arg(long)]
    pub(crate) include_drafts: bool,
    /// Aggregation policy: raw (default) or weighted
    #[arg(long, value_parser = crate::infra::parse_policy)]
    pub(crate) policy: Option<ScoringPolicy>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportTeamsArgs {
    /// CSV export of the registration sheet
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Header of the column holding project names
    #[arg(long)]
    pub(crate) name_column: String,
    #[arg(long)]
    pub(crate) email_column: Option<String>,
    #[arg(long)]
    pub(crate) description_column: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Aggregation policy used for the standings
    #[arg(long, value_parser = crate::infra::parse_policy)]
    pub(crate) policy: Option<ScoringPolicy>,
    /// Lock every remaining scorecard so the public ranking is revealed
    #[arg(long)]
    pub(crate) finish: bool,
}

pub(crate) fn run_results(args: ResultsArgs) -> Result<(), AppError> {
    let ResultsArgs {
        snapshot,
        format,
        include_drafts,
        policy,
    } = args;

    let snapshot = load_snapshot(&snapshot)?;
    let snapshot = if include_drafts {
        snapshot
    } else {
        snapshot.locked_only()
    };
    let results = snapshot.results(policy.unwrap_or_default());

    match format {
        OutputFormat::Table => {
            print!("{}", render_results_table(&results, &snapshot.criteria));
            let completion = snapshot.completion();
            println!(
                "Locked scorecards: {}/{}{}",
                completion.locked_pairs,
                completion.expected_pairs,
                if completion.complete { " (complete)" } else { "" }
            );
        }
        OutputFormat::Csv => {
            export_results(
                std::io::stdout().lock(),
                &results,
                &snapshot.criteria,
                &snapshot.juries,
            )?;
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    Ok(())
}

pub(crate) fn run_import_teams(args: ImportTeamsArgs) -> Result<(), AppError> {
    let ImportTeamsArgs {
        csv,
        name_column,
        email_column,
        description_column,
        format,
    } = args;

    let preview = RosterImporter::preview_path(&csv)?;
    let mapping = ColumnMapping {
        name: name_column,
        description: description_column,
        email: email_column,
    };
    let teams: Vec<_> = RosterImporter::extract_teams_from_path(&csv, &mapping)?
        .into_iter()
        .enumerate()
        .map(|(position, imported)| imported.into_team(position))
        .collect();

    match format {
        OutputFormat::Table => {
            println!(
                "Columns: {} | {} data rows | {} teams imported",
                preview.headers.join(", "),
                preview.total_rows,
                teams.len()
            );
            for team in &teams {
                println!(
                    "- {} ({}){}",
                    team.name,
                    team.platform_name(),
                    team.email
                        .as_deref()
                        .map(|email| format!(" <{email}>"))
                        .unwrap_or_default()
                );
            }
        }
        OutputFormat::Csv => export_teams(std::io::stdout().lock(), &teams)?,
        OutputFormat::Json => {
            let roster = EventRoster {
                teams,
                ..EventRoster::default()
            };
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { policy, finish } = args;
    let config = ScoringConfig {
        policy: policy.unwrap_or_default(),
        ..ScoringConfig::default()
    };

    let roster = demo_roster();
    let event_label = roster
        .event
        .as_ref()
        .map(|event| format!("{} ({}, {})", event.name, event.date, event.status.label()))
        .unwrap_or_else(|| "unnamed event".to_string());
    let juries = roster.juries.clone();
    let criteria = roster.criteria.clone();
    let repository = Arc::new(InMemoryScoreRepository::default());
    let service = ScoringService::new(roster, repository, config);

    println!(
        "Hackathon judging demo: {event_label} | {} policy",
        config.policy.label()
    );
    if let Err(err) = seed_deliberation(&service, finish) {
        println!("  Scoring unavailable: {err}");
        return Ok(());
    }

    match service.queue() {
        Ok(queue) => render_queue(&queue),
        Err(err) => println!("  Queue unavailable: {err}"),
    }

    println!("\nJury progress");
    for jury in &juries {
        match service.progress(&jury.id) {
            Ok(progress) => println!(
                "- {}: {}/{} teams locked ({}%)",
                jury.username, progress.scored, progress.total, progress.percentage
            ),
            Err(err) => println!("- {}: unavailable ({err})", jury.username),
        }
    }

    println!("\nOfficial standings (locked scorecards only)");
    match service.results() {
        Ok(results) => print!("{}", render_results_table(&results, &criteria)),
        Err(err) => println!("  Results unavailable: {err}"),
    }

    match service.public_results(false) {
        Ok(PublicResults::Pending { completion }) => println!(
            "\nPublic page: pending, {}/{} scorecards locked, {} missing",
            completion.locked_pairs,
            completion.expected_pairs,
            completion.missing.len()
        ),
        Ok(PublicResults::Revealed { ranking, .. }) => {
            if let Some(winner) = ranking.first() {
                println!(
                    "\nPublic page: revealed, winner {} with {}",
                    winner.team_name,
                    format_score(winner.total_score)
                );
            }
        }
        Err(err) => println!("\nPublic page unavailable: {err}"),
    }

    Ok(())
}

/// Scripted scoring session: the first two teams are fully locked, the third
/// is mid-deliberation and the fourth has not pitched yet.
fn seed_deliberation<R>(service: &ScoringService<R>, finish: bool) -> Result<(), ScoringServiceError>
where
    R: hackjury::judging::scoring::ScoreRepository + 'static,
{
    let plan: [(&str, &str, &[(&str, f64)], bool); 8] = [
        ("jury-ada", "team-1", &[("innovation", 8.0), ("execution", 7.0), ("pitch", 4.0)], true),
        ("jury-linus", "team-1", &[("innovation", 7.0), ("execution", 9.0), ("pitch", 3.5)], true),
        ("jury-grace", "team-1", &[("pitch", 4.5)], true),
        ("jury-ada", "team-2", &[("innovation", 9.0), ("execution", 6.0), ("pitch", 5.0)], true),
        ("jury-linus", "team-2", &[("innovation", 8.0), ("execution", 8.0), ("pitch", 4.0)], true),
        ("jury-grace", "team-2", &[("pitch", 3.0)], true),
        ("jury-ada", "team-3", &[("innovation", 6.0), ("execution", 10.0), ("pitch", 3.0)], true),
        ("jury-linus", "team-3", &[("innovation", 7.0)], false),
    ];

    for (jury, team, values, lock) in plan {
        service.save(submission(jury, team, values))?;
        if lock || finish {
            service.lock(&JuryId::new(jury), &TeamId::new(team))?;
        }
    }

    if finish {
        let remaining: [(&str, &str, &[(&str, f64)]); 4] = [
            ("jury-grace", "team-3", &[("pitch", 4.0)]),
            ("jury-ada", "team-4", &[("innovation", 5.0), ("execution", 6.0), ("pitch", 2.5)]),
            ("jury-linus", "team-4", &[("innovation", 6.0), ("execution", 5.0), ("pitch", 3.0)]),
            ("jury-grace", "team-4", &[("pitch", 3.5)]),
        ];
        for (jury, team, values) in remaining {
            service.save(submission(jury, team, values))?;
            service.lock(&JuryId::new(jury), &TeamId::new(team))?;
        }
    }

    Ok(())
}

fn submission(jury: &str, team: &str, values: &[(&str, f64)]) -> ScoreSubmission {
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

fn render_queue(queue: &LiveQueue) {
    println!("\nPitch queue");
    match &queue.current {
        Some(entry) => println!(
            "- On stage: #{} {} ({}/{} juries locked)",
            entry.passage_order, entry.team_name, entry.locked_count, entry.jury_count
        ),
        None => println!("- On stage: nobody, every scheduled team is scored"),
    }
    for entry in &queue.upcoming {
        println!(
            "- Next: #{} {}{}",
            entry.passage_order,
            entry.team_name,
            entry
                .passage_time
                .as_deref()
                .map(|time| format!(" at {time}"))
                .unwrap_or_default()
        );
    }
    println!("- Done: {} teams", queue.completed.len());
}

pub(crate) fn render_results_table(results: &[RankedResult], criteria: &[Criterion]) -> String {
    let prioritized = by_priority(criteria);
    let mut out = format!("{:<5} {:<24} {:>8} {:>8}", "Rank", "Team", "Total", "Average");
    for criterion in &prioritized {
        out.push_str(&format!(" {:>12}", truncate(&criterion.name, 12)));
    }
    out.push_str(&format!(" {:>7} {:>7}\n", "Perfect", "StdDev"));

    for result in results {
        out.push_str(&format!(
            "{:<5} {:<24} {:>8} {:>8.2}",
            result.rank,
            truncate(&result.team_name, 24),
            format_score(result.total_score),
            result.average_score
        ));
        for criterion in &prioritized {
            out.push_str(&format!(
                " {:>12}",
                format_score(result.criterion_score(&criterion.id))
            ));
        }
        out.push_str(&format!(
            " {:>7} {:>7.2}\n",
            result.perfect_scores_count, result.standard_deviation
        ));
    }
    out
}

fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}
