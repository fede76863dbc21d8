use crate::demo::{run_demo, run_import_teams, run_results, DemoArgs, ImportTeamsArgs, ResultsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hackjury::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "hackjury",
    about = "Score, rank and track hackathon jury deliberations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank the teams of an event snapshot stored as JSON
    Results(ResultsArgs),
    /// Turn a spreadsheet export (CSV) into roster teams
    ImportTeams(ImportTeamsArgs),
    /// Walk through a scripted deliberation on the demo roster
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Results(args) => run_results(args),
        Command::ImportTeams(args) => run_import_teams(args),
        Command::Demo(args) => run_demo(args),
    }
}
