use crate::demo::{
    run_actions, run_assessment, run_controls, run_demo, run_kpi, ActionsArgs, AssessArgs,
    ControlsArgs, KpiArgs,
};
use crate::infra::JsonFileStore;
use clap::{Parser, Subcommand};
use roi_dashboard::config::AppConfig;
use roi_dashboard::error::AppError;
use roi_dashboard::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "ROI Dashboard",
    about = "Browse controls, action items and KPIs and run the readiness assessment from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List controls with optional filters
    Controls(ControlsArgs),
    /// List action items with optional filters
    Actions(ActionsArgs),
    /// Open a KPI detail view by route slug
    Kpi(KpiArgs),
    /// Record answers and evaluate the readiness assessment
    Assess(AssessArgs),
    /// Walk through every view with mock data (default command)
    Demo,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, store = %config.storage.store_path.display(), "configuration loaded");

    let store = JsonFileStore::new(&config.storage.store_path);

    match cli.command.unwrap_or(Command::Demo) {
        Command::Controls(args) => run_controls(args, &store),
        Command::Actions(args) => run_actions(args, &store),
        Command::Kpi(args) => run_kpi(args),
        Command::Assess(args) => run_assessment(args, &store, &config),
        Command::Demo => run_demo(&config),
    }
}
