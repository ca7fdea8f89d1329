//! Command-line entry point.
//!
//! Opens the configured board (seeding it from the analysis when there is no
//! saved board yet), replays the event script if one is given, saves, and
//! prints the resulting columns.

use clap::Parser;
use driftboard_app::{App, AppConfig, AppError, read_analysis, read_script};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "driftboard",
    about = "Open a Driftboard board, replay recorded UI events, and save it",
    version
)]
struct Args {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project analysis used to seed a board that has not been saved yet
    #[arg(long, value_name = "FILE")]
    analysis: Option<PathBuf>,

    /// Recorded event script (JSON array) to replay
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = AppConfig::load(args.config.as_deref())?;
    let analysis = args.analysis.as_deref().map(read_analysis).transpose()?;

    let mut app = App::open(config, analysis).await?;
    if let Some(script) = &args.script {
        let events = read_script(script)?;
        app.replay(&events).await?;
    }
    app.flush().await?;

    for line in app.summary() {
        println!("{}", line);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::init();
    log::info!("Starting Driftboard");

    match pollster::block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
