use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use vacancy_stats::cli::Cli;
use vacancy_stats::{commands, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    info!("Starting vacancy-stats");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Ошибка: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(cli.command, &mut out).context("не удалось выполнить команду")?;
    Ok(())
}
