mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::io::Write;
use std::process::ExitCode;

use quotesnap_core::YahooConfig;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(error) = logging::init_logging(logging::DEFAULT_LOG_LEVEL) {
        eprintln!("warning: {error}");
    }

    let cli = Cli::from_args_os(std::env::args_os());

    match run(&cli, YahooConfig::default(), std::io::stdout().lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run<W: Write>(cli: &Cli, config: YahooConfig, mut writer: W) -> Result<(), CliError> {
    let batch = commands::run(&cli.symbols(), config).await;
    output::write_batch(&mut writer, &batch)?;
    writer.flush()?;
    Ok(())
}
