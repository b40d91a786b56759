use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use matchcue::client;
use matchcue::logging;
use matchcue::server::DEFAULT_PORT;
use matchcue::{AppError, ServerOptions, run_server};
use matchcue_core::config::DEFAULT_PROFILE;

/// Without COMMAND the server is started; with one it is sent to a running server.
#[derive(Parser, Debug)]
#[command(name = "matchcue", version, about = "Timed audio cues for match events")]
struct Cli {
    /// YAML config file (created with defaults if missing)
    #[arg(short = 'f', long)]
    config_file: Option<PathBuf>,

    /// Profile to activate
    #[arg(short = 'n', long, default_value = DEFAULT_PROFILE)]
    profile: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Debug output for matchcue crates (same as DEBUG_LOGGING=1)
    #[arg(long)]
    debug: bool,

    /// start, stop, pause, back[seconds], forward[seconds], test or shutdown
    command: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug_logging = logging::debug_requested(cli.debug);

    // The guard flushes the log file and must outlive the error report
    let (_guard, result) = match cli.command {
        Some(command) => {
            logging::init_stdout_only(debug_logging);
            (None, run_client(cli.port, &command).await)
        }
        None => {
            let guard = logging::init(debug_logging);
            let options = ServerOptions {
                config_file: cli.config_file,
                profile: cli.profile,
                port: cli.port,
            };
            (guard, run_server(options).await)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err.report());
            ExitCode::FAILURE
        }
    }
}

async fn run_client(port: u16, command: &str) -> Result<(), AppError> {
    let reply = client::send_request(port, command).await?;
    println!("{reply}");
    Ok(())
}
