//! LuckyDraw command line
//!
//! Main application entry point

use anyhow::Context;
use tokio::io::BufReader;
use tracing::{error, info};

use lucky_draw::{
    config::Settings,
    handlers::{handle_command, Command, USAGE},
    storage::Library,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;
    info!("Starting {}", lucky_draw::info());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let mut library = Library::from_settings(&settings)
        .await
        .with_context(|| format!("failed to open library in {}", settings.storage.data_dir))?;

    let input = BufReader::new(tokio::io::stdin());
    let mut out = tokio::io::stdout();
    if let Err(e) = handle_command(command, &mut library, &settings, input, &mut out).await {
        error!(error = %e, severity = %e.severity(), "Command failed");
        return Err(e.into());
    }

    Ok(())
}
