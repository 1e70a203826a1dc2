//! Lesson Fetcher CLI application
//!
//! Command-line interface for browsing a video-lesson catalog and downloading
//! PDF study material into a local per-user cache.

use std::process;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use lesson_fetcher::cli::{
    Cli, Commands, handle_config, handle_download, handle_downloads, handle_home, handle_login,
    handle_logout, handle_sections, handle_signup, handle_videos, handle_whoami,
};
use lesson_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    init_logging(&cli);

    info!("Lesson Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Login(args) => {
            info!("Executing login command");
            handle_login(args, &cli.global).await
        }
        Commands::Signup(args) => {
            info!("Executing signup command");
            handle_signup(args, &cli.global).await
        }
        Commands::Logout => {
            info!("Executing logout command");
            handle_logout(&cli.global).await
        }
        Commands::Whoami => {
            info!("Executing whoami command");
            handle_whoami(&cli.global).await
        }
        Commands::Sections => {
            info!("Executing sections command");
            handle_sections(&cli.global).await
        }
        Commands::Home => {
            info!("Executing home command");
            handle_home(&cli.global).await
        }
        Commands::Videos(args) => {
            info!("Executing videos command");
            handle_videos(args, &cli.global).await
        }
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(args, &cli.global).await
        }
        Commands::Downloads => {
            info!("Executing downloads command");
            handle_downloads(&cli.global).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &cli.global).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("lesson_fetcher={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
