//! Command-line argument parsing for Lesson Fetcher
//!
//! This module defines the CLI structure using clap derive macros,
//! providing a user-friendly interface for account management, catalog
//! browsing, and study material downloads.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Lesson Fetcher - Browse lessons and download study material
#[derive(Parser, Debug)]
#[command(
    name = "lesson_fetcher",
    version,
    about = "Browse the lesson catalog and download study PDFs",
    long_about = "A command-line client for the lesson platform.
Manages your session locally, browses sections and videos, and downloads
study PDFs into a per-user library."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Verbose logging (info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file, overriding the search locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory holding the session record and downloads
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session locally
    Login(LoginArgs),

    /// Create an account and store the session locally
    Signup(SignupArgs),

    /// Erase the stored session
    Logout,

    /// Show who is currently logged in
    Whoami,

    /// List catalog sections
    Sections,

    /// Show the full home catalog (every section with its videos)
    Home,

    /// List one section's videos
    Videos(VideosArgs),

    /// Download a study PDF for a video
    Download(DownloadArgs),

    /// List downloaded study material for the logged-in user
    Downloads,

    /// Configuration management
    Config(ConfigArgs),
}

/// Arguments for the login command
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email or mobile number (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (prompted securely when omitted)
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,
}

/// Arguments for the signup command
#[derive(Args, Debug)]
pub struct SignupArgs {
    /// First name (prompted when omitted)
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name (prompted when omitted)
    #[arg(long)]
    pub last_name: Option<String>,

    /// Email address (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Mobile number (prompted when omitted)
    #[arg(long)]
    pub mobile_number: Option<String>,

    /// Password (prompted securely when omitted)
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,
}

/// Arguments for the videos command
#[derive(Args, Debug)]
pub struct VideosArgs {
    /// Section name, exactly as the catalog lists it
    #[arg(value_name = "SECTION")]
    pub section: String,

    /// Show only videos that carry study PDFs, with their PDFs listed
    #[arg(long)]
    pub with_pdfs: bool,
}

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Numeric id of the video
    #[arg(value_name = "VIDEO_ID")]
    pub video_id: i64,

    /// Numeric id of the PDF within that video
    #[arg(value_name = "PDF_ID")]
    pub pdf_id: i64,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the resolved configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}
