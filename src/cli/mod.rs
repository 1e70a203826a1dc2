//! Command-line interface components
//!
//! This module contains CLI-specific code for the lesson fetcher binary,
//! including argument parsing and the per-subcommand handlers.

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, DownloadArgs, GlobalArgs, LoginArgs, SignupArgs,
    VideosArgs,
};
pub use commands::{
    handle_config, handle_download, handle_downloads, handle_home, handle_login, handle_logout,
    handle_sections, handle_signup, handle_videos, handle_whoami,
};
