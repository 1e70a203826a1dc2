//! Command handlers for CLI operations
//!
//! Each subcommand gets a `handle_*` function that assembles the pieces it
//! needs (configuration, session store, API client, cache, repository) and
//! drives the same controllers the GUI binds to. Handlers print their own
//! user-facing output and return an error only when the command failed.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::app::{
    ApiClient, ContentRepository, HomeController, LoginController, PdfCache, ResourcesController,
    ScreenState, SessionStore, SignupController, Video, VideoDetailController,
};
use crate::cli::args::{
    ConfigAction, ConfigArgs, DownloadArgs, GlobalArgs, LoginArgs, SignupArgs, VideosArgs,
};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Everything a catalog-facing command needs, wired together once
struct AppContext {
    session: Arc<SessionStore>,
    api: Arc<ApiClient>,
    cache: Arc<PdfCache>,
    repository: Arc<ContentRepository>,
}

/// Load configuration with CLI overrides applied
///
/// The `--data-dir` flag wins over both the config file and the
/// environment override, which `AppConfig::load` has already applied.
async fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(global.config.clone()).await?;

    if let Some(ref data_dir) = global.data_dir {
        debug!("Overriding data root from command line");
        config.storage.data_root = Some(data_dir.clone());
    }

    Ok(config)
}

/// Open the session store and restore any persisted session
async fn load_session(config: &AppConfig) -> Result<Arc<SessionStore>> {
    let session = Arc::new(SessionStore::new(config.session_file()?));
    session.load_from_store().await?;
    Ok(session)
}

/// Assemble session, API client, cache, and repository from configuration
async fn build_context(global: &GlobalArgs) -> Result<AppContext> {
    let config = load_config(global).await?;
    let session = load_session(&config).await?;

    let client_config = config.client.to_runtime_config();
    let api = Arc::new(ApiClient::with_config(
        config.base_url()?,
        &client_config,
        Arc::clone(&session),
    )?);
    let cache = Arc::new(PdfCache::new(config.downloads_root()?).await?);
    let repository = Arc::new(ContentRepository::new(
        Arc::clone(&api),
        Arc::clone(&cache),
        &client_config,
    )?);

    Ok(AppContext {
        session,
        api,
        cache,
        repository,
    })
}

/// Spinner shown while a network call runs
///
/// Hidden when stderr is not a terminal so piped output stays clean.
fn network_spinner(message: &str) -> ProgressBar {
    if !atty::is(atty::Stream::Stderr) {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["◐", "◓", "◑", "◒"]),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Prompt for one line of input, trimming surrounding whitespace
fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Prompt for a password without echoing it to the terminal
fn prompt_password(label: &str) -> Result<String> {
    Ok(rpassword::prompt_password(format!("{}: ", label))?)
}

/// Use the flag value when given, otherwise prompt for it
fn or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt_line(label),
    }
}

/// One listing row for a video
fn format_video_row(video: &Video) -> String {
    let mut row = format!("[{}] {}", video.id, video.title);

    if !video.duration.is_empty() {
        row.push_str(&format!(" ({})", video.duration));
    }
    match video.pdfs.len() {
        0 => {}
        1 => row.push_str(" [1 PDF]"),
        count => row.push_str(&format!(" [{} PDFs]", count)),
    }

    row
}

/// Handle the login command
pub async fn handle_login(args: LoginArgs, global: &GlobalArgs) -> Result<()> {
    let context = build_context(global).await?;

    if let Some(name) = context.session.display_name() {
        println!(
            "ℹ️  Currently logged in as {}. Logging in again replaces that session.",
            name
        );
        println!();
    }

    let username = or_prompt(args.username, "Email or mobile number")?;
    let password = match args.password {
        Some(value) => value,
        None => prompt_password("Password")?,
    };

    let controller = LoginController::new(Arc::clone(&context.api), Arc::clone(&context.session));
    controller.set_username(&username);
    controller.set_password(&password);

    let progress = network_spinner("Signing in...");
    let logged_in = controller.submit().await;
    progress.finish_and_clear();

    if logged_in {
        let name = context
            .session
            .display_name()
            .unwrap_or_else(|| username.trim().to_string());
        println!("✅ Logged in as {}", name);
        Ok(())
    } else {
        let message = controller
            .state()
            .error
            .unwrap_or_else(|| "Login failed".to_string());
        println!("❌ {}", message);
        Err(AppError::generic("Login failed"))
    }
}

/// Handle the signup command
pub async fn handle_signup(args: SignupArgs, global: &GlobalArgs) -> Result<()> {
    let context = build_context(global).await?;

    println!("📝 Account Signup");
    println!("=================");
    println!();

    let first_name = or_prompt(args.first_name, "First name")?;
    let last_name = or_prompt(args.last_name, "Last name")?;
    let email = or_prompt(args.email, "Email")?;
    let mobile_number = or_prompt(args.mobile_number, "Mobile number")?;
    let (password, confirm_password) = match args.password {
        Some(value) => (value.clone(), value),
        None => (
            prompt_password("Password")?,
            prompt_password("Confirm password")?,
        ),
    };

    let controller = SignupController::new(Arc::clone(&context.api), Arc::clone(&context.session));
    controller.set_first_name(&first_name);
    controller.set_last_name(&last_name);
    controller.set_email(&email);
    controller.set_mobile_number(&mobile_number);
    controller.set_password(&password);
    controller.set_confirm_password(&confirm_password);

    let progress = network_spinner("Creating account...");
    let signed_up = controller.submit().await;
    progress.finish_and_clear();

    if signed_up {
        let name = context.session.display_name().unwrap_or(email);
        println!("✅ Account created. Logged in as {}", name);
        Ok(())
    } else {
        let message = controller
            .state()
            .error
            .unwrap_or_else(|| "Signup failed".to_string());
        println!("❌ {}", message);
        Err(AppError::generic("Signup failed"))
    }
}

/// Handle the logout command
pub async fn handle_logout(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global).await?;
    let session = load_session(&config).await?;

    if !session.is_logged_in() {
        println!("ℹ️  Not logged in.");
        return Ok(());
    }

    session.clear_session().await?;
    println!("✅ Logged out");
    Ok(())
}

/// Handle the whoami command
pub async fn handle_whoami(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global).await?;
    let session = load_session(&config).await?;

    println!("👤 Session Status");
    println!("=================");
    println!();

    match session.current() {
        Some(record) => {
            println!("Name:     {} {}", record.first_name, record.last_name);
            println!("Email:    {}", record.email);
            println!("User id:  {}", record.user_id);
            println!(
                "Saved at: {}",
                record.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => {
            println!("Not logged in.");
            println!();
            println!("💡 Run 'lesson_fetcher login' to sign in.");
        }
    }

    Ok(())
}

/// Handle the sections command
pub async fn handle_sections(global: &GlobalArgs) -> Result<()> {
    let context = build_context(global).await?;
    let controller = ResourcesController::new(Arc::clone(&context.repository));

    let progress = network_spinner("Loading sections...");
    controller.load_sections().await;
    progress.finish_and_clear();

    match controller.state().sections {
        ScreenState::Content(names) => {
            println!("📚 Sections");
            println!("===========");
            for name in names {
                println!("  {}", name);
            }
            Ok(())
        }
        ScreenState::Empty => {
            println!("No sections available.");
            Ok(())
        }
        ScreenState::Error(message) => {
            println!("❌ {}", message);
            Err(AppError::generic(message))
        }
        // load_sections always settles before returning
        ScreenState::Loading => Ok(()),
    }
}

/// Handle the home command
pub async fn handle_home(global: &GlobalArgs) -> Result<()> {
    let context = build_context(global).await?;
    let controller = HomeController::new(Arc::clone(&context.repository));

    let progress = network_spinner("Loading home catalog...");
    controller.load().await;
    progress.finish_and_clear();

    match controller.state().catalog {
        ScreenState::Content(sections) => {
            println!("📚 Home Catalog");
            println!("===============");
            for section in &sections {
                println!();
                println!("{} ({} videos)", section.name, section.videos.len());
                for video in &section.videos {
                    println!("  {}", format_video_row(video));
                }
            }
            Ok(())
        }
        ScreenState::Empty => {
            println!("No sections available.");
            Ok(())
        }
        ScreenState::Error(message) => {
            println!("❌ {}", message);
            Err(AppError::generic(message))
        }
        ScreenState::Loading => Ok(()),
    }
}

/// Handle the videos command
pub async fn handle_videos(args: VideosArgs, global: &GlobalArgs) -> Result<()> {
    let context = build_context(global).await?;

    if args.with_pdfs {
        let controller = ResourcesController::new(Arc::clone(&context.repository));

        let progress = network_spinner(&format!("Loading videos for {}...", args.section));
        controller.select_section(&args.section).await;
        progress.finish_and_clear();

        return match controller.state().videos {
            ScreenState::Content(videos) => {
                println!("📚 {} (videos with study material)", args.section);
                println!();
                for video in &videos {
                    println!("{}", format_video_row(video));
                    for pdf in &video.pdfs {
                        println!("    [{}] {} ({})", pdf.id, pdf.title, pdf.pdf_type);
                    }
                }
                Ok(())
            }
            ScreenState::Empty => {
                println!("No videos with study material in this section.");
                Ok(())
            }
            ScreenState::Error(message) => {
                println!("❌ {}", message);
                Err(AppError::generic(message))
            }
            ScreenState::Loading => Ok(()),
        };
    }

    let progress = network_spinner(&format!("Loading videos for {}...", args.section));
    let videos = context.repository.videos_by_section(&args.section).await;
    progress.finish_and_clear();
    let videos = videos?;

    if videos.is_empty() {
        println!("No videos in this section.");
        return Ok(());
    }

    println!("📚 {}", args.section);
    for video in &videos {
        println!("  {}", format_video_row(video));
    }
    Ok(())
}

/// Handle the download command
pub async fn handle_download(args: DownloadArgs, global: &GlobalArgs) -> Result<()> {
    let context = build_context(global).await?;

    if !context.session.is_logged_in() {
        println!("🔐 Downloads require a logged-in user.");
        println!("   Run 'lesson_fetcher login' first.");
        return Err(AppError::generic("Not logged in"));
    }

    let controller =
        VideoDetailController::new(Arc::clone(&context.repository), Arc::clone(&context.session));

    let progress = network_spinner(&format!("Loading video {}...", args.video_id));
    controller.load(args.video_id).await;
    progress.finish_and_clear();

    let video = match controller.state().video {
        ScreenState::Content(video) => video,
        ScreenState::Empty => {
            println!("❌ Video {} not found", args.video_id);
            return Err(AppError::generic(format!(
                "Video {} not found",
                args.video_id
            )));
        }
        ScreenState::Error(message) => {
            println!("❌ {}", message);
            return Err(AppError::generic(message));
        }
        ScreenState::Loading => return Ok(()),
    };

    let pdf = match video.pdfs.iter().find(|pdf| pdf.id == args.pdf_id) {
        Some(pdf) => pdf.clone(),
        None => {
            println!(
                "❌ Video '{}' has no PDF with id {}",
                video.title, args.pdf_id
            );
            if video.has_pdfs() {
                println!();
                println!("Available PDFs:");
                for pdf in &video.pdfs {
                    println!("  [{}] {} ({})", pdf.id, pdf.title, pdf.pdf_type);
                }
            }
            return Err(AppError::generic("PDF not found"));
        }
    };

    info!("Downloading '{}' from video '{}'", pdf.title, video.title);

    let progress = network_spinner(&format!("Downloading {}...", pdf.title));
    controller.download_pdf(args.pdf_id).await;
    progress.finish_and_clear();

    match controller.consume_ready_to_open() {
        Some(path) => {
            println!("✅ Saved to {}", path.display());
            Ok(())
        }
        None => {
            println!("❌ Download failed. Re-run with -v for details.");
            Err(AppError::generic("Download failed"))
        }
    }
}

/// Handle the downloads command
pub async fn handle_downloads(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global).await?;
    let session = load_session(&config).await?;

    let user_id = match session.user_id() {
        Some(id) => id,
        None => {
            println!("ℹ️  Not logged in, so there is no download library to show.");
            return Ok(());
        }
    };

    let cache = PdfCache::new(config.downloads_root()?).await?;
    let entries = cache.entries_for_user(user_id).await?;

    println!("💾 Downloaded Study Material");
    println!("============================");
    println!("Location: {}", cache.root().display());
    println!();

    if entries.is_empty() {
        println!("No downloads yet.");
        return Ok(());
    }

    for row in &entries {
        let marker = if row.file_exists { " " } else { "!" };
        println!(
            "{} video {:>6}  pdf {:>6}  {}",
            marker,
            row.entry.video_id,
            row.entry.pdf_id,
            row.entry.path.display()
        );
    }

    let missing = entries.iter().filter(|row| !row.file_exists).count();
    if missing > 0 {
        println!();
        println!(
            "⚠️  {} file(s) marked '!' no longer exist on disk and will be fetched again on demand.",
            missing
        );
    }

    Ok(())
}

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    match args.action {
        ConfigAction::Init { force } => handle_config_init(force).await,
        ConfigAction::Show => handle_config_show(global).await,
    }
}

/// Create the default config file, optionally replacing an existing one
async fn handle_config_init(force: bool) -> Result<()> {
    let config_path = AppConfig::get_default_config_path()?;

    if config_path.exists() {
        if !force {
            println!("✅ Configuration file already exists:");
            println!("   {}", config_path.display());
            println!("   Use --force to overwrite it with defaults.");
            return Ok(());
        }

        tokio::fs::remove_file(&config_path).await?;
        info!("Removed existing config file for regeneration");
    }

    AppConfig::initialize_first_run().await?;
    Ok(())
}

/// Print the fully resolved configuration
async fn handle_config_show(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global).await?;

    println!("🔧 Configuration");
    println!("================");
    println!();
    println!("API base URL:   {}", config.api.base_url);
    println!("Data root:      {}", config.data_root()?.display());
    println!("Session file:   {}", config.session_file()?.display());
    println!("Downloads root: {}", config.downloads_root()?.display());
    println!();
    println!("Connect timeout:  {}s", config.client.connect_timeout_secs);
    println!("Request timeout:  {}s", config.client.request_timeout_secs);
    println!("Download timeout: {}s", config.client.download_timeout_secs);
    println!("Log level:        {}", config.logging.level);

    Ok(())
}
