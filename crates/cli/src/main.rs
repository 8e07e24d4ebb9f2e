//! Showreel CLI - Operator front end for the portfolio document.
//!
//! # Usage
//!
//! ```bash
//! # Print the published document (no login needed)
//! showreel show
//!
//! # Log in with a GitHub token that owns the gist
//! showreel login
//!
//! # Edit entries; each command saves the whole document afterwards
//! showreel entries add --title "Night Drive" --video https://youtu.be/dQw4w9WgXcQ --featured
//! showreel entries update 4 --client "Acme"
//! showreel entries remove 4
//! showreel entries reorder 3 1 2
//!
//! # Singletons
//! showreel about set --bio "Director based in Lisbon" --skill Editing --skill Color
//! showreel settings set --accent-mode hero
//!
//! # Resolve a video link without touching the document
//! showreel video lookup https://vimeo.com/76979871
//! ```
//!
//! # Environment Variables
//!
//! See `showreel_admin::config` for the full list. `SHOWREEL_LOG_FORMAT=json`
//! switches log output to JSON.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use showreel_admin::config::AdminConfig;
use showreel_core::{AccentMode, EntryId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "showreel")]
#[command(author, version, about = "Showreel portfolio admin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the published document (anonymous read)
    Show {
        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Verify a token and start a session
    Login {
        /// Token to use (otherwise `SHOWREEL_TOKEN`, otherwise prompt)
        #[arg(long)]
        token: Option<String>,
    },
    /// End the session
    Logout,
    /// Show whether a valid session exists
    Status,
    /// Manage portfolio entries
    Entries {
        #[command(subcommand)]
        action: EntriesAction,
    },
    /// Manage the about section
    About {
        #[command(subcommand)]
        action: AboutAction,
    },
    /// Manage global display settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Video provider helpers
    Video {
        #[command(subcommand)]
        action: VideoAction,
    },
}

#[derive(Subcommand)]
pub enum EntriesAction {
    /// List entries in display order
    List,
    /// Add an entry at the top of the list
    Add(commands::entries::AddArgs),
    /// Change fields of an existing entry
    Update(commands::entries::UpdateArgs),
    /// Delete an entry
    Remove {
        /// Entry id
        id: EntryId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Set the display order
    Reorder {
        /// Every entry id, in the new order
        #[arg(required = true)]
        ids: Vec<EntryId>,
    },
}

#[derive(Subcommand)]
pub enum AboutAction {
    /// Print the about section
    Show,
    /// Replace fields of the about section
    Set(commands::content::AboutArgs),
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the settings, with defaults applied
    Show,
    /// Change the accent color strategy
    Set {
        /// `hero` or `custom`
        #[arg(long)]
        accent_mode: Option<AccentMode>,
        /// Custom accent color, e.g. `#f0d0d3`
        #[arg(long)]
        color: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum VideoAction {
    /// Resolve a `YouTube`/Vimeo link or id to title and thumbnail
    Lookup {
        /// URL or provider id
        reference: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "showreel_admin=info,showreel_cli=info".into());

    let json = std::env::var("SHOWREEL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration comes first: Sentry must be up before the subscriber.
    let config = AdminConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), commands::CliError> {
    let ctx = commands::Context::new(config)?;

    match cli.command {
        Commands::Show { json } => commands::content::show(&ctx, json).await?,
        Commands::Login { token } => commands::session::login(&ctx, token).await?,
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::Entries { action } => commands::entries::run(&ctx, action).await?,
        Commands::About { action } => match action {
            AboutAction::Show => commands::content::about_show(&ctx).await?,
            AboutAction::Set(args) => commands::content::about_set(&ctx, args).await?,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::content::settings_show(&ctx).await?,
            SettingsAction::Set { accent_mode, color } => {
                commands::content::settings_set(&ctx, accent_mode, color).await?;
            }
        },
        Commands::Video { action } => match action {
            VideoAction::Lookup { reference } => {
                commands::video::lookup(&ctx, &reference).await?;
            }
        },
    }
    Ok(())
}
