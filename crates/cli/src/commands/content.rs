//! Public read, about section and global settings.

use clap::Args;
use showreel_core::{AccentMode, Document, GlobalSettings};

use super::{CliError, Context};

#[derive(Args)]
pub struct AboutArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    /// Replaces the whole skill list; repeat for several skills
    #[arg(long = "skill")]
    pub skills: Vec<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub instagram: Option<String>,
    /// `YouTube` channel link
    #[arg(long)]
    pub youtube: Option<String>,
}

/// Print the published document.
///
/// # Errors
///
/// Returns error if the gist cannot be read.
pub async fn show(ctx: &Context, json: bool) -> Result<(), CliError> {
    let document = ctx.store.load_public().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print_summary(&document);
    }
    Ok(())
}

fn print_summary(document: &Document) {
    let settings = document.settings_or_default();
    println!(
        "{} entries, accent {} ({})",
        document.entries.len(),
        settings.main_accent(None),
        settings.accent_mode
    );
    if let Some(hero) = document.hero() {
        println!("Hero: #{} {}", hero.id, hero.title);
    }
    for entry in &document.entries {
        println!("  #{} {}", entry.id, entry.title);
    }
}

/// Print the about section of the logged-in document.
///
/// # Errors
///
/// Returns error if there is no valid session.
pub async fn about_show(ctx: &Context) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;
    let about = store.document().await.about.unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&about)?);
    Ok(())
}

/// Change fields of the about section and save.
///
/// Omitted fields keep their current value; the store then replaces the
/// section as a whole.
///
/// # Errors
///
/// Returns error if there is no valid session, nothing would change or the
/// save fails.
pub async fn about_set(ctx: &Context, args: AboutArgs) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;
    let current = store.document().await.about.unwrap_or_default();
    let mut about = current.clone();

    if let Some(title) = args.title {
        about.title = title;
    }
    if let Some(description) = args.description {
        about.description = description;
    }
    if let Some(bio) = args.bio {
        about.bio = bio;
    }
    if !args.skills.is_empty() {
        about.skills = args.skills;
    }
    if let Some(email) = args.email {
        about.email = email;
    }
    if let Some(instagram) = args.instagram {
        about.instagram = instagram;
    }
    if let Some(youtube) = args.youtube {
        about.youtube = youtube;
    }

    if about == current {
        return Err(CliError::NothingToChange);
    }

    store.update_about(about).await?;
    ctx.save().await
}

/// Print the settings, falling back to the defaults.
///
/// # Errors
///
/// Returns error if there is no valid session.
pub async fn settings_show(ctx: &Context) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;
    let settings = store.document().await.settings_or_default();
    println!("accent mode:  {}", settings.accent_mode);
    println!("custom color: {}", settings.custom_color);
    Ok(())
}

/// Change the accent settings and save.
///
/// # Errors
///
/// Returns error if there is no valid session, nothing would change or the
/// save fails.
pub async fn settings_set(
    ctx: &Context,
    accent_mode: Option<AccentMode>,
    color: Option<String>,
) -> Result<(), CliError> {
    if accent_mode.is_none() && color.is_none() {
        return Err(CliError::NothingToChange);
    }

    let store = ctx.authenticated().await?;
    let current = store.document().await.settings_or_default();
    let settings = GlobalSettings {
        accent_mode: accent_mode.unwrap_or(current.accent_mode),
        custom_color: color.unwrap_or(current.custom_color),
    };

    store.update_settings(settings).await?;
    ctx.save().await
}
