//! Entry commands.

use clap::Args;
use dialoguer::Confirm;
use showreel_admin::{AdminError, Confirmation};
use showreel_core::{Document, Entry, EntryDraft, EntryId};

use super::{CliError, Context};
use crate::EntriesAction;

#[derive(Args)]
pub struct AddArgs {
    /// Entry title (defaults to the video title when `--video` is given)
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, default_value = "")]
    pub client: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub category: String,
    /// Video URL or id; title and thumbnail are looked up
    #[arg(long)]
    pub video: Option<String>,
    /// Thumbnail URL, overrides the looked-up one
    #[arg(long)]
    pub thumbnail: Option<String>,
    /// Make this the hero entry
    #[arg(long)]
    pub featured: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Entry id
    pub id: EntryId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// New video URL or id; the thumbnail is looked up again
    #[arg(long)]
    pub video: Option<String>,
    #[arg(long)]
    pub thumbnail: Option<String>,
    /// `true` to make this the hero entry, `false` to unfeature it
    #[arg(long)]
    pub featured: Option<bool>,
}

/// Dispatch an `entries` subcommand.
///
/// # Errors
///
/// Returns error if the session is missing, the entry does not exist or the
/// save fails.
pub async fn run(ctx: &Context, action: EntriesAction) -> Result<(), CliError> {
    match action {
        EntriesAction::List => list(ctx).await,
        EntriesAction::Add(args) => add(ctx, args).await,
        EntriesAction::Update(args) => update(ctx, args).await,
        EntriesAction::Remove { id, yes } => remove(ctx, id, yes).await,
        EntriesAction::Reorder { ids } => reorder(ctx, &ids).await,
    }
}

async fn list(ctx: &Context) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;
    let entries = store.entries().await;

    if entries.is_empty() {
        println!("No entries.");
        return Ok(());
    }

    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

async fn add(ctx: &Context, args: AddArgs) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;

    let mut draft = EntryDraft {
        title: args.title.unwrap_or_default(),
        client: args.client,
        description: args.description,
        category: args.category,
        is_featured: args.featured,
        ..EntryDraft::default()
    };

    if let Some(reference) = args.video {
        let metadata = store.fetch_video_metadata(&reference).await?;
        if draft.title.is_empty() {
            draft.title = metadata.title;
        }
        draft.video_id = metadata.id;
        draft.thumbnail_url = metadata.thumbnail_url;
    }
    if let Some(thumbnail) = args.thumbnail {
        draft.thumbnail_url = thumbnail;
    }

    let entry = store.add_entry(draft).await?;
    print_entry(&entry);
    ctx.save().await
}

async fn update(ctx: &Context, args: UpdateArgs) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;
    let mut entry = store
        .entry(args.id)
        .await
        .ok_or(CliError::UnknownEntry(args.id))?;
    let before = entry.clone();

    if let Some(title) = args.title {
        entry.title = title;
    }
    if let Some(client) = args.client {
        entry.client = client;
    }
    if let Some(description) = args.description {
        entry.description = description;
    }
    if let Some(category) = args.category {
        entry.category = category;
    }
    if let Some(reference) = args.video {
        let metadata = store.fetch_video_metadata(&reference).await?;
        entry.video_id = metadata.id;
        entry.thumbnail_url = metadata.thumbnail_url;
    }
    if let Some(thumbnail) = args.thumbnail {
        entry.thumbnail_url = thumbnail;
    }
    if let Some(featured) = args.featured {
        entry.is_featured = featured;
    }

    if entry == before {
        return Err(CliError::NothingToChange);
    }

    store.update_entry(entry.clone()).await?;
    print_entry(&entry);
    ctx.save().await
}

async fn remove(ctx: &Context, id: EntryId, yes: bool) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;
    let entry = store.entry(id).await.ok_or(CliError::UnknownEntry(id))?;

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        Confirm::new()
            .with_prompt(format!("Delete entry #{id} \"{}\"?", entry.title))
            .default(false)
            .interact()?
            .into()
    };

    match store.remove_entry(id, confirmation).await {
        Ok(removed) => println!("Removed #{} {}", removed.id, removed.title),
        Err(AdminError::UserCancelled) => {
            println!("Cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }
    ctx.save().await
}

async fn reorder(ctx: &Context, ids: &[EntryId]) -> Result<(), CliError> {
    let store = ctx.authenticated().await?;

    let order = new_order(&store.document().await, ids)?;
    store.reorder_entries(order).await?;
    for entry in store.entries().await {
        print_entry(&entry);
    }
    ctx.save().await
}

/// Resolve `ids` to entries, requiring every current entry exactly once.
fn new_order(document: &Document, ids: &[EntryId]) -> Result<Vec<Entry>, CliError> {
    let order = ids
        .iter()
        .map(|&id| document.entry(id).cloned().ok_or(CliError::UnknownEntry(id)))
        .collect::<Result<Vec<_>, _>>()?;

    if !document.is_permutation(&order) {
        return Err(CliError::NotAPermutation {
            expected: document.entries.len(),
        });
    }
    Ok(order)
}

fn print_entry(entry: &Entry) {
    let hero = if entry.is_featured { " [hero]" } else { "" };
    println!("#{:<4} {}{hero}", entry.id.as_i64(), entry.title);
    if !entry.client.is_empty() || !entry.category.is_empty() {
        println!("      {} / {}", entry.client, entry.category);
    }
    if !entry.video_id.is_empty() {
        println!("      video: {}", entry.video_id);
    }
}
