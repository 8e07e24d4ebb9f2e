//! Video lookup.

use super::{CliError, Context};

/// Resolve a video reference and print its metadata.
///
/// # Errors
///
/// Returns the lookup failure (not found, private, provider error).
pub async fn lookup(ctx: &Context, reference: &str) -> Result<(), CliError> {
    let metadata = ctx.store.fetch_video_metadata(reference).await?;
    println!("id:        {}", metadata.id);
    println!("title:     {}", metadata.title);
    println!("thumbnail: {}", metadata.thumbnail_url);
    Ok(())
}
