//! Login, logout and status.

use dialoguer::Password;
use secrecy::ExposeSecret;
use showreel_admin::Credential;

use super::{CliError, Context};

/// Verify a token and store it for the following commands.
///
/// The token comes from `--token`, else `SHOWREEL_TOKEN`, else a hidden
/// prompt.
///
/// # Errors
///
/// Returns the store error when the token is rejected.
pub async fn login(ctx: &Context, token: Option<String>) -> Result<(), CliError> {
    let credential = match (token, &ctx.env_token) {
        (Some(token), _) => Credential::new(&token),
        (None, Some(env_token)) => Credential::new(env_token.expose_secret()),
        (None, None) => Credential::new(
            &Password::new()
                .with_prompt("GitHub token (gist scope)")
                .interact()?,
        ),
    };

    ctx.store.login(credential).await?;

    let entries = ctx.store.entries().await;
    println!("Logged in. {} entries loaded.", entries.len());
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns error if the session file cannot be removed.
pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.store.logout().await?;
    println!("Logged out.");
    Ok(())
}

/// Report whether the stored session still works.
///
/// # Errors
///
/// Returns error if the session file cannot be read. A rejected session is
/// reported, not returned as an error.
pub async fn status(ctx: &Context) -> Result<(), CliError> {
    match ctx.store.restore_session().await {
        Ok(true) => {
            let document = ctx.store.document().await;
            println!("Authenticated. {} entries.", document.entries.len());
            if let Some(hero) = document.hero() {
                println!("Hero: #{} {}", hero.id, hero.title);
            }
        }
        Ok(false) => println!("Not logged in."),
        Err(e @ showreel_admin::AdminError::Session(_)) => return Err(e.into()),
        Err(e) => println!("Session expired: {}", e.user_message()),
    }
    Ok(())
}
