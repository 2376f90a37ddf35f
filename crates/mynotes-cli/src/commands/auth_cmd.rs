use mynotes_core::IdentityProvider;

use crate::commands::common::{normalize_email_arg, Context};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_login(email: &str, ctx: &Context) -> Result<(), CliError> {
    let email = normalize_email_arg(email)?;
    let identity = mynotes_core::InMemoryIdentityProvider::signed_in(email.as_str());
    let user = ctx.service.sign_in(&identity).await?;

    let config = CliConfig {
        email: Some(user.email().to_string()),
        ..ctx.config.clone()
    };
    ctx.save_config(&config)?;

    println!("Signed in as {}", user.email());
    Ok(())
}

pub async fn run_logout(ctx: &Context) -> Result<(), CliError> {
    ctx.service.sign_out(&ctx.identity()).await?;

    if ctx.config.email.is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    let config = CliConfig {
        email: None,
        ..ctx.config.clone()
    };
    ctx.save_config(&config)?;
    println!("Signed out.");
    Ok(())
}

pub async fn run_whoami(ctx: &Context) -> Result<(), CliError> {
    match ctx.identity().current_user().await? {
        Some(auth_user) => {
            let user = ctx.require_user().await?;
            println!("{} (user id {})", auth_user.email, user.id());
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn run_verify(ctx: &Context) -> Result<(), CliError> {
    let identity = ctx.identity();
    match identity.send_email_verification().await {
        Ok(()) => {}
        Err(mynotes_core::Error::NotAuthenticated) => return Err(CliError::NotSignedIn),
        Err(error) => return Err(error.into()),
    }

    if let Some(auth_user) = identity.current_user().await? {
        println!("Verification email requested for {}", auth_user.email);
    }
    Ok(())
}
