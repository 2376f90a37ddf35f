use crate::commands::common::{normalize_email_arg, owned_note, Context};
use crate::error::CliError;

pub async fn run_delete(id: i64, ctx: &Context) -> Result<(), CliError> {
    let note = owned_note(ctx, id).await?;
    ctx.service.delete_note(note.id()).await?;
    println!("{id}");
    Ok(())
}

pub async fn run_clear(confirmed: bool, ctx: &Context) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::ConfirmationRequired);
    }

    let deleted = ctx.service.delete_all_notes().await?;
    println!("Deleted {deleted} notes");
    Ok(())
}

pub async fn run_delete_user(email: &str, ctx: &Context) -> Result<(), CliError> {
    let email = normalize_email_arg(email)?;
    ctx.service.delete_user(&email).await?;
    println!("Deleted user {email}");
    Ok(())
}
