use crate::commands::common::{resolve_note_content, Context};
use crate::error::CliError;

pub async fn run_add(content_parts: &[String], ctx: &Context) -> Result<(), CliError> {
    let content = resolve_note_content(content_parts)?;

    let user = ctx.require_user().await?;
    let note = ctx.service.create_note(&user).await?;
    let note = ctx.service.update_note(&note, &content).await?;

    println!("{}", note.id());
    Ok(())
}
