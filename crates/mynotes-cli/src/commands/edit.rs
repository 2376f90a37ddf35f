use crate::commands::common::{
    capture_editor_input_with_initial, normalize_content, owned_note, Context,
};
use crate::error::CliError;

pub async fn run_edit(id: i64, content_parts: &[String], ctx: &Context) -> Result<(), CliError> {
    let note = owned_note(ctx, id).await?;

    let edited_content = match normalize_content(&content_parts.join(" ")) {
        Some(content) => content,
        None => capture_editor_input_with_initial(note.text())?
            .ok_or(CliError::EmptyEditedContent)?,
    };

    if edited_content == note.text() {
        println!("{}", note.id());
        return Ok(());
    }

    let updated = ctx.service.update_note(&note, &edited_content).await?;
    println!("{}", updated.id());
    Ok(())
}
