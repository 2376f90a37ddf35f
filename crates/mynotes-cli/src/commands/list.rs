use crate::commands::common::{
    current_notes, format_note_lines, note_to_list_item, Context, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(all: bool, as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let notes = if all {
        ctx.service.get_all_notes().await?
    } else {
        current_notes(ctx).await?
    };

    if as_json {
        let json_items = notes
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_note_lines(&notes) {
            println!("{line}");
        }
    }

    Ok(())
}
