use crate::commands::common::{owned_note, Context};
use crate::error::CliError;

pub async fn run_show(id: i64, ctx: &Context) -> Result<(), CliError> {
    let note = owned_note(ctx, id).await?;

    println!("{}", note.text());
    Ok(())
}
