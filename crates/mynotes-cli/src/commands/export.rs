use std::path::Path;

use mynotes_core::export::{render_notes_export, ExportFormat as CoreExportFormat};

use crate::cli::ExportFormat;
use crate::commands::common::{current_notes, Context};
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    ctx: &Context,
) -> Result<(), CliError> {
    let notes = current_notes(ctx).await?;
    let rendered = render_notes_export(&notes, to_core_format(format))?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("Exported {} notes to {}", notes.len(), path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

const fn to_core_format(format: ExportFormat) -> CoreExportFormat {
    match format {
        ExportFormat::Json => CoreExportFormat::Json,
        ExportFormat::Markdown => CoreExportFormat::Markdown,
    }
}
