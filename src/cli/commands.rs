use crate::config;
use crate::engine::CalamineEngine;
use crate::error::XlResult;
use crate::export::{ExportOptions, Exporter, RunSummary};
use crate::types::InputMode;
use colored::Colorize;
use std::path::PathBuf;

/// Options of the `xltxt` command besides its positional arguments
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: InputMode,
    pub folder: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Execute a run: resolve the configuration and save every worksheet it names
pub fn run(args: &[String], options: RunOptions) -> XlResult<RunSummary> {
    println!("{}", "📄 xltxt - Saving worksheets as text".bold().green());

    let configs = config::resolve_with_mode(args, options.mode)?;
    if options.verbose {
        println!("   Found {} workbook entries", configs.len());
        for cfg in &configs {
            println!(
                "   • {}: {} [{}] {}",
                cfg.key.bright_blue(),
                cfg.file_name,
                cfg.worksheet,
                cfg.range.as_deref().unwrap_or("<all>")
            );
        }
        println!();
    }

    if options.dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No files will be written\n".yellow()
        );
    }

    let folder = match options.folder {
        Some(folder) => folder,
        None => std::env::current_dir()?,
    };
    let mut export_options = ExportOptions::with_folder(folder);
    export_options.output_dir = options.output_dir;
    export_options.dry_run = options.dry_run;
    if let Some(ext) = options.extension {
        export_options.extension = ext;
    }

    let exporter = Exporter::new(CalamineEngine, export_options);
    let summary = exporter.run(&configs)?;

    for export in &summary.exports {
        println!(
            "   {} {} → {}",
            "✅".green(),
            export.worksheet.bright_blue(),
            export.path.display()
        );
    }
    println!(
        "\n{}",
        format!(
            "✅ Saved {} worksheet(s), {} rows",
            summary.len(),
            summary.total_rows()
        )
        .bold()
        .green()
    );

    Ok(summary)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
