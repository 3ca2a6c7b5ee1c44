use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use image_converter::cli::{BatchArgs, Cli};
use image_converter::error::CliError;
use image_converter::io::{collect_files, plan_outputs, read_file, write_file};
use image_converter::report::{FileResult, Report};
use image_converter_core::pipeline;
use image_converter_core::Operation;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let operation = cli
        .command
        .operation()
        .context("Invalid options")?;

    handle_batch(cli.command.batch(), &operation)
}

fn handle_batch(batch: &BatchArgs, operation: &Operation) -> Result<()> {
    let input = batch.input.as_path();
    let output = batch.output.as_deref();
    let extension = operation.output().format.extension();

    let files = collect_files(input, batch.recursive)
        .context("Failed to collect input files")?;

    if files.is_empty() {
        println!("No supported files found.");
        return Ok(());
    }

    let plan = plan_outputs(&files, input, output, operation.name(), extension)?;

    if batch.dry_run {
        println!("[dry-run] Would {}:", operation);
        for (f, out) in &plan {
            println!("  {} → {}", f.display(), out.display());
        }
        return Ok(());
    }

    println!("Running {} on {} file(s)...", operation, plan.len());

    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let report: Report = plan
        .par_iter()
        .map(|(input_path, output_path)| {
            let result = process_file(input_path, output_path, operation);

            let file_result = match result {
                Ok((original_size, output_size)) => {
                    let file_result = FileResult {
                        path: input_path.clone(),
                        original_size,
                        output_size,
                        error: None,
                    };
                    pb.set_message(format!(
                        "{} ({:+.1}%)",
                        display_name(input_path),
                        file_result.size_change_pct()
                    ));
                    file_result
                }
                Err(e) => {
                    log::error!("Error processing {}: {}", input_path.display(), e);
                    FileResult::failed(input_path.clone(), e.to_string())
                }
            };

            pb.inc(1);
            file_result
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    pb.finish_with_message("Done!");
    report.print_summary();

    Ok(())
}

/// Returns (input size, output size) in bytes.
fn process_file(
    input_path: &Path,
    output_path: &Path,
    operation: &Operation,
) -> Result<(u64, u64), CliError> {
    let data = read_file(input_path)?;
    let encoded = pipeline::run(data.as_slice(), operation)?;

    write_file(output_path, &encoded.bytes)?;

    log::debug!(
        "{} → {} ({} → {} bytes)",
        input_path.display(),
        output_path.display(),
        data.len(),
        encoded.bytes.len()
    );

    Ok((data.len() as u64, encoded.bytes.len() as u64))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_converter_core::ConvertError;
    use tempfile::TempDir;

    #[test]
    fn pipeline_failures_surface_as_convert_errors() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("broken.png");
        let output = tmp.path().join("broken-invert.jpg");
        std::fs::write(&input, b"not an image").unwrap();

        let result = process_file(&input, &output, &Operation::Invert);
        assert!(matches!(
            result,
            Err(CliError::Convert(ConvertError::Decode(_)))
        ));
        assert!(!output.exists());
    }
}
