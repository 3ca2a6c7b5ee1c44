use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use image_converter_core::decode::is_supported_path;

use crate::error::CliError;

/// Collect all decodable image files from the input path.
/// If `recursive` is true, walk subdirectories.
pub fn collect_files(input: &Path, recursive: bool) -> Result<Vec<PathBuf>, CliError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if !input.is_dir() {
        return Err(CliError::ReadFile {
            path: input.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a file or directory"),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files = WalkDir::new(input)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => return Some(Err(CliError::from(e))),
            };
            if !entry.file_type().is_file() {
                return None;
            }
            let path = entry.into_path();
            if is_supported_path(&path) {
                Some(Ok(path))
            } else {
                None
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    files.sort();
    Ok(files)
}

/// Resolve where the result for `input_file` goes.
///
/// - No output: next to the input, as `<stem>-<operation>.<ext>`.
/// - Single input file: the output path itself if it has an extension,
///   otherwise `<output>/<stem>.<ext>`.
/// - Directory input: mirror the relative structure under the output directory.
pub fn resolve_output(
    input_file: &Path,
    input_base: &Path,
    output_base: Option<&Path>,
    operation: &str,
    extension: &str,
) -> PathBuf {
    let stem = input_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());

    match output_base {
        None => input_file.with_file_name(format!("{stem}-{operation}.{extension}")),
        Some(out) => {
            if input_base.is_file() {
                if out.extension().is_some() {
                    out.to_path_buf()
                } else {
                    out.join(format!("{stem}.{extension}"))
                }
            } else {
                let relative = input_file.strip_prefix(input_base).unwrap_or(input_file);
                out.join(relative).with_extension(extension)
            }
        }
    }
}

/// Pair every input with its output path.
///
/// Inputs that differ only by extension (`cat.png`, `cat.jpg`) would land on
/// the same output; those get the source extension appended to the stem
/// (`cat-png.webp`). Any collision left after that is an error.
pub fn plan_outputs(
    files: &[PathBuf],
    input_base: &Path,
    output_base: Option<&Path>,
    operation: &str,
    extension: &str,
) -> Result<Vec<(PathBuf, PathBuf)>, CliError> {
    let resolved: Vec<PathBuf> = files
        .iter()
        .map(|f| resolve_output(f, input_base, output_base, operation, extension))
        .collect();

    let mut counts: HashMap<&Path, usize> = HashMap::new();
    for out in &resolved {
        *counts.entry(out.as_path()).or_default() += 1;
    }

    let plan: Vec<(PathBuf, PathBuf)> = files
        .iter()
        .zip(&resolved)
        .map(|(input, out)| {
            let out = if counts[out.as_path()] > 1 {
                with_source_extension(out, input, extension)
            } else {
                out.clone()
            };
            (input.clone(), out)
        })
        .collect();

    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for (input, out) in &plan {
        if let Some(first) = seen.insert(out.as_path(), input.as_path()) {
            return Err(CliError::OutputCollision {
                first: first.to_path_buf(),
                second: input.clone(),
                output: out.clone(),
            });
        }
    }

    Ok(plan)
}

fn with_source_extension(output: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    match input.extension() {
        Some(source) => output.with_file_name(format!(
            "{stem}-{}.{extension}",
            source.to_string_lossy().to_lowercase()
        )),
        None => output.to_path_buf(),
    }
}

/// Read file contents.
pub fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|e| CliError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write file contents, creating parent directories as needed.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CliError::WriteFile {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, data).map_err(|e| CliError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
