use std::path::PathBuf;
use thiserror::Error;

use image_converter_core::ConvertError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{first} and {second} would both be written to {output}")]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),
}
