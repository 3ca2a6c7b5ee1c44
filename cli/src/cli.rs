use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use image_converter_core::format::{DEFAULT_INTENSITY, DEFAULT_QUALITY};
use image_converter_core::{
    ConvertError, ConvertOptions, FilterName, FilterSettings, Operation, OutputFormat,
};

/// Convert, crop, pad, invert and filter images in bulk
#[derive(Debug, Parser)]
#[command(name = "image_converter", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Input/output selection shared by every command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Input file or directory
    pub input: PathBuf,

    /// Output file or directory (default: next to each input, suffixed with the command)
    pub output: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Show what would be done without writing files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Re-encode images as JPEG, PNG or WebP
    Convert {
        #[command(flatten)]
        batch: BatchArgs,

        /// Target format (jpeg, png, webp)
        #[arg(long, short = 't', value_name = "FORMAT")]
        to: OutputFormat,

        /// Quality for lossy formats (1-100)
        #[arg(short, long, default_value_t = DEFAULT_QUALITY, allow_negative_numbers = true)]
        quality: i32,
    },

    /// Crop the centered square of the shorter side (JPEG output)
    SquareCrop {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Pad onto a white square of the longer side
    FitToSquare {
        #[command(flatten)]
        batch: BatchArgs,

        /// Target format (jpeg, png, webp)
        #[arg(long, short = 't', value_name = "FORMAT")]
        to: OutputFormat,

        /// Quality for lossy formats (1-100)
        #[arg(short, long, default_value_t = DEFAULT_QUALITY, allow_negative_numbers = true)]
        quality: i32,
    },

    /// Invert colors (JPEG output)
    Invert {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Apply a blur or grayscale filter (JPEG output)
    Filter {
        #[command(flatten)]
        batch: BatchArgs,

        /// Filter name (blur, grayscale)
        #[arg(long, short = 'n', value_name = "FILTER")]
        name: FilterName,

        /// Blur sigma, or contrast percentage for grayscale
        #[arg(long, short = 'i', default_value_t = DEFAULT_INTENSITY, allow_negative_numbers = true)]
        intensity: i32,
    },

    /// Make a 400x400 JPEG avatar
    ProfilePicture {
        #[command(flatten)]
        batch: BatchArgs,
    },
}

impl Command {
    pub fn batch(&self) -> &BatchArgs {
        match self {
            Command::Convert { batch, .. }
            | Command::SquareCrop { batch }
            | Command::FitToSquare { batch, .. }
            | Command::Invert { batch }
            | Command::Filter { batch, .. }
            | Command::ProfilePicture { batch } => batch,
        }
    }

    /// Build and validate the pipeline operation this command runs.
    pub fn operation(&self) -> Result<Operation, ConvertError> {
        let operation = match self {
            Command::Convert { to, quality, .. } => {
                Operation::Convert(ConvertOptions::new(*to, *quality))
            }
            Command::SquareCrop { .. } => Operation::SquareCrop,
            Command::FitToSquare { to, quality, .. } => {
                Operation::FitToSquare(ConvertOptions::new(*to, *quality))
            }
            Command::Invert { .. } => Operation::Invert,
            Command::Filter {
                name, intensity, ..
            } => Operation::ApplyFilter(FilterSettings::new(*name, *intensity)),
            Command::ProfilePicture { .. } => Operation::ProfilePicture,
        };
        operation.validate()?;
        Ok(operation)
    }
}
