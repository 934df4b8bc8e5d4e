// framiq/src/cli.rs
use crate::core::{AspectRatioSpec, ProcessConfig, ResizeAlgorithm};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "framiq")]
#[command(version, about = "Fit images onto a fixed aspect-ratio white canvas", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Frame a single image, written next to it as <name>_framiq.<ext>
    Frame {
        /// Image to frame
        input: PathBuf,

        #[command(flatten)]
        frame: FrameArgs,

        #[command(flatten)]
        encode: EncodeArgs,
    },

    /// Frame every supported image of a directory
    Batch {
        /// Directory containing the images
        input: PathBuf,

        /// Directory receiving the framed images (created if missing)
        output: PathBuf,

        #[command(flatten)]
        frame: FrameArgs,

        #[command(flatten)]
        encode: EncodeArgs,

        /// Worker threads: 1 is sequential, 0 uses every core
        #[arg(short = 'j', long, default_value_t = 1)]
        threads: usize,
    },

    /// List the aspect ratios found in a directory, most common first
    Detect {
        /// Directory to scan
        input: PathBuf,
    },

    /// Print the canvas layout for an image size without touching files
    Layout {
        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        #[command(flatten)]
        frame: FrameArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FrameArgs {
    /// Target aspect ratio: W:H, WxH or a preset name (square, instagram, story, ...)
    #[arg(short, long, default_value = "1:1")]
    pub ratio: AspectRatioSpec,

    /// Passepartout size in percent of the canvas (0-50)
    #[arg(short, long, default_value_t = 0.0)]
    pub border: f64,
}

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 90)]
    pub quality: u8,

    /// Resampling filter
    #[arg(short, long, value_enum, default_value_t = Algorithm::Lanczos3)]
    pub algorithm: Algorithm,

    /// Run PNG output through oxipng
    #[arg(long)]
    pub optimize_png: bool,
}

impl EncodeArgs {
    pub fn to_config(&self, threads: usize) -> ProcessConfig {
        ProcessConfig {
            quality: self.quality,
            algorithm: self.algorithm.into(),
            optimize_png: self.optimize_png,
            threads,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}
