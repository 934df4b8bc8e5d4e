mod cli;
mod core;
mod processors;
mod utils;

pub use crate::cli::{Algorithm, Cli, Commands, EncodeArgs, FrameArgs};
pub use crate::core::aspect::{detect, gcd, round_to_common_ratio, PRESET_TOLERANCE};
pub use crate::core::geometry::{fit_within, PixelGeometry};
pub use crate::core::{
    compute_layout, display_name, AspectPreset, AspectRatioSpec, BatchRunState, BorderPercent,
    CancelToken, DetectedAspectRatioGroup, Dimensions, FramiqError, ImageSample, Layout,
    OutputFormat, ProcessConfig, ResizeAlgorithm, Result, RunOutcome, RunStateHandle, PRESETS,
};
pub use crate::processors::{
    detect_in_directory, spawn_batch, BatchPipeline, Compositor, Compressor, ImageCodec,
    ImageCrateCodec, Loader,
};
pub use crate::utils::{
    batch_output_name, batch_output_path, format_file_size, is_supported_format,
    list_supported_files, single_output_name, single_output_path, SUPPORTED_EXTENSIONS,
};

pub mod prelude {
    pub use crate::{
        compute_layout, AspectRatioSpec, BatchPipeline, BorderPercent, Dimensions, ImageCodec,
        ImageCrateCodec, ProcessConfig, RunOutcome,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
