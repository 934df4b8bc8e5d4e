// framiq/src/processors/mod.rs
mod batch;
mod codec;
mod compositor;
mod compressor;
mod detect;
mod loader;

pub use batch::{spawn_batch, BatchPipeline};
pub use codec::{ImageCodec, ImageCrateCodec};
pub use compositor::Compositor;
pub use compressor::Compressor;
pub use detect::detect_in_directory;
pub use loader::Loader;

pub mod prelude {
    pub use super::{BatchPipeline, Compositor, Compressor, ImageCodec, ImageCrateCodec, Loader};
}
