// THEORY:
// This file is the main entry point for the `edge_stream` library crate.
//
// The crate turns a packed colour frame into a packed Sobel edge map in a single
// streaming pass with bounded memory: luma conversion, a line-buffered 3x3
// convolver, and a transport packer. `pipeline` exposes that engine (sequential and
// staged), while `frame_io`, `batch` and `config` are the host-side collaborators
// that feed it from image files and report on a directory-sized run. The stage
// internals live in `core_modules`.

pub mod batch;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod frame_io;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::geometry::FrameGeometry;
pub use core_modules::line_buffer::MAX_WIDTH;
pub use core_modules::transport::{SLOTS_PER_WORD, TransportWord};
pub use error::EdgeError;
pub use pipeline::{EdgePipeline, ExecutionMode, PipelineConfig, image_process, process_frame};
