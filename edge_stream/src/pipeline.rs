// THEORY:
// The `pipeline` module is the top-level API of the edge engine. It wires the three
// stages (luma conversion, windowed Sobel, transport packing) into one pass over a
// packed input buffer and fills a packed output buffer.
//
// The sequential path is an iterator chain: each transport word is unpacked, each
// luma sample is pushed through the convolver, and each magnitude lands straight in
// the packer. No intermediate frame is materialised between stages, so the working
// set is the convolver's two-row line buffer plus one word on either side.
//
// `EdgePipeline` is the configured front door. It runs either this sequential chain
// or the staged, channel-connected variant in `parallel_pipeline`; both produce the
// same bytes for the same input.

use crate::core_modules::convolver::SobelConvolver;
use crate::core_modules::geometry::FrameGeometry;
use crate::core_modules::luma::luma_stream;
use crate::core_modules::packer::TransportPacker;
use crate::core_modules::transport::TransportWord;
use crate::error::EdgeError;
use crate::parallel_pipeline::StagedPipeline;
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// How the three stages are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One thread, stages fused into a single iterator chain.
    #[default]
    Sequential,
    /// Three concurrent tasks joined by bounded channels.
    Staged,
}

/// Configuration for the EdgePipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: ExecutionMode,
    /// Capacity of each inter-stage channel in staged mode. Throughput only; any
    /// non-zero value yields the same output.
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Runs the full pipeline over `input`, writing packed magnitudes into `output`.
///
/// Returns the number of transport words written. Both buffers are validated
/// against `geometry` before any stage runs; on error `output` is untouched.
pub fn process_frame(
    input: &[TransportWord],
    output: &mut [TransportWord],
    geometry: FrameGeometry,
) -> Result<usize, EdgeError> {
    geometry.validate_buffers(input.len(), output.len())?;

    let mut convolver = SobelConvolver::new(geometry)?;
    let mut packer = TransportPacker::new();
    let mut written = 0;

    // Drive the chain to the end of the input even when no word comes out of it.
    let words = luma_stream(input, geometry.input_pixels())
        .filter_map(|luma| convolver.push(luma))
        .filter_map(|magnitude| packer.push(magnitude));
    for word in words {
        if let Some(slot) = output.get_mut(written) {
            *slot = word;
            written += 1;
        }
    }
    if let (Some(tail), Some(slot)) = (packer.finish(), output.get_mut(written)) {
        *slot = tail;
        written += 1;
    }

    debug!(
        "processed {}x{} frame: {} magnitudes in {} words",
        geometry.height,
        geometry.width,
        convolver.emitted(),
        written
    );
    Ok(written)
}

/// The host-facing entry point: consumes `input`, fills `output`, returns nothing.
///
/// Callers are expected to validate the dimensions and buffer sizes first. A
/// violation is logged and the output buffer is left as it was.
pub fn image_process(input: &[TransportWord], output: &mut [TransportWord], height: usize, width: usize) {
    if let Err(err) = process_frame(input, output, FrameGeometry::new(height, width)) {
        error!("image_process rejected a {height}x{width} frame: {err}");
    }
}

/// The main, top-level struct for the edge engine.
#[derive(Debug, Clone, Default)]
pub struct EdgePipeline {
    config: PipelineConfig,
}

impl EdgePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one frame and returns a freshly allocated output buffer of exactly
    /// `geometry.output_words()` words.
    pub async fn run(&self, input: Vec<TransportWord>, geometry: FrameGeometry) -> Result<Vec<TransportWord>, EdgeError> {
        match self.config.mode {
            ExecutionMode::Sequential => {
                tokio::task::spawn_blocking(move || run_sequential(&input, geometry)).await?
            }
            ExecutionMode::Staged => {
                StagedPipeline::new(self.config.channel_capacity)
                    .process(input, geometry)
                    .await
            }
        }
    }
}

/// Sequential run into an owned buffer.
pub fn run_sequential(input: &[TransportWord], geometry: FrameGeometry) -> Result<Vec<TransportWord>, EdgeError> {
    geometry.validate()?;
    let mut output = vec![TransportWord::ZERO; geometry.output_words()];
    process_frame(input, &mut output, geometry)?;
    Ok(output)
}
