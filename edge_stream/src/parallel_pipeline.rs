// THEORY:
// The staged pipeline runs the three stages as independent tasks connected by
// bounded FIFO channels, the same shape as a hardware dataflow region:
//
//   reader (luma) --[u8]--> convolver --[u8]--> packer
//
// Each stage awaits on an empty upstream channel and on a full downstream channel,
// so backpressure keeps memory bounded by the channel capacities no matter how large
// the frame is. Channels preserve order and every stage consumes and produces in
// raster order, so the result is byte-identical to the sequential chain. Capacity
// only changes how much the stages can overlap.

use crate::core_modules::convolver::SobelConvolver;
use crate::core_modules::geometry::FrameGeometry;
use crate::core_modules::luma::LumaConverter;
use crate::core_modules::packer::TransportPacker;
use crate::core_modules::transport::TransportWord;
use crate::error::EdgeError;
use log::debug;
use tokio::sync::mpsc;

/// Three-task pipeline over bounded channels.
#[derive(Debug, Clone, Copy)]
pub struct StagedPipeline {
    channel_capacity: usize,
}

impl StagedPipeline {
    pub fn new(channel_capacity: usize) -> Self {
        Self { channel_capacity: channel_capacity.max(1) }
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Runs one frame through the stage tasks and collects the packed output.
    pub async fn process(&self, input: Vec<TransportWord>, geometry: FrameGeometry) -> Result<Vec<TransportWord>, EdgeError> {
        geometry.validate_buffers(input.len(), geometry.output_words())?;
        let convolver = SobelConvolver::new(geometry)?;

        let (luma_tx, luma_rx) = mpsc::channel::<u8>(self.channel_capacity);
        let (edge_tx, edge_rx) = mpsc::channel::<u8>(self.channel_capacity);

        let reader = tokio::spawn(read_and_convert(input, geometry.input_pixels(), luma_tx));
        let sobel = tokio::spawn(convolve(convolver, luma_rx, edge_tx));
        let output = pack(edge_rx, geometry.output_words()).await;

        let (sent, emitted) = tokio::try_join!(reader, sobel)?;
        debug!(
            "staged {}x{} frame: {} luma samples, {} magnitudes, {} words",
            geometry.height,
            geometry.width,
            sent,
            emitted,
            output.len()
        );
        Ok(output)
    }
}

/// Stage 1: unpack words and push luma samples downstream.
async fn read_and_convert(input: Vec<TransportWord>, element_count: usize, luma_tx: mpsc::Sender<u8>) -> usize {
    let mut converter = LumaConverter::new(element_count);
    let mut sent = 0;
    for word in &input {
        if converter.is_finished() {
            break;
        }
        for luma in converter.convert(word) {
            if luma_tx.send(luma).await.is_err() {
                return sent;
            }
            sent += 1;
        }
    }
    sent
}

/// Stage 2: window every sample and forward interior magnitudes.
async fn convolve(mut convolver: SobelConvolver, mut luma_rx: mpsc::Receiver<u8>, edge_tx: mpsc::Sender<u8>) -> usize {
    while let Some(luma) = luma_rx.recv().await {
        if let Some(magnitude) = convolver.push(luma) {
            if edge_tx.send(magnitude).await.is_err() {
                break;
            }
        }
    }
    convolver.emitted()
}

/// Stage 3: pack magnitudes into words until the upstream closes.
async fn pack(mut edge_rx: mpsc::Receiver<u8>, expected_words: usize) -> Vec<TransportWord> {
    let mut packer = TransportPacker::new();
    let mut output = Vec::with_capacity(expected_words);
    while let Some(magnitude) = edge_rx.recv().await {
        output.extend(packer.push(magnitude));
    }
    output.extend(packer.finish());
    output
}
