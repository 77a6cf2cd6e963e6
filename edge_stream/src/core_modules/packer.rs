// THEORY:
// The `TransportPacker` is the last stage. It takes the single-channel magnitude
// stream and puts it back on the same packed transport used for colour input, so
// the host side can move results with the same word-sized transfers. Each magnitude
// is replicated into the three colour bytes of its slot, which keeps the output
// viewable as a grey RGB image without any further conversion.

use crate::core_modules::transport::{SLOTS_PER_WORD, TransportWord, replicate_gray};

/// Accumulates magnitudes into transport words.
#[derive(Debug, Clone, Default)]
pub struct TransportPacker {
    current: TransportWord,
    /// Slots of `current` already written.
    filled: usize,
    /// Complete words handed out so far.
    words_emitted: usize,
}

impl TransportPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packs one magnitude. Returns a word once all of its slots are filled.
    pub fn push(&mut self, magnitude: u8) -> Option<TransportWord> {
        self.current.set_slot(self.filled, replicate_gray(magnitude));
        self.filled += 1;
        if self.filled == SLOTS_PER_WORD {
            self.filled = 0;
            self.words_emitted += 1;
            Some(std::mem::take(&mut self.current))
        } else {
            None
        }
    }

    /// Flushes a partially filled word. Unused slots stay zero.
    pub fn finish(self) -> Option<TransportWord> {
        (self.filled > 0).then_some(self.current)
    }

    pub fn words_emitted(&self) -> usize {
        self.words_emitted
    }
}

/// Packs a whole magnitude sequence into words.
pub fn pack_magnitudes(magnitudes: impl IntoIterator<Item = u8>) -> Vec<TransportWord> {
    let mut packer = TransportPacker::new();
    let mut words: Vec<TransportWord> = magnitudes.into_iter().filter_map(|m| packer.push(m)).collect();
    words.extend(packer.finish());
    words
}
