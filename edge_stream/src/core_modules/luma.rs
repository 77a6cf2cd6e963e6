// THEORY:
// The `luma` module is the first stage of the edge engine. It turns packed colour
// transport words into a flat stream of single-channel brightness samples.
//
// The conversion is a fixed-point approximation of the Rec. 601 weights
// (0.299, 0.587, 0.114) scaled by 256: 77 + 150 + 29 = 256, so the weighted sum of
// three bytes never exceeds 255 * 256 and the truncating shift always lands in
// 0..=255. There is no rounding step.
//
// The stage knows how many real pixels the stream carries. Padding slots in the
// final word are never turned into samples.

use crate::core_modules::transport::{SLOTS_PER_WORD, TransportWord, unpack_rgb};

pub const LUMA_WEIGHT_RED: u32 = 77;
pub const LUMA_WEIGHT_GREEN: u32 = 150;
pub const LUMA_WEIGHT_BLUE: u32 = 29;
pub const LUMA_SHIFT: u32 = 8;

/// Converts one RGB triple to luma with truncating fixed-point arithmetic.
#[inline]
pub fn luma(red: u8, green: u8, blue: u8) -> u8 {
    let weighted =
        red as u32 * LUMA_WEIGHT_RED + green as u32 * LUMA_WEIGHT_GREEN + blue as u32 * LUMA_WEIGHT_BLUE;
    (weighted >> LUMA_SHIFT) as u8
}

/// Converts one `0x00RRGGBB` slot to luma.
#[inline]
pub fn slot_luma(slot: u32) -> u8 {
    let (red, green, blue) = unpack_rgb(slot);
    luma(red, green, blue)
}

/// Lazily converts a whole word buffer into exactly `element_count` luma samples.
pub fn luma_stream(words: &[TransportWord], element_count: usize) -> impl Iterator<Item = u8> + '_ {
    words
        .iter()
        .flat_map(|word| word.slots().iter().copied())
        .take(element_count)
        .map(slot_luma)
}

/// Word-at-a-time converter used where the stage is driven by a channel.
#[derive(Debug, Clone)]
pub struct LumaConverter {
    /// Pixels still owed to the downstream stage.
    remaining: usize,
}

impl LumaConverter {
    pub fn new(element_count: usize) -> Self {
        Self { remaining: element_count }
    }

    /// Unpacks one word, yielding only the slots that carry real pixels.
    pub fn convert<'w>(&mut self, word: &'w TransportWord) -> impl Iterator<Item = u8> + use<'w> {
        let valid = self.remaining.min(SLOTS_PER_WORD);
        self.remaining -= valid;
        word.slots()[..valid].iter().copied().map(slot_luma)
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}
