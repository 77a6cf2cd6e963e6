// THEORY:
// The `transport` module defines the packed unit that carries pixels across the
// boundary of the edge engine. Pixels never travel one at a time; they travel in
// wide, fixed-size words that hold several 32-bit pixel slots side by side.
//
// Key architectural principles:
// 1.  **Named Geometry**: The word width, slot width and slot count are named
//     constants. Nothing else in the crate hard-codes "16" or "32".
// 2.  **Little-Endian Slots**: Slot 0 occupies bits 0..32 of the word, slot 1 bits
//     32..64, and so on. A word is therefore just an ordered array of `u32` slots,
//     and packing is plain shift/mask arithmetic on those slots.
// 3.  **Zero Tail**: The final word of a stream may be partial. Every slot beyond
//     the valid element count is zero, both on the way in and on the way out.

/// Width of one transport word in bits.
pub const TRANSPORT_WIDTH_BITS: usize = 512;
/// Width of one pixel slot in bits.
pub const SLOT_BITS: usize = 32;
/// Number of pixel slots carried by one transport word.
pub const SLOTS_PER_WORD: usize = TRANSPORT_WIDTH_BITS / SLOT_BITS;

const _: () = assert!(TRANSPORT_WIDTH_BITS % SLOT_BITS == 0);

const CHANNEL_MASK: u32 = 0xFF;
const RED_SHIFT: u32 = 16;
const GREEN_SHIFT: u32 = 8;
const BLUE_SHIFT: u32 = 0;

/// One wide transport word: `SLOTS_PER_WORD` packed 32-bit pixel slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransportWord([u32; SLOTS_PER_WORD]);

impl TransportWord {
    /// A word with every slot zeroed.
    pub const ZERO: Self = Self([0; SLOTS_PER_WORD]);

    pub fn from_slots(slots: [u32; SLOTS_PER_WORD]) -> Self {
        Self(slots)
    }

    pub fn slots(&self) -> &[u32; SLOTS_PER_WORD] {
        &self.0
    }

    /// Reads slot `index`. Out-of-range indices read as an empty slot.
    pub fn slot(&self, index: usize) -> u32 {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// Writes slot `index`. Out-of-range indices are ignored.
    pub fn set_slot(&mut self, index: usize, value: u32) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }

    /// Serializes the word as little-endian bytes (slot 0 first).
    pub fn to_le_bytes(&self) -> [u8; TRANSPORT_WIDTH_BITS / 8] {
        let mut bytes = [0u8; TRANSPORT_WIDTH_BITS / 8];
        for (chunk, slot) in bytes.chunks_exact_mut(SLOT_BITS / 8).zip(self.0.iter()) {
            chunk.copy_from_slice(&slot.to_le_bytes());
        }
        bytes
    }
}

/// Number of transport words needed to carry `element_count` slots.
pub fn words_for(element_count: usize) -> usize {
    element_count.div_ceil(SLOTS_PER_WORD)
}

/// Packs one colour pixel as `0x00RRGGBB`.
pub fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << RED_SHIFT) | ((green as u32) << GREEN_SHIFT) | ((blue as u32) << BLUE_SHIFT)
}

/// Splits a `0x00RRGGBB` slot into its channels. The top byte is ignored.
pub fn unpack_rgb(slot: u32) -> (u8, u8, u8) {
    (
        ((slot >> RED_SHIFT) & CHANNEL_MASK) as u8,
        ((slot >> GREEN_SHIFT) & CHANNEL_MASK) as u8,
        ((slot >> BLUE_SHIFT) & CHANNEL_MASK) as u8,
    )
}

/// Replicates a single-channel value into all three colour bytes (`0x00VVVVVV`).
pub fn replicate_gray(value: u8) -> u32 {
    pack_rgb(value, value, value)
}

/// Packs a flat slot sequence into transport words, zero-padding the last word.
pub fn pack_slots(slots: &[u32]) -> Vec<TransportWord> {
    slots
        .chunks(SLOTS_PER_WORD)
        .map(|chunk| {
            let mut word = TransportWord::ZERO;
            word.0[..chunk.len()].copy_from_slice(chunk);
            word
        })
        .collect()
}

/// Unpacks the first `element_count` slots of a word buffer.
///
/// If the buffer carries fewer slots than requested, only the available slots
/// are returned.
pub fn unpack_slots(words: &[TransportWord], element_count: usize) -> Vec<u32> {
    words
        .iter()
        .flat_map(|word| word.0.iter().copied())
        .take(element_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sixteen_slots_per_word() {
        assert_eq!(SLOTS_PER_WORD, 16);
        assert_eq!(words_for(0), 0);
        assert_eq!(words_for(1), 1);
        assert_eq!(words_for(16), 1);
        assert_eq!(words_for(17), 2);
    }

    #[test]
    fn rgb_layout_is_0x00rrggbb() {
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x0012_3456);
        assert_eq!(unpack_rgb(0xFF12_3456), (0x12, 0x34, 0x56));
        assert_eq!(replicate_gray(0xAB), 0x00AB_ABAB);
    }

    #[test]
    fn slots_fill_low_to_high() {
        let slots: Vec<u32> = (1..=3).collect();
        let words = pack_slots(&slots);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].slot(0), 1);
        assert_eq!(words[0].slot(2), 3);

        let bytes = words[0].to_le_bytes();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[2, 0, 0, 0]);
    }

    #[test]
    fn partial_word_tail_is_zero() {
        let slots = vec![0xFFFF_FFFFu32; SLOTS_PER_WORD + 5];
        let words = pack_slots(&slots);
        assert_eq!(words.len(), 2);
        assert!(words[1].slots()[5..].iter().all(|&s| s == 0));
        assert_eq!(unpack_slots(&words, slots.len()), slots);
    }

    #[test]
    fn out_of_range_slot_access_is_inert() {
        let mut word = TransportWord::ZERO;
        word.set_slot(SLOTS_PER_WORD, 7);
        assert_eq!(word, TransportWord::ZERO);
        assert_eq!(word.slot(SLOTS_PER_WORD + 3), 0);
    }

    proptest! {
        #[test]
        fn rgb_pack_then_unpack_is_identity(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let slot = pack_rgb(r, g, b);
            prop_assert_eq!(slot >> 24, 0);
            prop_assert_eq!(unpack_rgb(slot), (r, g, b));
        }

        #[test]
        fn slot_buffers_survive_packing(slots in prop::collection::vec(any::<u32>(), 0..100)) {
            let words = pack_slots(&slots);
            prop_assert_eq!(words.len(), words_for(slots.len()));
            prop_assert_eq!(unpack_slots(&words, slots.len()), slots.clone());
            let tail = slots.len() % SLOTS_PER_WORD;
            if let (Some(last), true) = (words.last(), tail != 0) {
                prop_assert!(last.slots()[tail..].iter().all(|&s| s == 0));
            }
        }
    }
}
