//! Batched branch distance lookup for predecessor pairs
//!
//! Successor states `2k` and `2k + 1` share predecessor `k`, whose two branch outputs are
//! `table[2k]` (input `0`) and `table[2k + 1]` (input `1`). Many predecessors share the same
//! pair of outputs, so each distinct concatenated output value is assigned a small opaque key
//! once at construction. Per symbol group the decoder then fills one packed `u32` distance per
//! key (input-`1` branch distance in the high half, input-`0` in the low half) and the
//! add-compare-select loop reads uniform-stride key and distance arrays, a layout the compiler
//! can vectorize without any instruction-set-specific code.

/// Key table mapping each predecessor to its packed branch distance slot.
///
/// Immutable after construction and shared by every decoder of a codec; the packed distances
/// themselves are per-decoder scratch.
#[derive(Clone, Debug)]
pub(crate) struct PairLookup {
    /// Opaque distance key per predecessor state; key `0` is reserved for unused slots.
    keys: Vec<u32>,
    /// Distinct concatenated output values, indexed by key.
    outputs: Vec<u32>,
    /// Mask extracting one output group from a concatenated value.
    output_mask: u32,
    /// Width of one output group in bits.
    output_shift: u32,
}

impl PairLookup {
    /// Builds the key table for the given code.
    pub(crate) fn new(rate: usize, order: usize, table: &[u16]) -> Self {
        let num_states = 1usize << (order - 1);
        let mut keys = vec![0u32; num_states];
        let mut outputs = vec![0u32; 1];
        let mut key_of_output = vec![0u32; 1 << (2 * rate)];
        for (pred, key) in keys.iter_mut().enumerate() {
            let concat = (u32::from(table[2 * pred + 1]) << rate) | u32::from(table[2 * pred]);
            if key_of_output[concat as usize] == 0 {
                key_of_output[concat as usize] = outputs.len() as u32;
                outputs.push(concat);
            }
            *key = key_of_output[concat as usize];
        }
        Self {
            keys,
            outputs,
            output_mask: (1 << rate) - 1,
            output_shift: rate as u32,
        }
    }

    /// Returns the number of packed distance slots a decoder must allocate.
    pub(crate) fn num_slots(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the distance key for the given predecessor state.
    pub(crate) fn key(&self, pred: usize) -> u32 {
        self.keys[pred]
    }

    /// Packs the branch distances for one symbol group into the per-key table.
    pub(crate) fn fill_distances(&self, distances: &[u16], packed: &mut [u32]) {
        for (slot, &concat) in packed.iter_mut().zip(self.outputs.iter()).skip(1) {
            let out_0 = (concat & self.output_mask) as usize;
            let out_1 = (concat >> self.output_shift) as usize;
            *slot = (u32::from(distances[out_1]) << 16) | u32::from(distances[out_0]);
        }
    }
}
