//! Ring buffer of per-state decision bits with bounded-lag traceback
//!
//! Each decoding step writes one decision bit per state into the current row: `1` if the
//! winning predecessor was the one with the top state bit set. The buffer holds the most recent
//! `min_traceback_length + traceback_group_length` rows. When it fills, a traceback walks back
//! `min_traceback_length` rows without emitting (paths are unlikely to have merged yet), then
//! emits the older decision bits oldest-first and releases their rows. Renormalization of the
//! path metrics is scheduled here too, because it reuses the best-state search that a traceback
//! needs anyway.
//!
//! A decision bit read while walking back through row `t` is the oldest register bit of the
//! winning path at step `t`, which is exactly the input bit from `order - 1` steps earlier.

use crate::bitio::BitWriter;

/// Decision bit ring buffer for one decoder.
#[derive(Clone, Debug)]
pub(crate) struct HistoryBuffer {
    /// `cap` rows of `num_states` decision bits, stored flat.
    rows: Vec<u8>,
    /// Scratch for decision bits gathered newest-first during a traceback.
    fetched: Vec<u8>,
    num_states: usize,
    cap: usize,
    min_traceback_length: usize,
    index: usize,
    len: usize,
    renormalize_interval: usize,
    renormalize_counter: usize,
}

impl HistoryBuffer {
    /// Returns an empty buffer holding `min_traceback_length + traceback_group_length` rows.
    pub(crate) fn new(
        num_states: usize,
        min_traceback_length: usize,
        traceback_group_length: usize,
        renormalize_interval: usize,
    ) -> Self {
        let cap = min_traceback_length + traceback_group_length;
        Self {
            rows: vec![0; cap * num_states],
            fetched: vec![0; cap],
            num_states,
            cap,
            min_traceback_length,
            index: 0,
            len: 0,
            renormalize_interval,
            renormalize_counter: 0,
        }
    }

    /// Empties the buffer for a fresh decode.
    pub(crate) fn reset(&mut self) {
        self.index = 0;
        self.len = 0;
        self.renormalize_counter = 0;
    }

    /// Returns the row the current decoding step must fill.
    pub(crate) fn row_mut(&mut self) -> &mut [u8] {
        &mut self.rows[self.index * self.num_states ..][.. self.num_states]
    }

    /// Commits the row just filled and runs whatever bookkeeping has come due.
    ///
    /// `metrics` are the path metrics written by the same step; `stride` restricts the
    /// best-state search to every `stride`-th state (reachability shrinks while the encoder
    /// tail is being flushed). Emits decoded bits into `out` whenever the buffer is full.
    pub(crate) fn process(&mut self, metrics: &mut [u16], stride: usize, out: &mut BitWriter<'_>) {
        self.index = (self.index + 1) % self.cap;
        self.len += 1;
        self.renormalize_counter += 1;
        if self.renormalize_counter == self.renormalize_interval {
            self.renormalize_counter = 0;
            let best = search(metrics, stride);
            renormalize(metrics, best);
            if self.len == self.cap {
                self.traceback(best, self.min_traceback_length, out);
            }
        } else if self.len == self.cap {
            let best = search(metrics, stride);
            self.traceback(best, self.min_traceback_length, out);
        }
    }

    /// Emits every decision bit still held, starting the walk from state zero.
    ///
    /// Only valid once the encoder tail has been consumed, which pins the final state to zero.
    pub(crate) fn flush(&mut self, out: &mut BitWriter<'_>) {
        self.traceback(0, 0, out);
    }

    /// Walks back through the buffer from `best`, skipping the newest `keep` rows and then
    /// emitting the remaining decision bits oldest-first; the emitted rows are released.
    fn traceback(&mut self, mut best: usize, keep: usize, out: &mut BitWriter<'_>) {
        // one above the top state bit, so that shifting right lands it on the top bit
        let highbit = self.num_states;
        let mut index = self.index;
        for _ in 0 .. keep {
            index = if index == 0 { self.cap - 1 } else { index - 1 };
            let bit = self.rows[index * self.num_states + best];
            best = (best | if bit == 0 { 0 } else { highbit }) >> 1;
        }
        let num_emitted = self.len - keep;
        for slot in 0 .. num_emitted {
            index = if index == 0 { self.cap - 1 } else { index - 1 };
            let bit = self.rows[index * self.num_states + best];
            best = (best | if bit == 0 { 0 } else { highbit }) >> 1;
            self.fetched[slot] = bit;
        }
        for slot in (0 .. num_emitted).rev() {
            out.write_bit(self.fetched[slot]);
        }
        self.len = keep;
    }
}

/// Returns the state with the least path metric, visiting every `stride`-th state.
fn search(metrics: &[u16], stride: usize) -> usize {
    let mut best = 0;
    let mut least = u16::MAX;
    for state in (0 .. metrics.len()).step_by(stride) {
        if metrics[state] < least {
            least = metrics[state];
            best = state;
        }
    }
    best
}

/// Rebases all path metrics so the given state's metric becomes zero.
///
/// Subtracting a common offset preserves every comparison the decoder makes; entries below the
/// offset can only belong to states the current stride cannot reach, and saturation keeps them
/// out of contention.
fn renormalize(metrics: &mut [u16], best: usize) {
    let least = metrics[best];
    for metric in metrics.iter_mut() {
        *metric = metric.saturating_sub(least);
    }
}


#[cfg(test)]
mod tests_of_historybuffer {
    use super::*;

    #[test]
    fn test_flush_emits_oldest_first() {
        // Two states; write three rows whose decision bits for the surviving path spell out
        // the inputs 1, 0, 1 once the delay through the register is unwound.
        let mut buf = HistoryBuffer::new(2, 2, 3, usize::MAX);
        // Walk of the surviving path (state = previous input bit for order 2): the decision
        // bit stored at a row is read at the state the path occupied at that step.
        // Row 0: state 1 reached, winning predecessor had top bit set (input two steps back).
        buf.row_mut().copy_from_slice(&[0, 1]);
        let mut sink = [0u8; 1];
        let mut out = BitWriter::new(&mut sink, 8);
        buf.process(&mut [0, 0], 1, &mut out);
        buf.row_mut().copy_from_slice(&[1, 0]);
        buf.process(&mut [0, 0], 1, &mut out);
        buf.row_mut().copy_from_slice(&[0, 1]);
        buf.process(&mut [0, 0], 1, &mut out);
        // Nothing emitted yet: the buffer has capacity 5 and holds 3 rows
        assert_eq!(out.num_bits_written(), 0);
        buf.flush(&mut out);
        assert_eq!(out.num_bits_written(), 3);
        // Flush starts at state 0. Newest row gives bit 0, stays at state 0; middle row gives
        // bit 1, moves to state 1; oldest row gives bit 1 at state 1. Oldest-first output is
        // then 1, 1, 0.
        assert_eq!(sink[0] >> 5, 0b110);
    }

    #[test]
    fn test_traceback_when_full_keeps_min_rows() {
        let mut buf = HistoryBuffer::new(2, 1, 2, usize::MAX);
        let mut sink = [0u8; 2];
        let mut out = BitWriter::new(&mut sink, 16);
        // Capacity 3: the third commit triggers a traceback emitting len - min = 2 bits
        for _ in 0 .. 2 {
            buf.row_mut().copy_from_slice(&[0, 0]);
            buf.process(&mut [0, 4], 1, &mut out);
        }
        assert_eq!(out.num_bits_written(), 0);
        buf.row_mut().copy_from_slice(&[0, 0]);
        buf.process(&mut [0, 4], 1, &mut out);
        assert_eq!(out.num_bits_written(), 2);
        // One row retained; flush emits exactly it
        buf.flush(&mut out);
        assert_eq!(out.num_bits_written(), 3);
    }

    #[test]
    fn test_renormalization_is_scheduled_by_interval() {
        let mut buf = HistoryBuffer::new(2, 2, 8, 2);
        let mut sink = [0u8; 2];
        let mut out = BitWriter::new(&mut sink, 16);
        let mut metrics = [300u16, 100];
        buf.row_mut().fill(0);
        buf.process(&mut metrics, 1, &mut out);
        // Interval not yet reached
        assert_eq!(metrics, [300, 100]);
        buf.row_mut().fill(0);
        buf.process(&mut metrics, 1, &mut out);
        // Second commit renormalizes against the best state
        assert_eq!(metrics, [200, 0]);
    }
}
