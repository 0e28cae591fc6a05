//! Ping-pong storage for accumulated path metrics
//!
//! Two equally sized `u16` buffers hold the metrics of the previous and the current time step.
//! Advancing a step swaps which buffer is read and which is written by flipping an index; the
//! buffers themselves are never copied.

/// Accumulated path metrics for every decoder state, double-buffered across time steps.
#[derive(Clone, Debug)]
pub(crate) struct PathMetricStore {
    buffers: [Vec<u16>; 2],
    read_index: usize,
}

impl PathMetricStore {
    /// Returns a store with both buffers zeroed, one `u16` per state.
    pub(crate) fn new(num_states: usize) -> Self {
        Self {
            buffers: [vec![0; num_states], vec![0; num_states]],
            read_index: 0,
        }
    }

    /// Zeroes both buffers and resets the swap index.
    pub(crate) fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0);
        }
        self.read_index = 0;
    }

    /// Returns the previous step's metrics and the current step's write buffer.
    pub(crate) fn split(&mut self) -> (&[u16], &mut [u16]) {
        let (first, second) = self.buffers.split_at_mut(1);
        if self.read_index == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        }
    }

    /// Returns the metrics written by the most recent step.
    pub(crate) fn written(&mut self) -> &mut [u16] {
        &mut self.buffers[1 - self.read_index]
    }

    /// Makes the buffer written by the current step the read buffer of the next one.
    pub(crate) fn swap(&mut self) {
        self.read_index = 1 - self.read_index;
    }
}
