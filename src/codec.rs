//! Encoder and Viterbi decoder for a convolutional code

use crate::bitio::{BitReader, BitWriter};
use crate::history::HistoryBuffer;
use crate::lookup::PairLookup;
use crate::metric;
use crate::path_metrics::PathMetricStore;
use crate::trellis;
use crate::{Error, MetricKind};

/// Smallest supported shift register width.
pub const MIN_ORDER: usize = 2;
/// Largest supported shift register width.
pub const MAX_ORDER: usize = 16;
/// Smallest supported number of output bits per input bit.
pub const MIN_RATE: usize = 2;
/// Largest supported number of output bits per input bit.
pub const MAX_RATE: usize = 8;

/// Convolutional code configuration with its precomputed tables.
///
/// A codec is immutable once built and can be shared freely between threads; per-decode mutable
/// state lives in [`Decoder`] values obtained from [`Codec::new_decoder`].
#[derive(Clone, Debug)]
pub struct Codec {
    rate: usize,
    order: usize,
    polynomials: Vec<u16>,
    /// Concatenated output bits per shift register value.
    table: Vec<u16>,
    pair_lookup: PairLookup,
}

impl Codec {
    /// Returns a codec for the given code.
    ///
    /// # Parameters
    ///
    /// - `rate`: Number of output bits per input bit. Must be in `2 ..= 8`.
    ///
    /// - `order`: Number of bits in the shift register. Must be in `2 ..= 16`.
    ///
    /// - `polynomials`: Tap masks, one per output bit. Each must be nonzero and fit in `order`
    ///   bits; bit `j` of the mask taps the bit that entered the register `j` steps ago.
    ///
    /// # Errors
    ///
    /// Returns an error if `rate` or `order` is out of range, if `polynomials.len() != rate`,
    /// or if any polynomial is zero or too wide for the register.
    ///
    /// # Examples
    ///
    /// ```
    /// use convfec::Codec;
    ///
    /// let codec = Codec::new(2, 7, &[0x6D, 0x4F])?;
    /// assert_eq!(codec.encoded_bits(1), 2 * (8 + 7));
    /// # Ok::<(), convfec::Error>(())
    /// ```
    pub fn new(rate: usize, order: usize, polynomials: &[u16]) -> Result<Self, Error> {
        if !(MIN_RATE ..= MAX_RATE).contains(&rate) {
            return Err(Error::InvalidConfig(format!(
                "Rate {rate} is not in [{MIN_RATE}, {MAX_RATE}]"
            )));
        }
        if !(MIN_ORDER ..= MAX_ORDER).contains(&order) {
            return Err(Error::InvalidConfig(format!(
                "Order {order} is not in [{MIN_ORDER}, {MAX_ORDER}]"
            )));
        }
        if polynomials.len() != rate {
            return Err(Error::InvalidConfig(format!(
                "Expected {} polynomials for rate {} (found {})",
                rate,
                rate,
                polynomials.len()
            )));
        }
        for &poly in polynomials {
            if poly == 0 {
                return Err(Error::InvalidConfig(
                    "Polynomials must be nonzero".to_string(),
                ));
            }
            if order < 16 && poly >> order != 0 {
                return Err(Error::InvalidConfig(format!(
                    "Polynomial {poly:#x} has taps beyond the {order}-bit register"
                )));
            }
        }
        let table = trellis::output_table(rate, order, polynomials);
        let pair_lookup = PairLookup::new(rate, order, &table);
        Ok(Self {
            rate,
            order,
            polynomials: polynomials.to_vec(),
            table,
            pair_lookup,
        })
    }

    /// Returns the number of output bits per input bit.
    #[must_use]
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Returns the number of bits in the shift register.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the tap masks, one per output bit.
    #[must_use]
    pub fn polynomials(&self) -> &[u16] {
        &self.polynomials
    }

    /// Returns the number of encoded bits produced for a message of `msg_len` bytes, tail
    /// included.
    #[must_use]
    pub fn encoded_bits(&self, msg_len: usize) -> usize {
        self.rate * (8 * msg_len + self.order)
    }

    /// Returns the number of encoded bytes produced for a message of `msg_len` bytes.
    #[must_use]
    pub fn encoded_bytes(&self, msg_len: usize) -> usize {
        self.encoded_bits(msg_len).div_ceil(8)
    }

    /// Encodes a message into a freshly allocated buffer.
    ///
    /// The output carries `rate * (8 * msg.len() + order)` bits, the final `order` symbol
    /// groups being the tail that drives the register back to zero; unused bits of the last
    /// byte are zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use convfec::Codec;
    ///
    /// let codec = Codec::new(2, 3, &[0b111, 0b101])?;
    /// assert_eq!(codec.encode(&[0xA5]), [0xD1, 0xF4, 0x70]);
    /// # Ok::<(), convfec::Error>(())
    /// ```
    #[must_use]
    pub fn encode(&self, msg: &[u8]) -> Vec<u8> {
        let mut encoded = vec![0u8; self.encoded_bytes(msg.len())];
        // OK to drop the result: the buffer is sized to fit by construction.
        let _ = self.encode_into(msg, &mut encoded);
        encoded
    }

    /// Encodes a message into a caller-provided buffer and returns the number of bytes used.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` is shorter than [`Codec::encoded_bytes`] of `msg.len()`.
    pub fn encode_into(&self, msg: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        let num_bytes = self.encoded_bytes(msg.len());
        if out.len() < num_bytes {
            return Err(Error::BufferTooSmall(out.len(), num_bytes));
        }
        let mask = ((1u32 << self.order) - 1) as u16;
        let mut writer = BitWriter::new(out, self.encoded_bits(msg.len()));
        let mut reader = BitReader::new(msg);
        let mut register = 0u16;
        for _ in 0 .. 8 * msg.len() {
            register = ((register << 1) | u16::from(reader.read_bit())) & mask;
            writer.write(self.table[register as usize], self.rate);
        }
        for _ in 0 .. self.order {
            register = (register << 1) & mask;
            writer.write(self.table[register as usize], self.rate);
        }
        Ok(num_bytes)
    }

    /// Returns a decoder for this codec with default traceback and renormalization settings.
    #[must_use]
    pub fn new_decoder(&self, metric_kind: MetricKind) -> Decoder<'_> {
        self.new_decoder_with_options(metric_kind, DecoderOptions::default())
    }

    /// Returns a decoder for this codec with explicit traceback and renormalization settings.
    #[must_use]
    pub fn new_decoder_with_options(
        &self,
        metric_kind: MetricKind,
        options: DecoderOptions,
    ) -> Decoder<'_> {
        let num_states = 1usize << (self.order - 1);
        let min_traceback_length = options.min_traceback_length.unwrap_or(5 * self.order);
        let traceback_group_length = options.traceback_group_length.unwrap_or(15 * self.order);
        let renormalize_interval = options
            .renormalize_interval
            .unwrap_or_else(|| default_renormalize_interval(self.rate, metric_kind));
        Decoder {
            codec: self,
            metric_kind,
            distances: vec![0; 1 << self.rate],
            pair_distances: vec![0; self.pair_lookup.num_slots()],
            metrics: PathMetricStore::new(num_states),
            history: HistoryBuffer::new(
                num_states,
                min_traceback_length,
                traceback_group_length,
                renormalize_interval,
            ),
        }
    }
}

/// Overrides for a decoder's traceback window and renormalization schedule.
///
/// A `None` field falls back to the default: a minimum traceback of `5 * order` steps, a
/// traceback group of `15 * order` steps, and a renormalization interval derived from the
/// metric kind's largest per-step distance so path metrics cannot overflow in between.
#[derive(Clone, Debug, Copy, Default)]
pub struct DecoderOptions {
    /// Number of steps a traceback walks before trusting (and emitting) decisions.
    pub min_traceback_length: Option<usize>,
    /// Number of additional steps buffered between tracebacks.
    pub traceback_group_length: Option<usize>,
    /// Number of steps between path metric renormalizations.
    pub renormalize_interval: Option<usize>,
}

/// Returns the largest renormalization interval that keeps `u16` path metrics from
/// overflowing between renormalizations.
fn default_renormalize_interval(rate: usize, metric_kind: MetricKind) -> usize {
    let max_step_distance = match metric_kind {
        MetricKind::Hard => rate,
        MetricKind::SoftLinear => rate * usize::from(metric::SOFT_MAX),
        MetricKind::SoftQuadratic => {
            (rate * usize::from(metric::SOFT_MAX) * usize::from(metric::SOFT_MAX)) >> 3
        }
    };
    (usize::from(u16::MAX) / max_step_distance).max(1)
}

/// Viterbi decoder holding the mutable per-decode stores for one [`Codec`].
///
/// A decoder is reset at the start of every decode call and performs no allocation across
/// repeated calls beyond the returned message buffer. Decoders are not shared across threads;
/// create one per worker and share only the codec.
#[derive(Debug)]
pub struct Decoder<'a> {
    codec: &'a Codec,
    metric_kind: MetricKind,
    /// Branch distance per candidate output group, refilled for every symbol group.
    distances: Vec<u16>,
    /// Packed pair distances, indexed by the codec's pair lookup keys.
    pair_distances: Vec<u32>,
    metrics: PathMetricStore,
    history: HistoryBuffer,
}

impl Decoder<'_> {
    /// Decodes a hard-decision bit stream and returns the recovered message bytes.
    ///
    /// # Parameters
    ///
    /// - `encoded`: Buffer holding the encoded bits, packed MSB-first.
    ///
    /// - `num_encoded_bits`: Number of encoded bits, tail included; trailing padding bits in
    ///   the buffer are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_encoded_bits` is not a multiple of the rate or exceeds the
    /// buffer. Channel errors never cause a failure; a stream too corrupt to decode yields the
    /// wrong bytes, not an `Err`.
    ///
    /// # Examples
    ///
    /// ```
    /// use convfec::{Codec, MetricKind};
    ///
    /// let codec = Codec::new(2, 7, &[0x6D, 0x4F])?;
    /// let encoded = codec.encode(&[0xA5]);
    /// let mut decoder = codec.new_decoder(MetricKind::Hard);
    /// let decoded = decoder.decode_hard(&encoded, codec.encoded_bits(1))?;
    /// assert_eq!(decoded, [0xA5]);
    /// # Ok::<(), convfec::Error>(())
    /// ```
    pub fn decode_hard(
        &mut self,
        encoded: &[u8],
        num_encoded_bits: usize,
    ) -> Result<Vec<u8>, Error> {
        if num_encoded_bits % self.codec.rate != 0 {
            return Err(Error::InvalidInputLength(format!(
                "Number of encoded bits {} is not a multiple of the rate {}",
                num_encoded_bits, self.codec.rate
            )));
        }
        if encoded.len() * 8 < num_encoded_bits {
            return Err(Error::InvalidInputLength(format!(
                "Buffer of {} bytes cannot hold {} encoded bits",
                encoded.len(),
                num_encoded_bits
            )));
        }
        self.decode_bits(Some(encoded), None, num_encoded_bits)
    }

    /// Decodes soft samples, one amplitude in `0 ..= 255` per encoded bit, and returns the
    /// recovered message bytes.
    ///
    /// A sample of `255` is a fully confident `1` bit and `0` a fully confident `0` bit.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of samples is not a multiple of the rate, or if this
    /// decoder was created with [`MetricKind::Hard`].
    pub fn decode_soft(&mut self, soft: &[u8]) -> Result<Vec<u8>, Error> {
        if self.metric_kind == MetricKind::Hard {
            return Err(Error::InvalidInput(
                "Hard-decision decoder cannot consume soft samples".to_string(),
            ));
        }
        if soft.len() % self.codec.rate != 0 {
            return Err(Error::InvalidInputLength(format!(
                "Number of soft samples {} is not a multiple of the rate {}",
                soft.len(),
                self.codec.rate
            )));
        }
        self.decode_bits(None, Some(soft), soft.len())
    }

    /// Runs the decode pipeline over `num_encoded_bits / rate` symbol groups.
    fn decode_bits(
        &mut self,
        encoded: Option<&[u8]>,
        soft: Option<&[u8]>,
        num_encoded_bits: usize,
    ) -> Result<Vec<u8>, Error> {
        let codec = self.codec;
        let rate = codec.rate;
        let order = codec.order;
        let sets = num_encoded_bits / rate;
        if sets <= order {
            // Nothing but (part of) a tail: a zero-length message.
            return Ok(Vec::new());
        }
        let num_msg_bits = sets - order;
        let mut msg = vec![0u8; num_msg_bits.div_ceil(8)];
        // The traceback recovers num_msg_bits + 1 inputs (the extra one is the first tail
        // zero); the capped writer drops it.
        let mut out = BitWriter::new(&mut msg, num_msg_bits);
        let mut reader = encoded.map(BitReader::new);

        self.metrics.reset();
        self.history.reset();

        let num_states = 1usize << (order - 1);
        let highbase = num_states >> 1;

        // Warmup: the register fills from empty, so only the low `set + 1` bits vary and no
        // decisions are recorded yet.
        for set in 0 .. order - 1 {
            fill_step_distances(
                self.metric_kind,
                rate,
                &mut reader,
                soft,
                set,
                &mut self.distances,
            );
            let (read, write) = self.metrics.split();
            for register in 0 .. 1usize << (set + 1) {
                write[register] = read[register >> 1]
                    .saturating_add(self.distances[codec.table[register] as usize]);
            }
            self.metrics.swap();
        }

        // Steady state: every state has two live predecessors; branch distances come packed
        // in pairs so successors 2k and 2k + 1 reuse one lookup per predecessor.
        for set in order - 1 .. sets + 1 - order {
            fill_step_distances(
                self.metric_kind,
                rate,
                &mut reader,
                soft,
                set,
                &mut self.distances,
            );
            codec
                .pair_lookup
                .fill_distances(&self.distances, &mut self.pair_distances);
            let row = self.history.row_mut();
            let (read, write) = self.metrics.split();
            for pred in 0 .. highbase {
                let low_concat = self.pair_distances[codec.pair_lookup.key(pred) as usize];
                let high_concat =
                    self.pair_distances[codec.pair_lookup.key(highbase + pred) as usize];
                let low_past = read[pred];
                let high_past = read[highbase + pred];

                let low_error = ((low_concat & 0xFFFF) as u16).saturating_add(low_past);
                let high_error = ((high_concat & 0xFFFF) as u16).saturating_add(high_past);
                let successor = 2 * pred;
                if low_error <= high_error {
                    write[successor] = low_error;
                    row[successor] = 0;
                } else {
                    write[successor] = high_error;
                    row[successor] = 1;
                }

                let low_error = ((low_concat >> 16) as u16).saturating_add(low_past);
                let high_error = ((high_concat >> 16) as u16).saturating_add(high_past);
                let successor = successor + 1;
                if low_error <= high_error {
                    write[successor] = low_error;
                    row[successor] = 0;
                } else {
                    write[successor] = high_error;
                    row[successor] = 1;
                }
            }
            self.history.process(self.metrics.written(), 1, &mut out);
            self.metrics.swap();
        }

        // Tail: the encoder is known to be flushing zeros, so successors with a nonzero
        // newest bit drop out and the live set thins by a factor of two per step. For very
        // short messages the tail picks up right where warmup ended.
        let tail_start = (sets + 1 - order).max(order - 1);
        for set in tail_start .. sets {
            fill_step_distances(
                self.metric_kind,
                rate,
                &mut reader,
                soft,
                set,
                &mut self.distances,
            );
            let stride = 1usize << (order - (sets - set));
            let base_stride = stride >> 1;
            let row = self.history.row_mut();
            let (read, write) = self.metrics.split();
            let mut base = 0;
            let mut successor = 0;
            while successor < num_states {
                let low_error =
                    self.distances[codec.table[successor] as usize].saturating_add(read[base]);
                let high_error = self.distances[codec.table[successor | num_states] as usize]
                    .saturating_add(read[highbase + base]);
                if low_error <= high_error {
                    write[successor] = low_error;
                    row[successor] = 0;
                } else {
                    write[successor] = high_error;
                    row[successor] = 1;
                }
                successor += stride;
                base += base_stride;
            }
            self.history.process(self.metrics.written(), stride, &mut out);
            self.metrics.swap();
        }

        // The tail pinned the register to zero, so the final traceback starts there.
        self.history.flush(&mut out);
        Ok(msg)
    }
}

/// Fills the branch distance table for one symbol group.
fn fill_step_distances(
    metric_kind: MetricKind,
    rate: usize,
    reader: &mut Option<BitReader<'_>>,
    soft: Option<&[u8]>,
    set: usize,
    distances: &mut [u16],
) {
    if let Some(samples) = soft {
        let group = &samples[set * rate ..][.. rate];
        match metric_kind {
            MetricKind::SoftQuadratic => {
                for (candidate, distance) in distances.iter_mut().enumerate() {
                    *distance = metric::soft_distance_quadratic(candidate as u16, group);
                }
            }
            _ => {
                for (candidate, distance) in distances.iter_mut().enumerate() {
                    *distance = metric::soft_distance_linear(candidate as u16, group);
                }
            }
        }
    } else if let Some(reader) = reader.as_mut() {
        let received = reader.read(rate);
        for (candidate, distance) in distances.iter_mut().enumerate() {
            *distance = metric::hamming_distance(candidate as u16, received);
        }
    }
}


#[cfg(test)]
mod tests_of_decoder {
    use super::*;

    /// Deterministic but irregular message bytes for round trip tests.
    fn patterned_message(len: usize) -> Vec<u8> {
        (0 .. len).map(|i| (i * 37 + 11) as u8).collect()
    }

    /// Soft samples with fully saturated amplitudes for the given encoded bits.
    fn saturated_samples(encoded: &[u8], num_bits: usize) -> Vec<u8> {
        (0 .. num_bits)
            .map(|i| {
                if encoded[i / 8] >> (7 - i % 8) & 1 == 1 {
                    255
                } else {
                    0
                }
            })
            .collect()
    }

    #[test]
    fn test_round_trip_order_3() {
        let codec = Codec::new(2, 3, &[0b111, 0b101]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let encoded = codec.encode(&[0xA5]);
        let decoded = decoder.decode_hard(&encoded, codec.encoded_bits(1)).unwrap();
        assert_eq!(decoded, [0xA5]);
    }

    #[test]
    fn test_round_trip_order_7() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        for len in [1, 2, 5, 32, 200] {
            let msg = patterned_message(len);
            let encoded = codec.encode(&msg);
            let decoded = decoder
                .decode_hard(&encoded, codec.encoded_bits(len))
                .unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_round_trip_rate_3() {
        let codec = Codec::new(3, 7, &[0x6D, 0x4F, 0x57]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let msg = patterned_message(40);
        let encoded = codec.encode(&msg);
        let decoded = decoder
            .decode_hard(&encoded, codec.encoded_bits(40))
            .unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_round_trip_without_steady_state_region() {
        // One message byte with order 10: warmup covers nine symbol groups and the tail the
        // other nine, leaving no steady state region at all.
        let codec = Codec::new(2, 10, &[0x2E3, 0x3D7]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let encoded = codec.encode(&[0x5A]);
        let decoded = decoder.decode_hard(&encoded, codec.encoded_bits(1)).unwrap();
        assert_eq!(decoded, [0x5A]);
    }

    #[test]
    fn test_empty_message() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let encoded = codec.encode(&[]);
        assert_eq!(encoded.len(), 2);
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let decoded = decoder.decode_hard(&encoded, codec.encoded_bits(0)).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_single_bit_flip_is_corrected_everywhere() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let num_bits = codec.encoded_bits(1);
        let encoded = codec.encode(&[0xA5]);
        for flip in 0 .. num_bits {
            let mut corrupted = encoded.clone();
            corrupted[flip / 8] ^= 1 << (7 - flip % 8);
            let decoded = decoder.decode_hard(&corrupted, num_bits).unwrap();
            assert_eq!(decoded, [0xA5], "flip at bit {flip}");
        }
    }

    #[test]
    fn test_burst_errors_never_fail() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let msg = patterned_message(8);
        let num_bits = codec.encoded_bits(8);
        let mut corrupted = codec.encode(&msg);
        // A 20-bit burst exceeds what the code can correct; the decode must still succeed
        // as a call even if the bytes come back wrong.
        for flip in 40 .. 60 {
            corrupted[flip / 8] ^= 1 << (7 - flip % 8);
        }
        let decoded = decoder.decode_hard(&corrupted, num_bits).unwrap();
        assert_eq!(decoded.len(), msg.len());
    }

    #[test]
    fn test_soft_decoding_matches_hard_on_saturated_samples() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let msg = patterned_message(25);
        let num_bits = codec.encoded_bits(25);
        let encoded = codec.encode(&msg);
        let samples = saturated_samples(&encoded, num_bits);
        for metric_kind in [MetricKind::SoftLinear, MetricKind::SoftQuadratic] {
            let mut decoder = codec.new_decoder(metric_kind);
            let decoded = decoder.decode_soft(&samples).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_soft_decoding_with_noisy_samples() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let msg = patterned_message(16);
        let num_bits = codec.encoded_bits(16);
        let encoded = codec.encode(&msg);
        // Weak amplitudes with a deterministic wobble; no sample crosses the midpoint
        let samples: Vec<u8> = (0 .. num_bits)
            .map(|i| {
                let wobble = (i * 29 % 48) as u8;
                if encoded[i / 8] >> (7 - i % 8) & 1 == 1 {
                    200 - wobble
                } else {
                    55 + wobble
                }
            })
            .collect();
        let mut decoder = codec.new_decoder(MetricKind::SoftLinear);
        assert_eq!(decoder.decode_soft(&samples).unwrap(), msg);
    }

    #[test]
    fn test_renormalization_is_transparent() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        // 1250 bytes give the decoder more than ten thousand steps
        for msg in [vec![0u8; 1250], patterned_message(1250)] {
            let num_bits = codec.encoded_bits(msg.len());
            let encoded = codec.encode(&msg);
            let mut default_decoder = codec.new_decoder(MetricKind::Hard);
            let mut eager_decoder = codec.new_decoder_with_options(
                MetricKind::Hard,
                DecoderOptions {
                    renormalize_interval: Some(1),
                    ..DecoderOptions::default()
                },
            );
            let default_out = default_decoder.decode_hard(&encoded, num_bits).unwrap();
            let eager_out = eager_decoder.decode_hard(&encoded, num_bits).unwrap();
            assert_eq!(default_out, eager_out);
            assert_eq!(default_out, msg);
        }
    }

    #[test]
    fn test_decoder_is_reset_between_calls() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        let first = patterned_message(100);
        let second = vec![0xFFu8; 3];
        let encoded_first = codec.encode(&first);
        let encoded_second = codec.encode(&second);
        assert_eq!(
            decoder
                .decode_hard(&encoded_first, codec.encoded_bits(100))
                .unwrap(),
            first
        );
        assert_eq!(
            decoder
                .decode_hard(&encoded_second, codec.encoded_bits(3))
                .unwrap(),
            second
        );
    }

    #[test]
    fn test_invalid_input_lengths() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        // Not a multiple of the rate
        assert!(decoder.decode_hard(&[0u8; 4], 29).is_err());
        // Claimed bits exceed the buffer
        assert!(decoder.decode_hard(&[0u8; 3], 30).is_err());
        let mut soft_decoder = codec.new_decoder(MetricKind::SoftLinear);
        assert!(soft_decoder.decode_soft(&[128u8; 29]).is_err());
    }

    #[test]
    fn test_soft_samples_rejected_by_hard_decoder() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        assert!(decoder.decode_soft(&[128u8; 30]).is_err());
    }

    #[test]
    fn test_tail_only_stream_decodes_to_empty() {
        let codec = Codec::new(2, 7, &[0x6D, 0x4F]).unwrap();
        let mut decoder = codec.new_decoder(MetricKind::Hard);
        // Fewer symbol groups than the tail length
        assert!(decoder.decode_hard(&[0u8; 2], 8).unwrap().is_empty());
    }
}
