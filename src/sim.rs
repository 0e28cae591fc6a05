//! # Simulator for code performance over a BPSK-AWGN channel
//!
//! The [`random_message`] function returns a random message block; the [`bpsk_awgn_channel`]
//! function returns quantized soft samples at the output of a BPSK-AWGN channel for given
//! encoded bytes; the [`hard_slicer`] function slices soft samples back to packed bits; and the
//! [`bit_error_count`] function counts bit errors between two byte sequences. The
//! [`run_awgn_sims`] function ties these together into a BER/BLER sweep whose results are saved
//! to a JSON file.
//!
//! # Examples
//!
//! The code below illustrates the usage of the channel helpers.
//! ```
//! use convfec::{sim, Codec, MetricKind};
//!
//! let codec = Codec::new(2, 7, &[0x6D, 0x4F])?;
//! let msg = sim::random_message(4);
//! let encoded = codec.encode(&msg);
//! let soft = sim::bpsk_awgn_channel(&encoded, codec.encoded_bits(4), 10.0);
//! let mut decoder = codec.new_decoder(MetricKind::SoftLinear);
//! let decoded = decoder.decode_soft(&soft)?;
//! assert_eq!(decoded.len(), 4);
//! # Ok::<(), convfec::Error>(())
//! ```

use itertools::Itertools;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;

use crate::{Codec, Decoder, Error, MetricKind};

/// Parameters for a simulation of one code at one Es/N0 point
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SimParams {
    /// Number of output bits per input bit
    pub rate: usize,
    /// Number of bits in the shift register
    pub order: usize,
    /// Tap masks, one per output bit
    pub polynomials: Vec<u16>,
    /// Number of message bytes per block
    pub msg_len: usize,
    /// Branch metric used by the decoder
    pub metric_kind: MetricKind,
    /// Ratio (dB) of symbol energy to noise power spectral density at the channel output
    pub es_over_n0_db: f64,
    /// Desired minimum number of block errors
    pub num_block_errors_min: u32,
    /// Number of blocks to be transmitted per run
    pub num_blocks_per_run: u32,
    /// Minimum number of runs of blocks to be simulated
    pub num_runs_min: u32,
    /// Maximum number of runs of blocks to be simulated
    pub num_runs_max: u32,
}

impl std::fmt::Display for SimParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rate-1/{} order-{} code [{}], {}-byte blocks, {} decoding, Es/N0 {:.2} dB",
            self.rate,
            self.order,
            self.polynomials.iter().map(|p| format!("{p:#o}")).join(", "),
            self.msg_len,
            self.metric_kind,
            self.es_over_n0_db,
        )
    }
}

/// Results of a simulation of one code at one Es/N0 point
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SimResults {
    /// Simulation parameters
    pub params: SimParams,
    /// Number of blocks transmitted
    pub num_blocks: u32,
    /// Number of blocks decoded incorrectly
    pub num_block_errors: u32,
    /// Number of message bits transmitted
    pub num_info_bits: u64,
    /// Number of message bits decoded incorrectly
    pub num_bit_errors: u64,
}

impl SimResults {
    /// Returns empty results for the given parameters.
    fn new(params: SimParams) -> Self {
        Self {
            params,
            num_blocks: 0,
            num_block_errors: 0,
            num_info_bits: 0,
            num_bit_errors: 0,
        }
    }

    /// Returns the block error rate observed so far.
    #[must_use]
    pub fn block_error_rate(&self) -> f64 {
        if self.num_blocks == 0 {
            0.0
        } else {
            f64::from(self.num_block_errors) / f64::from(self.num_blocks)
        }
    }

    /// Returns the bit error rate observed so far.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bit_error_rate(&self) -> f64 {
        if self.num_info_bits == 0 {
            0.0
        } else {
            self.num_bit_errors as f64 / self.num_info_bits as f64
        }
    }
}

/// Returns a random message block of the given number of bytes.
#[must_use]
pub fn random_message(num_bytes: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0 .. num_bytes).map(|_| rng.random()).collect()
}

/// Returns quantized soft samples at a BPSK-AWGN channel output for given encoded bytes.
///
/// # Parameters
///
/// - `encoded`: Encoded bytes, packed MSB-first.
///
/// - `num_bits`: Number of encoded bits to transmit from the buffer.
///
/// - `es_over_n0_db`: Ratio (dB) of symbol energy to noise power spectral density at the
///   channel output (with BPSK symbols `+1.0` and `-1.0`, the noise variance is
///   `0.5 / 10f64.powf(0.1 * es_over_n0_db)`).
///
/// # Returns
///
/// - `soft`: One amplitude in `0 ..= 255` per encoded bit, with `255` meaning a fully
///   confident `1` bit.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bpsk_awgn_channel(encoded: &[u8], num_bits: usize, es_over_n0_db: f64) -> Vec<u8> {
    let mut rng = rand::rng();
    let es_over_n0 = 10f64.powf(0.1 * es_over_n0_db);
    let noise_std = (0.5 / es_over_n0).sqrt();
    (0 .. num_bits)
        .map(|i| {
            let x = if encoded[i / 8] >> (7 - i % 8) & 1 == 1 {
                1f64
            } else {
                -1f64
            };
            let y = x + noise_std * rng.sample::<f64, _>(StandardNormal);
            (127.5 + 127.5 * y).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Returns hard decisions for given soft samples, packed MSB-first into bytes.
///
/// Samples of `128` and above slice to `1`; trailing bits of the last byte are zero.
#[must_use]
pub fn hard_slicer(soft: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; soft.len().div_ceil(8)];
    for (i, &sample) in soft.iter().enumerate() {
        if sample >= 128 {
            bytes[i / 8] |= 1 << (7 - i % 8);
        }
    }
    bytes
}

/// Returns the number of differing bits between two byte sequences.
///
/// If they are of different lengths, then the longer sequence is effectively truncated to the
/// length of the shorter one.
#[must_use]
pub fn bit_error_count(seq: &[u8], ref_seq: &[u8]) -> u64 {
    seq.iter()
        .zip(ref_seq.iter())
        .map(|(x, y)| u64::from((x ^ y).count_ones()))
        .sum()
}

/// Runs BER/BLER simulations for all given parameter sets and saves results to a JSON file.
///
/// Blocks within a run are simulated in parallel, with one decoder per worker; a progress line
/// per Es/N0 point goes to stderr.
///
/// # Errors
///
/// Returns an error if any parameter set is invalid or if the results file cannot be written.
pub fn run_awgn_sims(
    all_params: &[SimParams],
    json_filename: &str,
) -> Result<Vec<SimResults>, Error> {
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let results = run_sim(params)?;
        eprintln!(
            "{}: BER {:.3e}, BLER {:.3e} ({} blocks)",
            params,
            results.bit_error_rate(),
            results.block_error_rate(),
            results.num_blocks
        );
        all_results.push(results);
    }
    let file = File::create(json_filename)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &all_results)?;
    Ok(all_results)
}

/// Runs the simulation for one parameter set until its stopping rule is met.
fn run_sim(params: &SimParams) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let codec = Codec::new(params.rate, params.order, &params.polynomials)?;
    let mut results = SimResults::new(params.clone());
    let mut num_runs = 0;
    while num_runs < params.num_runs_min
        || (results.num_block_errors < params.num_block_errors_min
            && num_runs < params.num_runs_max)
    {
        let (num_block_errors, num_bit_errors) = run_one_run(&codec, params)?;
        num_runs += 1;
        results.num_blocks += params.num_blocks_per_run;
        results.num_block_errors += num_block_errors;
        results.num_info_bits += u64::from(params.num_blocks_per_run) * 8 * params.msg_len as u64;
        results.num_bit_errors += num_bit_errors;
    }
    Ok(results)
}

/// Simulates one run of blocks in parallel and returns its block and bit error counts.
fn run_one_run(codec: &Codec, params: &SimParams) -> Result<(u32, u64), Error> {
    (0 .. params.num_blocks_per_run)
        .into_par_iter()
        .map_init(
            || codec.new_decoder(params.metric_kind),
            |decoder, _| simulate_block(codec, decoder, params),
        )
        .try_reduce(|| (0, 0), |acc, next| Ok((acc.0 + next.0, acc.1 + next.1)))
}

/// Simulates one block and returns its block error indicator and bit error count.
fn simulate_block(
    codec: &Codec,
    decoder: &mut Decoder<'_>,
    params: &SimParams,
) -> Result<(u32, u64), Error> {
    let msg = random_message(params.msg_len);
    let num_encoded_bits = codec.encoded_bits(params.msg_len);
    let encoded = codec.encode(&msg);
    let soft = bpsk_awgn_channel(&encoded, num_encoded_bits, params.es_over_n0_db);
    let decoded = if params.metric_kind == MetricKind::Hard {
        decoder.decode_hard(&hard_slicer(&soft), num_encoded_bits)?
    } else {
        decoder.decode_soft(&soft)?
    };
    let num_bit_errors = bit_error_count(&decoded, &msg);
    Ok((u32::from(num_bit_errors > 0), num_bit_errors))
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.msg_len == 0 {
        return Err(Error::InvalidInput(
            "Number of message bytes per block cannot be zero".to_string(),
        ));
    }
    if params.num_blocks_per_run == 0 {
        return Err(Error::InvalidInput(
            "Number of blocks per run cannot be zero".to_string(),
        ));
    }
    if params.num_runs_min > params.num_runs_max {
        return Err(Error::InvalidInput(format!(
            "Minimum number of runs ({}) exceeds maximum number of runs ({})",
            params.num_runs_min, params.num_runs_max
        )));
    }
    Ok(())
}
