//! This crate implements encoding and decoding functionality for a binary convolutional code.
//! The encoder feeds message bits through a shift register and emits one parity bit per
//! polynomial tap mask for every input bit, followed by a tail that drives the register back to
//! zero. The decoder is a Viterbi maximum-likelihood sequence decoder with hard-decision and
//! quantized soft-decision branch metrics, a bounded-memory traceback, and a batched branch
//! distance layout that leaves the inner loop free of data-dependent gathers so the compiler
//! can vectorize it.
//!
//! # Examples
//!
//! ```
//! use convfec::{Codec, MetricKind};
//!
//! let codec = Codec::new(2, 7, &[0x6D, 0x4F])?;
//! let encoded = codec.encode(b"hello");
//! let mut decoder = codec.new_decoder(MetricKind::Hard);
//! let decoded = decoder.decode_hard(&encoded, codec.encoded_bits(5))?;
//! assert_eq!(decoded, b"hello");
//! # Ok::<(), convfec::Error>(())
//! ```

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use serde::{Deserialize, Serialize};

mod bitio;
mod codec;
mod history;
mod lookup;
mod metric;
mod path_metrics;
mod trellis;

pub mod sim;

pub use codec::{Codec, Decoder, DecoderOptions, MAX_ORDER, MAX_RATE, MIN_ORDER, MIN_RATE};

/// Custom error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid code configuration
    #[error("{0}")]
    InvalidConfig(String),
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// Input whose length does not match the code
    #[error("{0}")]
    InvalidInputLength(String),
    /// Output buffer too small, holding the actual and the needed number of bytes
    #[error("Output buffer of {0} bytes is too small ({1} bytes needed)")]
    BufferTooSmall(usize, usize),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}

/// Enumeration of branch metrics for decoding
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub enum MetricKind {
    /// Hamming distance on sliced bits
    Hard,
    /// Sum of absolute differences between soft samples and candidate outputs
    SoftLinear,
    /// Sum of squared differences between soft samples and candidate outputs
    SoftQuadratic,
}

impl MetricKind {
    /// Returns the name of the variant.
    fn name(self) -> &'static str {
        match self {
            MetricKind::Hard => "hard-decision",
            MetricKind::SoftLinear => "soft-linear",
            MetricKind::SoftQuadratic => "soft-quadratic",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
