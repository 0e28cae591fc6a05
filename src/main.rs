//! This crate simulates the BER-versus-SNR and BLER-versus-SNR performance of a binary
//! convolutional code with Viterbi decoding over a BPSK-AWGN channel. The code, the branch
//! metric, and the simulation parameters are specified on the command line, and simulation
//! results are saved to a JSON file.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/convfec -h`
//! for help on the command-line interface.

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

use anyhow::Result;
use clap::parser::ValueSource;
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use convfec::{sim, MetricKind};
use std::time::Instant;

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    let json_filename = &json_filename_from_matches(&matches);
    sim::run_awgn_sims(&all_sim_params(&matches), json_filename)?;
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Evaluates the performance of a convolutional code over a BPSK-AWGN channel")
        .arg(msg_len())
        .arg(rate())
        .arg(order())
        .arg(polynomials())
        .arg(metric_kind_name())
        .arg(first_snr_db())
        .arg(snr_step_db())
        .arg(num_snr())
        .arg(num_block_errors_min())
        .arg(num_blocks_per_run())
        .arg(num_runs_min())
        .arg(num_runs_max())
        .arg(json_filename())
}

/// Returns argument for number of message bytes per block.
fn msg_len() -> Arg {
    Arg::new("msg_len")
        .short('l')
        .value_parser(value_parser!(usize))
        .default_value("32")
        .help("Number of message bytes per block")
}

/// Returns argument for number of output bits per input bit.
fn rate() -> Arg {
    Arg::new("rate")
        .short('c')
        .value_parser(value_parser!(usize))
        .default_value("2")
        .help("Number of output bits per input bit")
}

/// Returns argument for number of shift register bits.
fn order() -> Arg {
    Arg::new("order")
        .short('o')
        .value_parser(value_parser!(usize))
        .default_value("7")
        .help("Number of shift register bits")
}

/// Returns argument for polynomials.
fn polynomials() -> Arg {
    Arg::new("polynomials")
        .short('g')
        .default_value("0x6D,0x4F")
        .help("Comma-separated tap masks, one per output bit (0x/0o prefixes accepted)")
}

/// Returns argument for branch metric name.
fn metric_kind_name() -> Arg {
    Arg::new("metric_kind_name")
        .short('m')
        .value_parser(["Hard", "SoftLinear", "SoftQuadratic"])
        .default_value("SoftLinear")
        .help("Branch metric name")
}

/// Returns argument for first Es/N0 (dB).
fn first_snr_db() -> Arg {
    Arg::new("first_snr_db")
        .short('r')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("-2.0")
        .help("First Es/N0 (dB)")
}

/// Returns argument for Es/N0 step (dB).
fn snr_step_db() -> Arg {
    Arg::new("snr_step_db")
        .short('p')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("1.0")
        .help("Es/N0 step (dB)")
}

/// Returns argument for number of Es/N0 values.
fn num_snr() -> Arg {
    Arg::new("num_snr")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("4")
        .help("Number of Es/N0 values")
}

/// Returns argument for desired minimum number of block errors.
fn num_block_errors_min() -> Arg {
    Arg::new("num_block_errors_min")
        .short('e')
        .value_parser(value_parser!(u32))
        .default_value("500")
        .help("Desired minimum number of block errors")
}

/// Returns argument for number of blocks to be transmitted per run.
fn num_blocks_per_run() -> Arg {
    Arg::new("num_blocks_per_run")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("1000")
        .help("Number of blocks to be transmitted per run")
}

/// Returns argument for minimum number of runs of blocks to be simulated.
fn num_runs_min() -> Arg {
    Arg::new("num_runs_min")
        .short('n')
        .value_parser(value_parser!(u32))
        .default_value("10")
        .help("Minimum number of runs of blocks to be simulated")
}

/// Returns argument for maximum number of runs of blocks to be simulated.
fn num_runs_max() -> Arg {
    Arg::new("num_runs_max")
        .short('x')
        .value_parser(value_parser!(u32))
        .default_value("100")
        .help("Maximum number of runs of blocks to be simulated")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns simulation parameters based on command-line arguments.
fn all_sim_params(matches: &ArgMatches) -> Vec<sim::SimParams> {
    let mut num_runs_min = num_runs_min_from_matches(matches);
    let mut num_runs_max = num_runs_max_from_matches(matches);
    if num_runs_min > num_runs_max {
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_min") {
            num_runs_min = num_runs_max;
        }
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_max") {
            num_runs_max = num_runs_min;
        }
    }
    let mut all_params = Vec::new();
    for es_over_n0_db in all_es_over_n0_db_from_matches(matches) {
        all_params.push(sim::SimParams {
            rate: rate_from_matches(matches),
            order: order_from_matches(matches),
            polynomials: polynomials_from_matches(matches),
            msg_len: msg_len_from_matches(matches),
            metric_kind: metric_kind_from_matches(matches),
            es_over_n0_db,
            num_block_errors_min: num_block_errors_min_from_matches(matches),
            num_blocks_per_run: num_blocks_per_run_from_matches(matches),
            num_runs_min,
            num_runs_max,
        });
    }
    all_params
}

// OK to unwrap in the functions below: All command-line arguments have default values, so
// every lookup is guaranteed to succeed.

/// Returns number of message bytes per block.
fn msg_len_from_matches(matches: &ArgMatches) -> usize {
    *matches.get_one("msg_len").unwrap()
}

/// Returns number of output bits per input bit.
fn rate_from_matches(matches: &ArgMatches) -> usize {
    *matches.get_one("rate").unwrap()
}

/// Returns number of shift register bits.
fn order_from_matches(matches: &ArgMatches) -> usize {
    *matches.get_one("order").unwrap()
}

/// Returns polynomials.
fn polynomials_from_matches(matches: &ArgMatches) -> Vec<u16> {
    matches
        .get_one::<String>("polynomials")
        .unwrap()
        .split(',')
        .map(|text| parse_polynomial(text.trim()))
        .collect()
}

/// Returns the polynomial given by a decimal, hexadecimal, or octal literal.
fn parse_polynomial(text: &str) -> u16 {
    let parsed = if let Some(digits) = text.strip_prefix("0x") {
        u16::from_str_radix(digits, 16)
    } else if let Some(digits) = text.strip_prefix("0o") {
        u16::from_str_radix(digits, 8)
    } else {
        text.parse()
    };
    match parsed {
        Ok(poly) => poly,
        Err(_) => panic!("Invalid polynomial {text}"),
    }
}

/// Returns branch metric.
fn metric_kind_from_matches(matches: &ArgMatches) -> MetricKind {
    match matches
        .get_one::<String>("metric_kind_name")
        .unwrap()
        .as_str()
    {
        "Hard" => MetricKind::Hard,
        "SoftLinear" => MetricKind::SoftLinear,
        "SoftQuadratic" => MetricKind::SoftQuadratic,
        _ => panic!("Invalid branch metric name"),
    }
}

/// Returns all Es/N0 (dB) values.
fn all_es_over_n0_db_from_matches(matches: &ArgMatches) -> Vec<f64> {
    let first_snr_db: f64 = *matches.get_one("first_snr_db").unwrap();
    let snr_step_db: f64 = *matches.get_one("snr_step_db").unwrap();
    let num_snr: u32 = *matches.get_one("num_snr").unwrap();
    (0 .. num_snr)
        .map(|n| first_snr_db + snr_step_db * f64::from(n))
        .collect()
}

/// Returns desired minimum number of block errors.
fn num_block_errors_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_block_errors_min").unwrap()
}

/// Returns number of blocks to be transmitted per run.
fn num_blocks_per_run_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_blocks_per_run").unwrap()
}

/// Returns minimum number of runs of blocks to be simulated.
fn num_runs_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_min").unwrap()
}

/// Returns maximum number of runs of blocks to be simulated.
fn num_runs_max_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_max").unwrap()
}

/// Returns name of JSON file to which simulation results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_line_for_test() -> Vec<&'static str> {
        vec![
            crate_name!(),
            "-l",
            "32",
            "-c",
            "2",
            "-o",
            "7",
            "-g",
            "0x6D,0x4F",
            "-m",
            "SoftQuadratic",
            "-r",
            "-2.0",
            "-p",
            "0.5",
            "-s",
            "6",
            "-e",
            "50",
            "-b",
            "100",
            "-n",
            "10",
            "-x",
            "20",
            "-f",
            "results.json",
        ]
    }

    #[test]
    fn test_command_line_parser() {
        assert!(command_line_parser()
            .try_get_matches_from(command_line_for_test())
            .is_ok());
    }

    #[test]
    fn test_parse_polynomial() {
        assert_eq!(parse_polynomial("109"), 109);
        assert_eq!(parse_polynomial("0x6D"), 0x6D);
        assert_eq!(parse_polynomial("0o155"), 0o155);
    }

    #[test]
    #[should_panic(expected = "Invalid polynomial")]
    fn test_parse_polynomial_rejects_garbage() {
        parse_polynomial("0xZZ");
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_all_sim_params() {
        let matches = command_line_parser().get_matches_from(command_line_for_test());
        let all_params = all_sim_params(&matches);
        let all_es_over_n0_db = [-2.0, -1.5, -1.0, -0.5, 0.0, 0.5];
        assert_eq!(all_params.len(), 6);
        for (idx, params) in all_params.iter().enumerate() {
            assert_eq!(params.rate, 2);
            assert_eq!(params.order, 7);
            assert_eq!(params.polynomials, [0x6D, 0x4F]);
            assert_eq!(params.msg_len, 32);
            assert_eq!(params.metric_kind, MetricKind::SoftQuadratic);
            assert_eq!(params.es_over_n0_db, all_es_over_n0_db[idx]);
            assert_eq!(params.num_block_errors_min, 50);
            assert_eq!(params.num_blocks_per_run, 100);
            assert_eq!(params.num_runs_min, 10);
            assert_eq!(params.num_runs_max, 20);
        }
    }
}
