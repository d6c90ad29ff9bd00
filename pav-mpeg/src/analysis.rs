//! Read-only structural report of a container.
//!
//! Nothing here decrypts. The periodicity search is a faster, laxer version of the
//! one used for recovery: one window, shorter lengths and an early exit.

use crate::{
    Container, Result,
    decrypt::{ByteHistogram, STUFFING_BYTE, estimate_single_window, reconstruct},
    has_end_code,
    ps::{ScanReport, Scanner, StreamIds},
};

/// Largest tail inspected for periodicity.
pub const TAIL_LEN: usize = 500;

/// Longest period looked for.
pub const MAX_PERIOD: usize = 64;

/// Stop searching once a period matches this well.
pub const EARLY_EXIT: f64 = 0.99;

/// Periods below this ratio get no derived key.
pub const KEY_CONFIDENCE: f64 = 0.90;

/// Encrypted bytes sampled for the byte distribution.
pub const DISTRIBUTION_LEN: usize = 10_000;

/// Repeating pattern found in the tail.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Periodicity {
    pub key_len: usize,
    pub confidence: f64,
    /// Most common ciphertext byte for each key phase, starting at the boundary.
    pub pattern: Vec<u8>,
    /// `pattern` minus the stuffing byte, when the period is convincing.
    pub key: Option<Vec<u8>>,
}

/// Spread of byte values at the start of the cipher region. Ciphertext is
/// close to flat, clear data is peaked.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ByteDistribution {
    pub sampled: usize,
    pub min_frequency: usize,
    pub max_frequency: usize,
    pub ratio: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Analysis {
    pub size: usize,
    pub scan: ScanReport,
    /// Clear program stream bytes between the tag and the boundary.
    pub clear_len: usize,
    pub encrypted_len: usize,
    pub encrypted_percent: f64,
    pub last_bytes: Vec<u8>,
    pub end_code: bool,
    pub periodicity: Option<Periodicity>,
    pub distribution: Option<ByteDistribution>,
}

/// Analyze a container held in memory.
pub fn analyze(data: &[u8]) -> Result<Analysis> {
    let container = Container::new(data)?;

    let scan = Scanner::new(StreamIds::Core).scan(data);
    let boundary = scan.boundary.min(data.len());
    let end_code = has_end_code(data);
    let encrypted_len = data.len() - boundary;

    Ok(Analysis {
        size: data.len(),
        scan,
        clear_len: container.payload().len() - encrypted_len,
        encrypted_len,
        encrypted_percent: encrypted_len as f64 / data.len() as f64 * 100.0,
        last_bytes: data[data.len() - 4..].to_vec(),
        end_code,
        periodicity: periodicity(data, boundary, end_code),
        distribution: distribution(&data[boundary..]),
    })
}

fn periodicity(data: &[u8], boundary: usize, end_code: bool) -> Option<Periodicity> {
    let end = if end_code { data.len() - 4 } else { data.len() };
    let start = boundary.max(data.len().saturating_sub(TAIL_LEN));

    if start >= end {
        return None;
    }

    let (key_len, confidence) =
        estimate_single_window(&data[start..end], MAX_PERIOD, 3, EARLY_EXIT)?;

    // most common ciphertext per key phase
    let pattern = reconstruct(data, boundary, start..end, key_len, 0x00);
    let key = (confidence > KEY_CONFIDENCE).then(|| {
        pattern
            .iter()
            .map(|x| x.wrapping_sub(STUFFING_BYTE))
            .collect()
    });

    Some(Periodicity {
        key_len,
        confidence,
        pattern,
        key,
    })
}

fn distribution(encrypted: &[u8]) -> Option<ByteDistribution> {
    let sample = &encrypted[..encrypted.len().min(DISTRIBUTION_LEN)];
    let histogram: ByteHistogram = sample.iter().collect();
    let (min_frequency, max_frequency) = histogram.observed_range()?;

    Some(ByteDistribution {
        sampled: sample.len(),
        min_frequency,
        max_frequency,
        ratio: max_frequency as f64 / min_frequency.max(1) as f64,
    })
}
