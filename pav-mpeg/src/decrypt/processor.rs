//! High-level key recovery and decrypting processor.

use super::{
    KeyLengthEstimator, RecoveryConfig, STUFFING_BYTE, SubtractionCipher, reconstruct, verify,
};
use crate::{
    Container, Error, MAGIC, Result, has_end_code,
    ps::{ScanReport, Scanner, StreamIds},
};
use log::{debug, trace};
use std::{fs, ops::Range, path::Path};

/// Builder for creating [`PavDecryptingProcessor`] instances.
///
/// # Example
///
/// ```
/// use pav_mpeg::decrypt::PavDecryptingProcessor;
///
/// let processor = PavDecryptingProcessor::builder()
///     .confidence_threshold(0.95)
///     .build()?;
/// # Ok::<(), pav_mpeg::Error>(())
/// ```
#[derive(Default)]
pub struct PavDecryptingProcessorBuilder {
    config: RecoveryConfig,
}

impl PavDecryptingProcessorBuilder {
    /// Create a new builder with the default [`RecoveryConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole recovery config.
    pub fn config(mut self, config: RecoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Minimum autocorrelation ratio for a key length to be tried.
    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    /// Tail window sizes, as multiples of the candidate key length.
    pub fn window_multipliers(mut self, multipliers: impl IntoIterator<Item = usize>) -> Self {
        self.config.window_multipliers = multipliers.into_iter().collect();
        self
    }

    /// Largest key length tried, at most 128.
    pub fn max_key_len(mut self, max_key_len: usize) -> Self {
        self.config.max_key_len = max_key_len;
        self
    }

    /// Bytes at the end of the container kept out of the tail window.
    pub fn tail_margin(mut self, tail_margin: usize) -> Self {
        self.config.tail_margin = tail_margin;
        self
    }

    /// Minimum number of key periods a tail window must hold.
    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.config.min_periods = min_periods;
        self
    }

    /// Cap on how far the clear region is walked.
    pub fn search_limit(mut self, search_limit: usize) -> Self {
        self.config.search_limit = search_limit;
        self
    }

    /// Build the processor.
    pub fn build(self) -> Result<PavDecryptingProcessor> {
        self.config.validate()?;
        Ok(PavDecryptingProcessor {
            config: self.config,
        })
    }
}

/// A key that passed start code verification.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecoveredKey {
    pub key: Vec<u8>,
    /// Autocorrelation ratio of the winning tail window.
    pub confidence: f64,
    /// Absolute byte range the key was voted from.
    pub window: Range<usize>,
}

impl RecoveredKey {
    pub fn cipher(&self) -> Result<SubtractionCipher> {
        SubtractionCipher::new(self.key.as_slice())
    }
}

/// Output of [`PavDecryptingProcessor::decrypt`].
#[derive(Clone, Debug)]
pub struct Decrypted {
    pub scan: ScanReport,
    pub key: RecoveredKey,
    /// Decrypted program stream without the `PAVENCRYPT` tag.
    pub payload: Vec<u8>,
    /// Whether the decrypted stream ends with the program end code.
    pub end_code: bool,
}

/// Recovers per-file keys and decrypts `PAVENCRYPT` containers.
///
/// The processor only holds configuration, so it is `Send + Sync` and one
/// instance can serve a whole batch of files across threads.
#[derive(Clone, Debug)]
pub struct PavDecryptingProcessor {
    config: RecoveryConfig,
}

impl PavDecryptingProcessor {
    /// Create a new builder for configuring the processor.
    pub fn builder() -> PavDecryptingProcessorBuilder {
        PavDecryptingProcessorBuilder::new()
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Find the end of the clear region.
    pub fn scan(&self, data: &[u8]) -> ScanReport {
        Scanner::new(StreamIds::Extended)
            .search_limit(self.config.search_limit)
            .scan(data)
    }

    /// Try key lengths `1..=max_key_len` in order and return the first whose
    /// tail autocorrelation reaches the threshold and whose reconstructed key
    /// decrypts the boundary to a valid start code.
    pub fn recover_key(&self, data: &[u8], boundary: usize) -> Result<RecoveredKey> {
        let config = &self.config;
        let estimator = KeyLengthEstimator::new(data, boundary, config.tail_margin)
            .min_periods(config.min_periods);

        for key_len in 1..=config.max_key_len {
            let Some(score) = estimator.score(key_len, &config.window_multipliers) else {
                continue;
            };

            trace!(
                "key length {:>3}: confidence {:.4} over {:#X}..{:#X}",
                key_len, score.confidence, score.window.start, score.window.end
            );

            if score.confidence < config.confidence_threshold {
                continue;
            }

            let key = reconstruct(data, boundary, score.window.clone(), key_len, STUFFING_BYTE);

            if !verify(data, boundary, &key) {
                debug!(
                    "key length {} rejected, boundary does not decrypt to a start code",
                    key_len
                );
                continue;
            }

            debug!(
                "key length {} verified (confidence {:.4})",
                key_len, score.confidence
            );

            return Ok(RecoveredKey {
                key,
                confidence: score.confidence,
                window: score.window,
            });
        }

        Err(Error::KeyRecovery {
            boundary,
            size: data.len(),
            max_key_len: config.max_key_len,
        })
    }

    /// Decrypt a container held in memory.
    pub fn decrypt<T: AsRef<[u8]>>(&self, data: T) -> Result<Decrypted> {
        self.decrypt_owned(data.as_ref().to_vec())
    }

    /// Decrypt a container, reusing its buffer for the output.
    pub fn decrypt_owned(&self, mut data: Vec<u8>) -> Result<Decrypted> {
        Container::new(&data)?;

        let scan = self.scan(&data);
        debug!(
            "clear region ends at {:#X} after {} units",
            scan.boundary,
            scan.counts.total()
        );

        let key = self.recover_key(&data, scan.boundary)?;
        key.cipher()?.decrypt_in_place(&mut data, scan.boundary);

        let end_code = has_end_code(&data);
        data.drain(..MAGIC.len());

        Ok(Decrypted {
            scan,
            key,
            payload: data,
            end_code,
        })
    }

    /// Decrypt a container read from `path`.
    pub fn decrypt_file<P: AsRef<Path>>(&self, path: P) -> Result<Decrypted> {
        self.decrypt_owned(fs::read(path)?)
    }

    /// Decrypt the container at `input` and write the program stream to `output`.
    ///
    /// Nothing is written when recovery fails.
    pub fn decrypt_file_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<Decrypted> {
        let decrypted = self.decrypt_file(input)?;
        fs::write(output, &decrypted.payload)?;
        Ok(decrypted)
    }
}
