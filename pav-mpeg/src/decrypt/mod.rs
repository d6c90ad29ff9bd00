//! Key recovery and removal of the repeating-key subtraction cipher.
//!
//! Past the clear region every byte is `plain + key[(i - boundary) % key.len()]`
//! modulo 256. The key is unknown and differs per file, but program streams end
//! in a run of `0xFF` stuffing, which turns into ciphertext with a period equal
//! to the key length. Recovery works in three steps per candidate length:
//!
//! 1. [`KeyLengthEstimator`] scores the length by autocorrelation of the tail.
//! 2. [`reconstruct`] votes each key byte out of the stuffing.
//! 3. [`verify`] decrypts the first 4 bytes of the cipher region, which must be a
//!    program stream start code.
//!
//! The first length passing all three wins.
//!
//! # Quick Start
//!
//! ```no_run
//! use pav_mpeg::decrypt::PavDecryptingProcessor;
//! use std::fs;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let processor = PavDecryptingProcessor::builder().build()?;
//!
//!     let data = fs::read("MATCH01.PAV")?;
//!     let decrypted = processor.decrypt(&data)?;
//!     println!("key length {}", decrypted.key.key.len());
//!     fs::write("MATCH01.mpg", decrypted.payload)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Tuning
//!
//! ```no_run
//! use pav_mpeg::decrypt::PavDecryptingProcessor;
//!
//! let processor = PavDecryptingProcessor::builder()
//!     .confidence_threshold(0.85)
//!     .window_multipliers([3, 6, 10])
//!     .max_key_len(64)
//!     .build()?;
//! # Ok::<(), pav_mpeg::Error>(())
//! ```

mod cipher;
mod config;
mod estimator;
mod histogram;
mod processor;
mod reconstruct;
mod verify;

pub use cipher::{MAX_KEY_LEN, SubtractionCipher};
pub use config::RecoveryConfig;
pub use estimator::{KeyLengthEstimator, LengthScore, autocorrelation, estimate_single_window};
pub use histogram::ByteHistogram;
pub use processor::{
    Decrypted, PavDecryptingProcessor, PavDecryptingProcessorBuilder, RecoveredKey,
};
pub use reconstruct::{STUFFING_BYTE, reconstruct};
pub use verify::{VALID_START_CODES, verify};
