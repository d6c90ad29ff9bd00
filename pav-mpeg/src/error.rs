//! Error types for container parsing and key recovery.

use thiserror::Error;

/// The Errors that may occur while handling a `PAVENCRYPT` container.
///
/// Every variant is local to a single container. Batch callers are expected to
/// record the failure and continue with the next file.
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer is too short or does not start with the `PAVENCRYPT` tag.
    #[error("not a PAVENCRYPT container: {0}")]
    FormatMismatch(String),

    /// No key length produced both enough periodicity and a valid start code.
    #[error(
        "could not derive key (boundary = {boundary:#X}, size = {size} bytes) - no key length in 1..={max_key_len} decrypted to a valid start code"
    )]
    KeyRecovery {
        boundary: usize,
        size: usize,
        max_key_len: usize,
    },

    /// Key is empty or longer than the supported maximum.
    #[error("invalid key length: expected 1..=128 bytes, got {0} bytes")]
    InvalidKey(usize),

    /// Recovery settings are out of range.
    #[error("invalid recovery config: {0}")]
    InvalidConfig(String),

    /// I/O error (for file operations).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if the input was rejected before any parsing happened.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch(_))
    }

    /// Returns true if the container parsed but its key could not be recovered.
    pub fn is_key_recovery(&self) -> bool {
        matches!(self, Self::KeyRecovery { .. })
    }
}
