#![cfg_attr(docsrs, feature(doc_cfg))]

//! This crate recovers and strips the repeating-key subtraction cipher applied to
//! `PAVENCRYPT` containers, which wrap an MPEG-1 program stream.
//!
//! A container starts with a 10 byte `PAVENCRYPT` tag followed by cleartext program
//! stream units. At an undocumented offset the stream switches to ciphertext. The
//! [`ps`] module walks the clear units to find that boundary, the [`decrypt`] module
//! recovers the key from the `0xFF` stuffing at the end of the stream and removes the
//! cipher, and [`analysis`] produces a read-only diagnostic report.
//!
//! ```no_run
//! use pav_mpeg::decrypt::PavDecryptingProcessor;
//!
//! let processor = PavDecryptingProcessor::builder().build()?;
//! let decrypted = processor.decrypt_file("INTRO.PAV")?;
//! std::fs::write("INTRO.mpg", &decrypted.payload)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Optional Features
//!
//! - **serde**: Derives `Serialize` for scan reports, recovered keys and analysis reports.

pub mod analysis;
pub mod decrypt;
pub mod ps;

mod container;
mod error;
mod reader;

pub use container::{Container, END_CODE, MAGIC, MIN_CONTAINER_LEN, has_end_code};
pub use error::Error;
pub use reader::Reader;

/// A `Result` alias where the `Err` case is `pav_mpeg::Error`.
pub type Result<T> = std::result::Result<T, Error>;
