use crate::{Error, Result};

/// Tag found at offset 0 of every container.
pub const MAGIC: &[u8; 10] = b"PAVENCRYPT";

/// Shortest buffer accepted as a container.
pub const MIN_CONTAINER_LEN: usize = 20;

/// MPEG-1 program end code.
pub const END_CODE: [u8; 4] = [0x00, 0x00, 0x01, 0xB9];

/// A validated `PAVENCRYPT` container borrowed from a byte buffer.
#[derive(Clone, Copy, Debug)]
pub struct Container<'a> {
    data: &'a [u8],
}

impl<'a> Container<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < MIN_CONTAINER_LEN {
            return Err(Error::FormatMismatch(format!(
                "expected at least {} bytes, got {}",
                MIN_CONTAINER_LEN,
                data.len()
            )));
        }

        if &data[..MAGIC.len()] != MAGIC {
            return Err(Error::FormatMismatch(format!(
                "magic is {:?}",
                String::from_utf8_lossy(&data[..MAGIC.len()])
            )));
        }

        Ok(Self { data })
    }

    /// Program stream bytes after the tag.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[MAGIC.len()..]
    }
}

/// Returns true if `data` ends with the program end code.
pub fn has_end_code(data: &[u8]) -> bool {
    data.ends_with(&END_CODE)
}
