use std::io::{Error, ErrorKind, Result};

/// Big endian reader over a borrowed byte slice.
///
/// Program stream fields are always big endian, so unlike mp4 there is no
/// little endian mode.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at `position`.
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let buf = self.read_array::<1>()?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_bytes(&mut self, bytes: usize) -> Result<&'a [u8]> {
        if bytes > self.remaining() {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "Reader reads out of memory bounds.",
            ));
        }

        let slice = &self.data[self.position..self.position + bytes];
        self.position += bytes;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let mut reader = Reader::at(&[0xAA, 0x00, 0x00, 0x01, 0xBA, 0x12, 0x34], 1);
        assert_eq!(reader.read_bytes(3).unwrap(), [0x00, 0x00, 0x01]);
        assert_eq!(reader.read_u8().unwrap(), 0xBA);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut reader = Reader::at(&[1, 2, 3], 2);
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_u16().is_err());
        assert!(reader.read_bytes(2).is_err());
        assert_eq!(reader.read_u8().unwrap(), 3);
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_starts_past_end() {
        let mut reader = Reader::at(&[1, 2, 3], 10);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u8().is_err());
    }
}
