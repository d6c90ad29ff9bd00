use crate::{Error, Result};

/// Longest repeating key the container format uses.
pub const MAX_KEY_LEN: usize = 128;

/// Repeating-key subtraction cipher.
///
/// Encryption adds `key[(i - start) % key.len()]` to every byte at or after
/// `start`, decryption subtracts it, both modulo 256.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtractionCipher {
    key: Vec<u8>,
}

impl SubtractionCipher {
    pub fn new<T: Into<Vec<u8>>>(key: T) -> Result<Self> {
        let key = key.into();

        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(Error::InvalidKey(key.len()));
        }

        Ok(Self { key })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Decrypt `data[start..]` in place. Key phase zero is at `start`.
    pub fn decrypt_in_place(&self, data: &mut [u8], start: usize) {
        self.process(data, start, u8::wrapping_sub);
    }

    /// Encrypt `data[start..]` in place. Key phase zero is at `start`.
    pub fn encrypt_in_place(&self, data: &mut [u8], start: usize) {
        self.process(data, start, u8::wrapping_add);
    }

    /// Decrypt `data[start..start + N]` into a new array, without touching `data`.
    ///
    /// Returns `None` if fewer than `N` bytes follow `start`.
    pub fn peek<const N: usize>(&self, data: &[u8], start: usize) -> Option<[u8; N]> {
        let mut out: [u8; N] = data.get(start..start.checked_add(N)?)?.try_into().ok()?;
        self.decrypt_in_place(&mut out, 0);
        Some(out)
    }

    fn process(&self, data: &mut [u8], start: usize, op: fn(u8, u8) -> u8) {
        if start >= data.len() {
            return;
        }

        data[start..]
            .iter_mut()
            .zip(self.key.iter().cycle())
            .for_each(|(byte, key)| *byte = op(*byte, *key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_keys() {
        assert!(matches!(
            SubtractionCipher::new(vec![]),
            Err(Error::InvalidKey(0))
        ));
        assert!(matches!(
            SubtractionCipher::new(vec![1; 129]),
            Err(Error::InvalidKey(129))
        ));
        assert!(SubtractionCipher::new(vec![1; 128]).is_ok());
    }

    #[test]
    fn test_decrypt_wraps() {
        let cipher = SubtractionCipher::new(*b"XY").unwrap();
        let mut data = [0x10, 0x57, 0x58, 0x57, 0x58];
        cipher.decrypt_in_place(&mut data, 1);
        assert_eq!(data, [0x10, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_round_trip() {
        let plain: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

        for len in [1, 2, 3, 7, 64, 127, 128] {
            let key: Vec<u8> = (0..len).map(|x| (x * 37 + 11) as u8).collect();
            let cipher = SubtractionCipher::new(key).unwrap();

            let mut data = plain.clone();
            cipher.encrypt_in_place(&mut data, 13);
            assert_eq!(data[..13], plain[..13]);
            assert_ne!(data, plain);
            cipher.decrypt_in_place(&mut data, 13);
            assert_eq!(data, plain);
        }
    }

    #[test]
    fn test_peek() {
        let cipher = SubtractionCipher::new(*b"ABC").unwrap();
        let mut data = vec![0xAA; 3];
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0xBA]);
        cipher.encrypt_in_place(&mut data, 3);

        assert_eq!(cipher.peek::<4>(&data, 3), Some([0x00, 0x00, 0x01, 0xBA]));
        assert_eq!(cipher.peek::<4>(&data, 4), None);
        assert_eq!(cipher.peek::<4>(&data, usize::MAX), None);
    }
}
