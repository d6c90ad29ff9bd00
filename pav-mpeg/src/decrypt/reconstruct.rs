use super::ByteHistogram;
use std::ops::Range;

/// Plaintext assumed under the tail window.
pub const STUFFING_BYTE: u8 = 0xFF;

/// Rebuild a `key_len` byte key from the stuffing in `window`.
///
/// Every byte at absolute offset `p` in the window votes for
/// `data[p] - plaintext` as key byte `(p - boundary) % key_len`. Each key byte is
/// the most common vote of its class, ties going to the smallest value. A class
/// without votes yields zero.
pub fn reconstruct(
    data: &[u8],
    boundary: usize,
    window: Range<usize>,
    key_len: usize,
    plaintext: u8,
) -> Vec<u8> {
    if key_len == 0 {
        return Vec::new();
    }

    let mut votes = vec![ByteHistogram::new(); key_len];
    let start = window.start.max(boundary);
    let end = window.end.min(data.len());

    for pos in start..end {
        votes[(pos - boundary) % key_len].add(data[pos].wrapping_sub(plaintext));
    }

    votes
        .iter()
        .map(|x| x.most_common().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encrypt_stuffing(prefix: usize, len: usize, key: &[u8], phase: usize) -> Vec<u8> {
        let mut data = vec![0x11; prefix];
        data.extend((0..len).map(|i| STUFFING_BYTE.wrapping_add(key[(i + phase) % key.len()])));
        data
    }

    #[test]
    fn test_phase_is_relative_to_boundary() {
        // boundary at 5, stuffing starts 2 bytes into the cipher region
        let mut data = vec![0x11; 5];
        data.extend_from_slice(&[0xAA, 0xBB]);
        data.extend((2..32).map(|i| STUFFING_BYTE.wrapping_add(b"ABC"[i % 3])));

        let key = reconstruct(&data, 5, 7..data.len(), 3, STUFFING_BYTE);
        assert_eq!(key, b"ABC");
    }

    #[test]
    fn test_majority_survives_noise() {
        let mut data = encrypt_stuffing(0, 60, b"XY", 0);
        data[10] = 0x00;
        data[21] = 0x42;
        assert_eq!(reconstruct(&data, 0, 0..60, 2, STUFFING_BYTE), b"XY");
    }

    #[test]
    fn test_tie_picks_smallest() {
        // class 0 sees 0x60 and 0x50 once each
        let data = [0x60u8, 0x00, 0x50, 0x00];
        assert_eq!(reconstruct(&data, 0, 0..4, 2, 0x00), [0x50, 0x00]);
    }

    #[test]
    fn test_empty_class_is_zero() {
        let data = encrypt_stuffing(0, 2, b"AB", 0);
        assert_eq!(reconstruct(&data, 0, 0..2, 4, STUFFING_BYTE), [b'A', b'B', 0, 0]);
        assert!(reconstruct(&data, 0, 0..2, 0, STUFFING_BYTE).is_empty());
    }
}
