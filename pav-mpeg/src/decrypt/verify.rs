use super::SubtractionCipher;

/// Start codes a cipher region may begin with: pack header, video PES, audio PES
/// and system header.
pub const VALID_START_CODES: [[u8; 4]; 4] = [
    [0x00, 0x00, 0x01, 0xBA],
    [0x00, 0x00, 0x01, 0xE0],
    [0x00, 0x00, 0x01, 0xC0],
    [0x00, 0x00, 0x01, 0xBB],
];

/// Check `key` by decrypting the first 4 bytes at `boundary`.
///
/// Autocorrelation alone can accept a wrong length, for example a divisor of the
/// true length, so a key is only trusted if the region decrypts to a start code.
pub fn verify(data: &[u8], boundary: usize, key: &[u8]) -> bool {
    let Ok(cipher) = SubtractionCipher::new(key) else {
        return false;
    };

    cipher
        .peek::<4>(data, boundary)
        .is_some_and(|x| VALID_START_CODES.contains(&x))
}
