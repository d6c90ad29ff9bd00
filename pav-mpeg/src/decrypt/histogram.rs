/// Occurrence count for every byte value.
#[derive(Clone, Debug)]
pub struct ByteHistogram {
    counts: [usize; 256],
    total: usize,
}

impl Default for ByteHistogram {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }
}

impl ByteHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
        self.total += 1;
    }

    pub fn count(&self, byte: u8) -> usize {
        self.counts[byte as usize]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Byte with the highest count. Ties go to the numerically smallest byte.
    pub fn most_common(&self) -> Option<u8> {
        let mut best: Option<(u8, usize)> = None;

        for (byte, &count) in self.counts.iter().enumerate() {
            if count > best.map_or(0, |(_, x)| x) {
                best = Some((byte as u8, count));
            }
        }

        best.map(|(byte, _)| byte)
    }

    /// Lowest and highest count among byte values that occur at least once.
    pub fn observed_range(&self) -> Option<(usize, usize)> {
        let observed = self.counts.iter().copied().filter(|&x| x > 0);
        Some((observed.clone().min()?, observed.max()?))
    }
}

impl FromIterator<u8> for ByteHistogram {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut histogram = Self::new();
        iter.into_iter().for_each(|x| histogram.add(x));
        histogram
    }
}

impl<'a> FromIterator<&'a u8> for ByteHistogram {
    fn from_iter<I: IntoIterator<Item = &'a u8>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_common() {
        let histogram: ByteHistogram = [7u8, 3, 7, 9, 7, 3].iter().collect();
        assert_eq!(histogram.most_common(), Some(7));
        assert_eq!(histogram.count(3), 2);
        assert_eq!(histogram.total(), 6);
    }

    #[test]
    fn test_tie_goes_to_smallest() {
        let histogram: ByteHistogram = [0xF0u8, 0x20, 0x20, 0xF0].iter().collect();
        assert_eq!(histogram.most_common(), Some(0x20));
    }

    #[test]
    fn test_empty() {
        let histogram = ByteHistogram::new();
        assert_eq!(histogram.most_common(), None);
        assert_eq!(histogram.observed_range(), None);
    }

    #[test]
    fn test_observed_range() {
        let histogram: ByteHistogram = [1u8, 1, 1, 2, 5, 5].iter().collect();
        assert_eq!(histogram.observed_range(), Some((1, 3)));
    }
}
