use std::ops::Range;

/// Best tail window found for one candidate key length.
#[derive(Clone, Debug, PartialEq)]
pub struct LengthScore {
    pub key_len: usize,
    /// Fraction of window bytes equal to the byte one key length earlier.
    pub confidence: f64,
    /// Absolute byte range of the window inside the container.
    pub window: Range<usize>,
}

/// Fraction of positions `i >= lag` in `window` where `window[i] == window[i - lag]`.
///
/// Stuffing bytes encrypted with a repeating key of length `L` repeat with
/// period `L`, so the ratio at the true key length is close to one.
pub fn autocorrelation(window: &[u8], lag: usize) -> f64 {
    if lag == 0 || window.len() <= lag {
        return 0.0;
    }

    let total = window.len() - lag;
    let matches = window
        .iter()
        .zip(&window[lag..])
        .filter(|(a, b)| a == b)
        .count();

    matches as f64 / total as f64
}

/// Key length search over the stuffing at the end of the cipher region.
#[derive(Clone, Copy, Debug)]
pub struct KeyLengthEstimator<'a> {
    data: &'a [u8],
    boundary: usize,
    tail_end: usize,
    min_periods: usize,
}

impl<'a> KeyLengthEstimator<'a> {
    /// `tail_margin` bytes at the very end (program end code and slack) are
    /// never part of a window.
    pub fn new(data: &'a [u8], boundary: usize, tail_margin: usize) -> Self {
        Self {
            data,
            boundary,
            tail_end: data.len().saturating_sub(tail_margin),
            min_periods: 3,
        }
    }

    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Score `key_len` over windows of `key_len * m` bytes for every multiplier
    /// `m`, clipped so they never start before the boundary.
    ///
    /// Windows holding fewer than `min_periods` key periods are skipped. On equal
    /// ratios the earlier multiplier wins. Returns `None` when no window
    /// qualifies or every ratio is zero.
    pub fn score(&self, key_len: usize, multipliers: &[usize]) -> Option<LengthScore> {
        if key_len == 0 || self.boundary >= self.tail_end {
            return None;
        }

        let mut best: Option<LengthScore> = None;

        for multiplier in multipliers {
            let start = self
                .boundary
                .max(self.tail_end.saturating_sub(key_len.saturating_mul(*multiplier)));
            let window = &self.data[start..self.tail_end];

            if window.len() < key_len.saturating_mul(self.min_periods) {
                continue;
            }

            let confidence = autocorrelation(window, key_len);

            if confidence > best.as_ref().map_or(0.0, |x| x.confidence) {
                best = Some(LengthScore {
                    key_len,
                    confidence,
                    window: start..self.tail_end,
                });
            }
        }

        best
    }

    /// Best scoring key length in `1..=max_len`. On equal confidence the
    /// shorter length wins.
    pub fn estimate(&self, max_len: usize, multipliers: &[usize]) -> Option<LengthScore> {
        let mut best: Option<LengthScore> = None;

        for key_len in 1..=max_len {
            if let Some(score) = self.score(key_len, multipliers) {
                if score.confidence > best.as_ref().map_or(0.0, |x| x.confidence) {
                    best = Some(score);
                }
            }
        }

        best
    }
}

/// Single window search used for diagnostics.
///
/// Scores every length in `1..=max_len` over the whole `window` and stops early
/// once a ratio exceeds `early_exit`. Returns `(key_len, confidence)`.
pub fn estimate_single_window(
    window: &[u8],
    max_len: usize,
    min_periods: usize,
    early_exit: f64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for key_len in 1..=max_len {
        if window.len() < key_len * min_periods {
            continue;
        }

        let ratio = autocorrelation(window, key_len);

        if ratio > best.map_or(0.0, |(_, x)| x) {
            best = Some((key_len, ratio));
        }

        if ratio > early_exit {
            break;
        }
    }

    best
}
