use super::{PackHeader, ParseUnit, StreamIds, parse_unit};
use crate::MAGIC;

/// Default cap on how far the clear region is walked.
pub const SEARCH_LIMIT: usize = 0x10000;

/// Number of units seen in the clear region, per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnitCounts {
    pub packs: usize,
    pub system_headers: usize,
    pub video_pes: usize,
    pub audio_pes: usize,
    pub padding_pes: usize,
    pub other_pes: usize,
}

impl UnitCounts {
    fn record(&mut self, unit: &ParseUnit) {
        match unit {
            ParseUnit::PackHeader(_) => self.packs += 1,
            ParseUnit::SystemHeader { .. } => self.system_headers += 1,
            ParseUnit::VideoPes { .. } => self.video_pes += 1,
            ParseUnit::AudioPes { .. } => self.audio_pes += 1,
            ParseUnit::PaddingPes { .. } => self.padding_pes += 1,
            ParseUnit::OtherPes { .. } => self.other_pes += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.packs
            + self.system_headers
            + self.video_pes
            + self.audio_pes
            + self.padding_pes
            + self.other_pes
    }
}

/// Where the clear region ends and what it contained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScanReport {
    /// Offset of the first byte that is not part of a valid unit.
    pub boundary: usize,
    pub counts: UnitCounts,
    pub first_pack: Option<PackHeader>,
}

/// Forward walker over the clear program stream.
#[derive(Clone, Copy, Debug)]
pub struct Scanner {
    pub ids: StreamIds,
    pub search_limit: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            ids: StreamIds::Extended,
            search_limit: SEARCH_LIMIT,
        }
    }
}

impl Scanner {
    pub fn new(ids: StreamIds) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    pub fn search_limit(mut self, search_limit: usize) -> Self {
        self.search_limit = search_limit;
        self
    }

    /// Walk units from just after the tag until one fails to parse, fewer than
    /// 4 bytes remain, or the offset reaches the search limit.
    ///
    /// There is no resynchronisation. The first invalid unit is the boundary even
    /// if a valid start code follows later.
    pub fn scan(&self, data: &[u8]) -> ScanReport {
        let mut pos = MAGIC.len();
        let mut counts = UnitCounts::default();
        let mut first_pack = None;
        let limit = data.len().min(self.search_limit);

        while pos < limit && pos + 4 <= data.len() {
            let Some(unit) = parse_unit(data, pos, self.ids) else {
                break;
            };

            if let (ParseUnit::PackHeader(pack), None) = (unit, first_pack) {
                first_pack = Some(pack);
            }

            counts.record(&unit);
            pos += unit.len();
        }

        ScanReport {
            boundary: pos,
            counts,
            first_pack,
        }
    }
}

/// Scan `data` with the extended stream id set and the default search limit.
pub fn scan(data: &[u8]) -> ScanReport {
    Scanner::default().scan(data)
}
