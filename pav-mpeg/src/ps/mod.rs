//! Minimal MPEG-1 program stream syntax.
//!
//! Only what is needed to walk the clear part of a container is understood:
//! pack headers, system headers and length prefixed PES packets. Anything else
//! ends the walk.

mod scan;
mod unit;

pub use scan::{SEARCH_LIMIT, ScanReport, Scanner, UnitCounts, scan};
pub use unit::{PackHeader, ParseUnit, parse_unit};

/// Prefix shared by every start code.
pub const START_CODE_PREFIX: [u8; 3] = [0x00, 0x00, 0x01];

pub const PACK_HEADER: u8 = 0xBA;
pub const SYSTEM_HEADER: u8 = 0xBB;
pub const PROGRAM_END: u8 = 0xB9;
pub const PADDING_STREAM: u8 = 0xBE;
pub const PRIVATE_STREAM_2: u8 = 0xBF;
pub const AUDIO_STREAM_0: u8 = 0xC0;
pub const AUDIO_STREAM_1: u8 = 0xC1;
pub const VIDEO_STREAM_0: u8 = 0xE0;
pub const VIDEO_STREAM_1: u8 = 0xE1;

/// Fixed size of an MPEG-1 pack header.
pub const PACK_HEADER_LEN: usize = 12;

/// Start code, stream id and the 16 bit length field.
pub const PES_HEADER_LEN: usize = 6;

/// Set of PES stream ids accepted as clear units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamIds {
    /// First video, first audio and padding streams only.
    Core,
    /// Also second video, second audio and private stream 2.
    #[default]
    Extended,
}

impl StreamIds {
    pub fn contains(self, stream_id: u8) -> bool {
        match stream_id {
            VIDEO_STREAM_0 | AUDIO_STREAM_0 | PADDING_STREAM => true,
            VIDEO_STREAM_1 | AUDIO_STREAM_1 | PRIVATE_STREAM_2 => self == Self::Extended,
            _ => false,
        }
    }
}
