/*
    REFERENCES
    ----------

    1. ISO/IEC 11172-1 section 2.4.3 (pack, system header and packet layer)

*/

use super::{
    AUDIO_STREAM_0, AUDIO_STREAM_1, PACK_HEADER, PACK_HEADER_LEN, PADDING_STREAM, PES_HEADER_LEN,
    START_CODE_PREFIX, SYSTEM_HEADER, StreamIds, VIDEO_STREAM_0, VIDEO_STREAM_1,
};
use crate::Reader;

/// Decoded fields of an MPEG-1 pack header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PackHeader {
    /// 33 bit system clock reference, in 90 kHz ticks.
    pub scr: u64,
    /// Multiplex rate in bytes per second.
    pub mux_rate: u32,
}

impl PackHeader {
    /// Decode the 8 bytes following the pack start code.
    ///
    /// Returns `None` unless the leading nibble is `0010`, the MPEG-1 marker.
    pub fn decode(fields: &[u8; 8]) -> Option<Self> {
        if fields[0] & 0xF0 != 0x20 {
            return None;
        }

        let scr = ((fields[0] as u64 & 0x0E) << 29)
            | ((fields[1] as u64) << 22)
            | ((fields[2] as u64 & 0xFE) << 14)
            | ((fields[3] as u64) << 7)
            | (fields[4] as u64 >> 1);

        // marker bit, 22 bit rate in units of 50 bytes/s, marker bit
        let rate = ((fields[5] as u32 & 0x7F) << 15)
            | ((fields[6] as u32) << 7)
            | (fields[7] as u32 >> 1);

        Some(Self {
            scr,
            mux_rate: rate * 50,
        })
    }
}

/// One structural unit of the clear program stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseUnit {
    PackHeader(PackHeader),
    SystemHeader { len: usize },
    VideoPes { stream_id: u8, len: usize },
    AudioPes { stream_id: u8, len: usize },
    PaddingPes { len: usize },
    OtherPes { stream_id: u8, len: usize },
}

impl ParseUnit {
    /// Total size of the unit including its start code.
    pub fn len(&self) -> usize {
        match *self {
            Self::PackHeader(_) => PACK_HEADER_LEN,
            Self::SystemHeader { len }
            | Self::VideoPes { len, .. }
            | Self::AudioPes { len, .. }
            | Self::PaddingPes { len }
            | Self::OtherPes { len, .. } => len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recognize the unit starting at `offset`.
///
/// Returns `None` for anything that is not a well formed unit: a missing start
/// code prefix, an unknown stream id, a truncated header or a zero length PES
/// packet. The declared payload length is not checked against the buffer end.
pub fn parse_unit(data: &[u8], offset: usize, ids: StreamIds) -> Option<ParseUnit> {
    if offset > data.len() {
        return None;
    }

    let mut reader = Reader::at(data, offset);

    if reader.read_bytes(3).ok()? != START_CODE_PREFIX {
        return None;
    }

    let stream_id = reader.read_u8().ok()?;

    match stream_id {
        PACK_HEADER => {
            let fields = reader.read_bytes(PACK_HEADER_LEN - 4).ok()?;
            PackHeader::decode(fields.try_into().ok()?).map(ParseUnit::PackHeader)
        }
        SYSTEM_HEADER => {
            let len = PES_HEADER_LEN + reader.read_u16().ok()? as usize;
            Some(ParseUnit::SystemHeader { len })
        }
        _ if ids.contains(stream_id) => {
            let payload_len = reader.read_u16().ok()? as usize;

            if payload_len == 0 {
                return None;
            }

            let len = PES_HEADER_LEN + payload_len;

            Some(match stream_id {
                VIDEO_STREAM_0 | VIDEO_STREAM_1 => ParseUnit::VideoPes { stream_id, len },
                AUDIO_STREAM_0 | AUDIO_STREAM_1 => ParseUnit::AudioPes { stream_id, len },
                PADDING_STREAM => ParseUnit::PaddingPes { len },
                _ => ParseUnit::OtherPes { stream_id, len },
            })
        }
        _ => None,
    }
}
