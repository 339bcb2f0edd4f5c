//! Fixed 32-byte FSEQ v2 file header.
//!
//! ```text
//!  0  magic "PSEQ"            4B
//!  4  channel_data_offset     u16
//!  6  minor_version           u8
//!  7  major_version           u8
//!  8  variable_data_offset    u16
//! 10  channel_count           u32
//! 14  frame_count             u32
//! 18  frame_step_time_millis  u8
//! 19  (reserved)
//! 20  compression type (low nibble) | block count bits 8..12 (high nibble)
//! 21  compression_block_count u8
//! 22  channel_range_count     u8
//! 23  (reserved)
//! 24  sequence_uid            u64
//! ```
//!
//! All integers are little-endian.  Fields are extracted one by one from the
//! byte slice after the length check; the buffer is never reinterpreted as a
//! struct.

use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duration::sequence_duration_seconds;
use crate::error::{ensure_len, DecodeError, Result};

pub const MAGIC: &[u8; 4] = b"PSEQ";
pub const HEADER_SIZE: usize = 32;

/// 2000-01-01T00:00:00Z and 2100-01-01T00:00:00Z in microseconds.
const UID_TIMESTAMP_MIN_MICROS: u64 = 946_684_800_000_000;
const UID_TIMESTAMP_MAX_MICROS: u64 = 4_102_444_800_000_000;

/// Frame payload compression declared by the header.  The decoder only
/// reports it; payloads are never inflated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum CompressionType {
    None = 0,
    Zstd = 1,
    Zlib = 2,
}

impl CompressionType {
    /// Resolve a 4-bit type value.  `None` if the value is not mapped.
    pub fn from_nibble(value: u8) -> Option<Self> {
        match value {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Zstd),
            2 => Some(CompressionType::Zlib),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionType::None => "none",
            CompressionType::Zstd => "zstd",
            CompressionType::Zlib => "zlib",
        }
    }
}

impl std::fmt::Display for CompressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for CompressionType {
    type Error = DecodeError;

    /// Masks the byte to its low nibble before mapping.
    fn try_from(byte: u8) -> Result<Self> {
        let nibble = byte & 0x0F;
        Self::from_nibble(nibble).ok_or(DecodeError::InvalidCompressionType(nibble))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub channel_data_offset:         u16,
    pub minor_version:               u8,
    pub major_version:               u8,
    pub variable_data_offset:        u16,
    pub channel_count:               u32,
    pub frame_count:                 u32,
    pub frame_step_time_millis:      u8,
    pub compression_type:            CompressionType,
    pub compression_block_count:     u8,
    /// High nibble of the compression byte (block count bits 8..12).
    pub compression_block_count_ext: u8,
    pub channel_range_count:         u8,
    /// Opaque 8-byte tag; usually a creation timestamp.
    pub sequence_uid:                u64,
}

impl FileHeader {
    /// Decode the header at the start of `buf`.
    ///
    /// Returns the header and the number of bytes consumed (always
    /// [`HEADER_SIZE`]).
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        ensure_len(buf, HEADER_SIZE)?;

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        if &magic != MAGIC {
            return Err(DecodeError::InvalidMagic(magic));
        }

        let compression_type = CompressionType::try_from(buf[20])?;

        let header = Self {
            channel_data_offset:         LittleEndian::read_u16(&buf[4..6]),
            minor_version:               buf[6],
            major_version:               buf[7],
            variable_data_offset:        LittleEndian::read_u16(&buf[8..10]),
            channel_count:               LittleEndian::read_u32(&buf[10..14]),
            frame_count:                 LittleEndian::read_u32(&buf[14..18]),
            frame_step_time_millis:      buf[18],
            compression_type,
            compression_block_count:     buf[21],
            compression_block_count_ext: buf[20] >> 4,
            channel_range_count:         buf[22],
            sequence_uid:                LittleEndian::read_u64(&buf[24..32]),
        };
        Ok((header, HEADER_SIZE))
    }

    /// Compression block count including the high-nibble extension bits.
    pub fn total_compression_blocks(&self) -> u16 {
        (u16::from(self.compression_block_count_ext) << 8) | u16::from(self.compression_block_count)
    }

    pub fn duration_seconds(&self) -> f32 {
        sequence_duration_seconds(self.frame_count, self.frame_step_time_millis)
    }

    /// Interpret `sequence_uid` as microseconds since the Unix epoch.
    ///
    /// Returns `None` when the value falls outside 2000..2100, which usually
    /// means the writer stored something other than a timestamp.
    pub fn uid_timestamp(&self) -> Option<DateTime<Utc>> {
        if !(UID_TIMESTAMP_MIN_MICROS..UID_TIMESTAMP_MAX_MICROS).contains(&self.sequence_uid) {
            return None;
        }
        DateTime::from_timestamp_micros(self.sequence_uid as i64)
    }

    pub fn uid_bytes(&self) -> [u8; 8] {
        self.sequence_uid.to_le_bytes()
    }
}

/// Decode the 32-byte file header.  See [`FileHeader::decode`].
pub fn decode_header(buf: &[u8]) -> Result<(FileHeader, usize)> {
    FileHeader::decode(buf)
}
