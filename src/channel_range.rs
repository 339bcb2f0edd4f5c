//! Sparse channel-range descriptors: two 24-bit little-endian integers.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{ensure_len, Result};

pub const CHANNEL_RANGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelRange {
    pub first_channel_number: u32,
    pub channel_count:        u32,
}

impl ChannelRange {
    /// Decode a range; returns it and the bytes consumed ([`CHANNEL_RANGE_SIZE`]).
    ///
    /// Ranges are not checked for overlap or ordering, and an empty range is
    /// legal.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        ensure_len(buf, CHANNEL_RANGE_SIZE)?;
        let range = Self {
            first_channel_number: LittleEndian::read_u24(&buf[0..3]),
            channel_count:        LittleEndian::read_u24(&buf[3..6]),
        };
        Ok((range, CHANNEL_RANGE_SIZE))
    }

    /// One past the last channel of the range.
    pub fn end_channel(&self) -> u64 {
        u64::from(self.first_channel_number) + u64::from(self.channel_count)
    }
}

pub fn decode_channel_range(buf: &[u8]) -> Result<(ChannelRange, usize)> {
    ChannelRange::decode(buf)
}
