use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{ensure_len, Result};

pub const COMPRESSION_BLOCK_SIZE: usize = 8;

/// One entry of the compressed-frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionBlock {
    pub first_frame_id: u32,
    /// Compressed length in bytes.  Writers pad the table with zero-size
    /// entries, so 0 is legal.
    pub size:           u32,
}

impl CompressionBlock {
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        ensure_len(buf, COMPRESSION_BLOCK_SIZE)?;
        let block = Self {
            first_frame_id: LittleEndian::read_u32(&buf[0..4]),
            size:           LittleEndian::read_u32(&buf[4..8]),
        };
        Ok((block, COMPRESSION_BLOCK_SIZE))
    }
}

pub fn decode_compression_block(buf: &[u8]) -> Result<(CompressionBlock, usize)> {
    CompressionBlock::decode(buf)
}
