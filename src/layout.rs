//! Whole-file walker built on the individual decoders.
//!
//! # Layout of an FSEQ v2 file
//!
//! | Region | Start | Length |
//! |--------|-------|--------|
//! | Header | 0 | 32 |
//! | Compression block table | 32 | 8 × `total_compression_blocks()` |
//! | Channel range table | after block table | 6 × `channel_range_count` |
//! | Variable records | `variable_data_offset` | up to `channel_data_offset` |
//! | Frame data | `channel_data_offset` | to EOF |
//!
//! Every step uses the consumed byte count returned by the previous decode to
//! find the next structure.  Nothing past `channel_data_offset` is read except
//! by [`SequenceLayout::frame`], which borrows frames out of the caller's
//! buffer for uncompressed sequences.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::channel_range::{ChannelRange, CHANNEL_RANGE_SIZE};
use crate::compression_block::{CompressionBlock, COMPRESSION_BLOCK_SIZE};
use crate::error::DecodeError;
use crate::header::{CompressionType, FileHeader, HEADER_SIZE};
use crate::variable::{value_str, VarRecord, VAR_HEADER_SIZE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Decode error at offset {offset}: {source}")]
    Decode {
        offset: usize,
        #[source]
        source: DecodeError,
    },
    /// A region crosses into a neighbouring one: the tables or variables run
    /// past the frame data, or the variables start inside the tables.
    #[error("{what} at offset {offset} crosses region boundary {end}")]
    Overrun { what: &'static str, offset: usize, end: usize },
    #[error("Buffer truncated: need {needed} bytes, have {available}")]
    Truncated { needed: u64, available: usize },
    #[error("Frames are {0} compressed and cannot be sliced")]
    Compressed(CompressionType),
    #[error("Frame {index} out of range ({frame_count} frames)")]
    FrameOutOfRange { index: u32, frame_count: u32 },
}

trait AtOffset<T> {
    fn at(self, offset: usize) -> Result<T, LayoutError>;
}

impl<T> AtOffset<T> for Result<T, DecodeError> {
    fn at(self, offset: usize) -> Result<T, LayoutError> {
        self.map_err(|source| LayoutError::Decode { offset, source })
    }
}

/// An owned variable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub id:     [u8; 2],
    /// Absolute offset of the record header in the file.
    pub offset: usize,
    pub value:  Vec<u8>,
}

impl Variable {
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }

    pub fn value_str(&self) -> String {
        value_str(&self.value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceLayout {
    pub header:             FileHeader,
    pub compression_blocks: Vec<CompressionBlock>,
    pub channel_ranges:     Vec<ChannelRange>,
    pub variables:          Vec<Variable>,
}

impl SequenceLayout {
    /// Decode every structure preceding the frame data.
    ///
    /// `buf` must hold at least the first `channel_data_offset` bytes of the
    /// file; frame data is optional.
    pub fn parse(buf: &[u8]) -> Result<Self, LayoutError> {
        let (header, mut offset) = FileHeader::decode(buf).at(0)?;
        let data_start = usize::from(header.channel_data_offset);
        let var_start = usize::from(header.variable_data_offset);
        debug!(
            "FSEQ v{}.{}: {} channels, {} frames @ {} ms, compression {}",
            header.major_version,
            header.minor_version,
            header.channel_count,
            header.frame_count,
            header.frame_step_time_millis,
            header.compression_type.name(),
        );

        let block_count = usize::from(header.total_compression_blocks());
        let range_count = usize::from(header.channel_range_count);
        let tables_end = HEADER_SIZE
            + block_count * COMPRESSION_BLOCK_SIZE
            + range_count * CHANNEL_RANGE_SIZE;
        if tables_end > data_start {
            return Err(LayoutError::Overrun { what: "descriptor tables", offset: HEADER_SIZE, end: data_start });
        }
        if var_start > data_start {
            return Err(LayoutError::Overrun { what: "variable data", offset: var_start, end: data_start });
        }
        if var_start < tables_end {
            return Err(LayoutError::Overrun { what: "variable data", offset: var_start, end: tables_end });
        }

        let mut compression_blocks = Vec::with_capacity(block_count);
        for _ in 0..block_count {
            let (block, used) = CompressionBlock::decode(tail(buf, offset)).at(offset)?;
            trace!("compression block @{}: first frame {}, {} B", offset, block.first_frame_id, block.size);
            compression_blocks.push(block);
            offset += used;
        }

        let mut channel_ranges = Vec::with_capacity(range_count);
        for _ in 0..range_count {
            let (range, used) = ChannelRange::decode(tail(buf, offset)).at(offset)?;
            trace!("channel range @{}: {}+{}", offset, range.first_channel_number, range.channel_count);
            channel_ranges.push(range);
            offset += used;
        }

        let variables = parse_variables(buf, var_start, data_start)?;
        debug!(
            "decoded {} compression blocks, {} channel ranges, {} variables",
            compression_blocks.len(),
            channel_ranges.len(),
            variables.len(),
        );

        Ok(Self { header, compression_blocks, channel_ranges, variables })
    }

    pub fn variable(&self, id: [u8; 2]) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }

    /// Channel data of frame `index`, borrowed from `buf`.
    ///
    /// Only uncompressed sequences store frames contiguously; compressed ones
    /// fail with [`LayoutError::Compressed`].
    pub fn frame<'a>(&self, buf: &'a [u8], index: u32) -> Result<&'a [u8], LayoutError> {
        let h = &self.header;
        if h.compression_type != CompressionType::None {
            return Err(LayoutError::Compressed(h.compression_type));
        }
        if index >= h.frame_count {
            return Err(LayoutError::FrameOutOfRange { index, frame_count: h.frame_count });
        }

        let frame_len = u64::from(h.channel_count);
        let start = u64::from(h.channel_data_offset) + u64::from(index) * frame_len;
        let end = start + frame_len;
        if end > buf.len() as u64 {
            return Err(LayoutError::Truncated { needed: end, available: buf.len() });
        }
        // Both bounds are <= buf.len() here, so they fit in usize.
        Ok(&buf[start as usize..end as usize])
    }
}

/// Bytes from `offset` on; empty when `offset` is past the end so the decoder
/// reports the shortfall.
fn tail(buf: &[u8], offset: usize) -> &[u8] {
    buf.get(offset..).unwrap_or(&[])
}

fn parse_variables(buf: &[u8], start: usize, end: usize) -> Result<Vec<Variable>, LayoutError> {
    if end > buf.len() {
        return Err(LayoutError::Truncated { needed: end as u64, available: buf.len() });
    }

    let mut variables = Vec::new();
    let mut offset = start;
    while end - offset > VAR_HEADER_SIZE {
        let region = &buf[offset..end];
        // Writers pad the variable area with zeros up to the frame data.
        if region[0] == 0 && region[1] == 0 {
            trace!("variable padding @{}", offset);
            break;
        }

        let (record, used) = VarRecord::decode(region, None).at(offset)?;
        let value = region[VAR_HEADER_SIZE..used].to_vec();
        trace!("variable {:?} @{}: {} B", record.id_str(), offset, value.len());

        variables.push(Variable { id: record.id, offset, value });
        offset += used;
    }
    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cdo: u16, vdo: u16, blocks: u8, ranges: u8) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"PSEQ");
        buf[4..6].copy_from_slice(&cdo.to_le_bytes());
        buf[7] = 2;
        buf[8..10].copy_from_slice(&vdo.to_le_bytes());
        buf[21] = blocks;
        buf[22] = ranges;
        buf
    }

    #[test]
    fn tables_past_channel_data_are_rejected() {
        let mut buf = header(40, 40, 0, 2);
        buf.resize(64, 0);
        assert!(matches!(
            SequenceLayout::parse(&buf),
            Err(LayoutError::Overrun { what: "descriptor tables", .. })
        ));
    }

    #[test]
    fn variable_offset_past_channel_data_is_rejected() {
        let mut buf = header(32, 48, 0, 0);
        buf.resize(64, 0);
        assert!(matches!(
            SequenceLayout::parse(&buf),
            Err(LayoutError::Overrun { what: "variable data", .. })
        ));
    }

    #[test]
    fn variables_inside_range_table_are_rejected() {
        let mut buf = header(48, 32, 0, 1);
        buf.extend_from_slice(&[10, 0, b'm', b'f', 0, 0]);
        buf.resize(48, 0);
        assert_eq!(
            SequenceLayout::parse(&buf).unwrap_err(),
            LayoutError::Overrun { what: "variable data", offset: 32, end: 38 }
        );
    }

    #[test]
    fn buffer_ending_inside_range_table() {
        let mut buf = header(64, 44, 0, 2);
        buf.extend_from_slice(&[0, 0, 0, 4, 0, 0]);
        assert_eq!(
            SequenceLayout::parse(&buf).unwrap_err(),
            LayoutError::Decode {
                offset: 38,
                source: DecodeError::BufferTooSmall { needed: CHANNEL_RANGE_SIZE, available: 0 },
            }
        );
    }

    #[test]
    fn buffer_ending_inside_block_table() {
        let mut buf = header(64, 40, 1, 0);
        buf[20] = 0x01;
        buf.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(
            SequenceLayout::parse(&buf).unwrap_err(),
            LayoutError::Decode {
                offset: 32,
                source: DecodeError::BufferTooSmall { needed: COMPRESSION_BLOCK_SIZE, available: 4 },
            }
        );
    }

    #[test]
    fn truncated_variable_region() {
        let buf = header(64, 32, 0, 0);
        assert_eq!(
            SequenceLayout::parse(&buf).unwrap_err(),
            LayoutError::Truncated { needed: 64, available: 32 }
        );
    }

    #[test]
    fn bad_variable_reports_its_offset() {
        let mut buf = header(48, 32, 0, 0);
        // size 200 runs past the variable region
        buf.extend_from_slice(&[200, 0, b'm', b'f']);
        buf.resize(48, 0xAA);
        match SequenceLayout::parse(&buf) {
            Err(LayoutError::Decode { offset, source }) => {
                assert_eq!(offset, 32);
                assert_eq!(source.kind(), crate::ErrorKind::InvalidVarSize);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
