//! Length-prefixed variable records.
//!
//! ```text
//! 0  size   u16  total record length, including this 4-byte header
//! 2  id     2B   short tag, e.g. "mf" (media file) or "sp" (producer)
//! 4  value  size - 4 bytes, usually a NUL-terminated string
//! ```

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{DecodeError, Result};

pub const VAR_HEADER_SIZE: usize = 4;

/// Well-known variable ids.
pub const VAR_ID_MEDIA_FILE: [u8; 2] = *b"mf";
pub const VAR_ID_SEQUENCE_PRODUCER: [u8; 2] = *b"sp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VarRecord {
    pub size: u16,
    pub id:   [u8; 2],
}

impl VarRecord {
    /// Decode the record at the start of `buf`.
    ///
    /// When `value` is supplied, the `size - 4` value bytes are copied into its
    /// prefix.  A destination that is too short fails with
    /// [`DecodeError::BufferTooSmall`] and is left untouched.  Pass `None` to
    /// walk a chain of records without copying values.
    ///
    /// Returns the record and the number of bytes consumed (`size`).
    pub fn decode(buf: &[u8], value: Option<&mut [u8]>) -> Result<(Self, usize)> {
        // A bare header cannot hold even the value's terminating NUL.
        if buf.len() <= VAR_HEADER_SIZE {
            return Err(DecodeError::BufferTooSmall {
                needed:    VAR_HEADER_SIZE + 1,
                available: buf.len(),
            });
        }

        let size = LittleEndian::read_u16(&buf[0..2]);
        let id = [buf[2], buf[3]];

        let len = usize::from(size);
        if len <= VAR_HEADER_SIZE || len > buf.len() {
            return Err(DecodeError::InvalidVarSize { declared: size, available: buf.len() });
        }

        let record = Self { size, id };
        if let Some(dest) = value {
            let value_len = record.value_len();
            if dest.len() < value_len {
                return Err(DecodeError::BufferTooSmall { needed: value_len, available: dest.len() });
            }
            dest[..value_len].copy_from_slice(&buf[VAR_HEADER_SIZE..len]);
        }
        Ok((record, len))
    }

    /// Length of the value payload.
    #[inline]
    pub fn value_len(&self) -> usize {
        usize::from(self.size).saturating_sub(VAR_HEADER_SIZE)
    }

    /// The id as text, for display.
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

/// Render a variable value as text, dropping trailing NUL terminators.
pub fn value_str(value: &[u8]) -> String {
    let end = value.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&value[..end]).into_owned()
}

/// Decode one variable record.  See [`VarRecord::decode`].
pub fn decode_var_record(buf: &[u8], value: Option<&mut [u8]>) -> Result<(VarRecord, usize)> {
    VarRecord::decode(buf, value)
}
