//! Shared error taxonomy for every decoder in the crate.
//!
//! [`DecodeError`] carries the context of a failed decode (how many bytes were
//! needed, which magic was found, ...).  [`ErrorKind`] is the flat, numbered
//! classification of those failures; its codes are stable and can be mapped
//! back to a fixed description with [`error_str`], including codes this build
//! does not know about.

use thiserror::Error;

/// Stable numeric classification of decode outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    Ok                     = 0,
    BufferTooSmall         = 1,
    InvalidMagic           = 2,
    InvalidCompressionType = 3,
    InvalidVarSize         = 4,
}

/// Returned by [`error_str`] for codes outside the known range.
pub const UNKNOWN_ERROR_STR: &str = "unknown error code";

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Ok,
        ErrorKind::BufferTooSmall,
        ErrorKind::InvalidMagic,
        ErrorKind::InvalidCompressionType,
        ErrorKind::InvalidVarSize,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ErrorKind::Ok),
            1 => Some(ErrorKind::BufferTooSmall),
            2 => Some(ErrorKind::InvalidMagic),
            3 => Some(ErrorKind::InvalidCompressionType),
            4 => Some(ErrorKind::InvalidVarSize),
            _ => None,
        }
    }

    /// Fixed, human-readable description.  Never empty.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Ok                     => "ok",
            ErrorKind::BufferTooSmall         => "buffer too small for the structure or value being decoded",
            ErrorKind::InvalidMagic           => "invalid magic file signature (expected \"PSEQ\")",
            ErrorKind::InvalidCompressionType => "unknown compression type",
            ErrorKind::InvalidVarSize         => "variable record size is too small or exceeds the available data",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw error code to its description.
///
/// Unknown codes yield [`UNKNOWN_ERROR_STR`]; the result is never empty.
pub fn error_str(code: u8) -> &'static str {
    ErrorKind::from_code(code)
        .map(ErrorKind::as_str)
        .unwrap_or(UNKNOWN_ERROR_STR)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The source buffer is shorter than the structure, or the destination
    /// buffer cannot hold the variable value.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("Invalid magic: {0:02x?}")]
    InvalidMagic([u8; 4]),
    /// Low nibble of the compression byte is not a known type.
    #[error("Invalid compression type: {0}")]
    InvalidCompressionType(u8),
    #[error("Invalid variable size {declared} ({available} bytes available)")]
    InvalidVarSize { declared: u16, available: usize },
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::BufferTooSmall { .. }      => ErrorKind::BufferTooSmall,
            DecodeError::InvalidMagic(_)            => ErrorKind::InvalidMagic,
            DecodeError::InvalidCompressionType(_)  => ErrorKind::InvalidCompressionType,
            DecodeError::InvalidVarSize { .. }      => ErrorKind::InvalidVarSize,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Fail with [`DecodeError::BufferTooSmall`] unless `buf` holds `needed` bytes.
#[inline]
pub(crate) fn ensure_len(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(DecodeError::BufferTooSmall { needed, available: buf.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_description() {
        for code in 0..=u8::MAX {
            assert!(!error_str(code).is_empty(), "empty string for code {}", code);
        }
        assert_eq!(error_str(200), UNKNOWN_ERROR_STR);
    }

    #[test]
    fn codes_round_trip() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
            assert_eq!(error_str(kind.code()), kind.as_str());
        }
        assert_eq!(ErrorKind::from_code(5), None);
    }

    #[test]
    fn decode_error_kinds() {
        let e = DecodeError::BufferTooSmall { needed: 32, available: 3 };
        assert_eq!(e.kind(), ErrorKind::BufferTooSmall);
        assert_eq!(e.to_string(), "Buffer too small: need 32 bytes, have 3");
        assert_eq!(DecodeError::InvalidCompressionType(7).kind(), ErrorKind::InvalidCompressionType);
    }
}
