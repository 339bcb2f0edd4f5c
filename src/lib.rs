pub mod error;
pub mod header;
pub mod variable;
pub mod channel_range;
pub mod compression_block;
pub mod duration;
pub mod layout;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{DecodeError, ErrorKind, error_str};
pub use header::{FileHeader, CompressionType, decode_header, MAGIC, HEADER_SIZE};
pub use variable::{VarRecord, decode_var_record, VAR_HEADER_SIZE};
pub use channel_range::{ChannelRange, decode_channel_range, CHANNEL_RANGE_SIZE};
pub use compression_block::{CompressionBlock, decode_compression_block, COMPRESSION_BLOCK_SIZE};
pub use duration::sequence_duration_seconds;
pub use layout::{SequenceLayout, LayoutError, Variable};
