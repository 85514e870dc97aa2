//! MsgBlock protocol implementation
//!
//! This module provides the data model, the fault-tolerant block decoder,
//! and the encoder for LRGS `MsgBlock` payloads.

mod attrs;
mod block;
mod body;
mod codec;
mod config;
mod decoder;
mod error;
mod message;
pub mod metrics;

pub use block::RawMessageBlock;
pub use codec::{decode, encode};
pub use config::{DEFAULT_MAX_DEPTH, DecoderConfig};
pub use decoder::MessageBlockDecoder;
pub use error::{Cause, Error, ProtocolError, Result};
pub use message::{MessageBody, RawMessage};

/// Root element of a block
pub const MSG_BLOCK_TAG: &str = "MsgBlock";

/// Element wrapping one message
pub const DCP_MSG_TAG: &str = "DcpMsg";

/// Mandatory platform identifier attribute
pub const PLATFORM_ID_ATTR: &str = "platformId";

/// Optional hexadecimal flags attribute
pub const FLAGS_ATTR: &str = "flags";

/// Flags assumed when a message carries no `flags` attribute
pub const DEFAULT_FLAGS: u64 = 1;

/// Maximum block size accepted by default (16 MB)
pub const MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024;
