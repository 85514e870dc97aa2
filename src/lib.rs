//! msgblock - Fault-tolerant decoder for LRGS `MsgBlock` payloads
//!
//! An LRGS server delivers raw DCP telemetry as a block of XML: one
//! `MsgBlock` root holding any number of `DcpMsg` elements. This crate
//! decodes such blocks into [`RawMessageBlock`] values, dropping
//! individual malformed messages with a warning while rejecting blocks
//! whose overall structure is wrong.
//!
//! # Quick Start
//!
//! ```rust
//! use msgblock::MessageBlockDecoder;
//!
//! let xml = br#"<MsgBlock><DcpMsg platformId="123" flags="0x2"/></MsgBlock>"#;
//!
//! let decoder = MessageBlockDecoder::new();
//! let block = decoder.decode(xml, 0, xml.len(), "example")?;
//!
//! assert_eq!(block.len(), 1);
//! assert_eq!(block.messages()[0].platform_id(), "123");
//! assert_eq!(block.messages()[0].flags(), 2);
//! # Ok::<(), msgblock::Error>(())
//! ```
//!
//! # Failure policy
//!
//! - **Per-message defects** (no `platformId`, unparseable `flags`) are
//!   logged through `tracing` and the message is skipped.
//! - **Structural defects** (wrong root, unexpected top-level element,
//!   stray text) fail the whole call with [`ProtocolError`].
//! - **Malformed markup** surfaces as [`Error::Xml`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    DecoderConfig, Error, MAX_BLOCK_SIZE, MessageBlockDecoder, MessageBody, ProtocolError,
    RawMessage, RawMessageBlock, Result, decode, encode,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
