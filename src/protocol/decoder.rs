//! `MsgBlock` decoder
//!
//! Walks the tag stream of one block with an explicit stack of handler
//! states. The failure policy has two tiers:
//!
//! ```text
//!   block structure wrong  -> ProtocolError, nothing returned
//!   one DcpMsg malformed   -> warn, skip its subtree, keep going
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument, trace, warn};

use super::attrs::{attr_ignore_case, parse_flags};
use super::body::MessageBodyDecoder;
use super::metrics::Metrics;
use super::{
    DCP_MSG_TAG, DEFAULT_FLAGS, DecoderConfig, Error, FLAGS_ATTR, MSG_BLOCK_TAG, PLATFORM_ID_ATTR,
    ProtocolError, RawMessage, RawMessageBlock, Result,
};

/// Decoder for `MsgBlock` payloads.
///
/// The decoder holds configuration only; all per-call state lives inside
/// [`decode`](Self::decode), so one instance can serve any number of
/// calls, including concurrent ones through a shared reference.
#[derive(Debug, Clone, Default)]
pub struct MessageBlockDecoder {
    config: DecoderConfig,
}

impl MessageBlockDecoder {
    /// Create a decoder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with explicit configuration
    #[must_use]
    pub const fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the block held in `bytes[offset..offset + length]`.
    ///
    /// `source_name` identifies the origin of the data in log output only.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferTooSmall`] if the window exceeds `bytes`
    /// - [`Error::PayloadTooLarge`] if the window exceeds the configured limit
    /// - [`Error::Protocol`] if the block structure violates the schema
    /// - [`Error::Xml`] if the markup itself is malformed or ends early
    #[instrument(level = "debug", skip(self, bytes), fields(source = source_name))]
    pub fn decode(
        &self,
        bytes: &[u8],
        offset: usize,
        length: usize,
        source_name: &str,
    ) -> Result<RawMessageBlock> {
        let window = self.window(bytes, offset, length)?;
        let result = self.decode_window(window, source_name);
        match &result {
            Ok(block) => Metrics::record_block(block.len()),
            Err(err) => {
                debug!(error = %err, "MsgBlock rejected");
                Metrics::record_rejected();
            }
        }
        result
    }

    /// Decode a block spanning all of `bytes`.
    pub fn decode_all(&self, bytes: &[u8], source_name: &str) -> Result<RawMessageBlock> {
        self.decode(bytes, 0, bytes.len(), source_name)
    }

    fn window<'a>(&self, bytes: &'a [u8], offset: usize, length: usize) -> Result<&'a [u8]> {
        let needed = offset.saturating_add(length);
        if needed > bytes.len() {
            return Err(Error::BufferTooSmall {
                needed,
                got: bytes.len(),
            });
        }
        if length > self.config.max_block_size {
            return Err(Error::PayloadTooLarge {
                size: length,
                max: self.config.max_block_size,
            });
        }
        Ok(&bytes[offset..needed])
    }

    fn decode_window(&self, window: &[u8], source_name: &str) -> Result<RawMessageBlock> {
        let mut reader = Reader::from_reader(window);
        reader.check_end_names(self.config.check_end_names);

        let mut ctx = ParseContext::new(source_name, self.config.max_depth);
        loop {
            match reader.read_event()? {
                Event::Start(element) => ctx.start(&reader, &element)?,
                Event::Empty(element) => {
                    ctx.start(&reader, &element)?;
                    ctx.end(element.local_name().as_ref());
                }
                Event::End(element) => ctx.end(element.local_name().as_ref()),
                Event::Text(text) => ctx.text(&text.unescape()?)?,
                Event::CData(data) => ctx.text(&reader.decoder().decode(&data)?)?,
                Event::Eof => break,
                _ => {}
            }
        }
        ctx.finish()
    }
}

/// Active handler for the next event.
#[derive(Debug)]
enum Handler {
    /// Inside `MsgBlock`, expecting `DcpMsg` elements.
    Block,
    /// Inside a `DcpMsg`, body delegated.
    Message(MessageBodyDecoder),
    /// Discarding a malformed `DcpMsg`; counts elements opened below it.
    Skip { depth: usize },
}

/// Per-call decode state.
struct ParseContext<'s> {
    source: &'s str,
    max_depth: usize,
    depth: usize,
    block: RawMessageBlock,
    stack: Vec<Handler>,
    closed: bool,
    opened: bool,
}

impl<'s> ParseContext<'s> {
    fn new(source: &'s str, max_depth: usize) -> Self {
        Self {
            source,
            max_depth,
            depth: 0,
            block: RawMessageBlock::new(),
            stack: Vec::new(),
            closed: false,
            opened: false,
        }
    }

    fn start(&mut self, reader: &Reader<&[u8]>, element: &BytesStart<'_>) -> Result<()> {
        self.depth += 1;
        // A skipped subtree only costs its own message, however deep it goes.
        let skipping = matches!(self.stack.last(), Some(Handler::Skip { .. }));
        if !skipping && self.depth > self.max_depth {
            return Err(ProtocolError::new(format!(
                "MsgBlock nesting exceeds {} levels",
                self.max_depth
            ))
            .into());
        }

        let local = element.local_name();
        let name = local.as_ref();
        match self.stack.last_mut() {
            None => self.open_root(name),
            Some(Handler::Block) => self.open_message(reader, element),
            Some(Handler::Message(body)) => {
                body.start(name);
                Ok(())
            }
            Some(Handler::Skip { depth }) => {
                *depth += 1;
                Ok(())
            }
        }
    }

    fn open_root(&mut self, name: &[u8]) -> Result<()> {
        if self.closed {
            let msg = format!(
                "Unexpected tag '{}' after end of MsgBlock data.",
                String::from_utf8_lossy(name)
            );
            warn!(source = self.source, "{msg}");
            return Err(ProtocolError::new(msg).into());
        }
        if !name.eq_ignore_ascii_case(MSG_BLOCK_TAG.as_bytes()) {
            let msg = format!(
                "Unexpected root tag '{}', expected {MSG_BLOCK_TAG}.",
                String::from_utf8_lossy(name)
            );
            warn!(source = self.source, "{msg}");
            return Err(ProtocolError::new(msg).into());
        }
        trace!(source = self.source, "MsgBlock opened");
        self.opened = true;
        self.stack.push(Handler::Block);
        Ok(())
    }

    fn open_message(&mut self, reader: &Reader<&[u8]>, element: &BytesStart<'_>) -> Result<()> {
        let local = element.local_name();
        if !local.as_ref().eq_ignore_ascii_case(DCP_MSG_TAG.as_bytes()) {
            let msg = format!(
                "Unexpected tag '{}' at top level MsgBlock data.",
                String::from_utf8_lossy(local.as_ref())
            );
            warn!(source = self.source, "{msg}");
            return Err(ProtocolError::new(msg).into());
        }

        let platform_id = match attr_ignore_case(reader, element, PLATFORM_ID_ATTR)? {
            Some(id) if !id.is_empty() => id,
            _ => {
                warn!(source = self.source, "DcpMsg element with no platformId, skipped");
                self.skip_message();
                return Ok(());
            }
        };

        let flags = match attr_ignore_case(reader, element, FLAGS_ATTR)? {
            None => {
                warn!(
                    source = self.source,
                    platform_id = %platform_id,
                    "DcpMsg element with no flags"
                );
                DEFAULT_FLAGS
            }
            Some(value) => {
                if let Some(flags) = parse_flags(&value) {
                    flags
                } else {
                    warn!(
                        source = self.source,
                        platform_id = %platform_id,
                        flags = %value,
                        "invalid flags attribute, DcpMsg skipped"
                    );
                    self.skip_message();
                    return Ok(());
                }
            }
        };

        trace!(platform_id = %platform_id, flags, "DcpMsg opened");
        self.stack
            .push(Handler::Message(MessageBodyDecoder::new(RawMessage::new(
                platform_id,
                flags,
            ))));
        Ok(())
    }

    fn skip_message(&mut self) {
        Metrics::record_skipped();
        self.stack.push(Handler::Skip { depth: 0 });
    }

    fn end(&mut self, name: &[u8]) {
        self.depth = self.depth.saturating_sub(1);
        match self.stack.last_mut() {
            None => {
                warn!(
                    source = self.source,
                    "Unexpected end element '{}'",
                    String::from_utf8_lossy(name)
                );
            }
            Some(Handler::Skip { depth }) => {
                if *depth == 0 {
                    self.stack.pop();
                } else {
                    *depth -= 1;
                }
            }
            Some(Handler::Message(body)) => {
                if body.end() {
                    if let Some(Handler::Message(body)) = self.stack.pop() {
                        self.block.push(body.finish());
                    }
                }
            }
            Some(Handler::Block) => {
                if name.eq_ignore_ascii_case(MSG_BLOCK_TAG.as_bytes()) {
                    trace!(source = self.source, messages = self.block.len(), "MsgBlock closed");
                    self.stack.pop();
                    self.closed = true;
                } else {
                    warn!(
                        source = self.source,
                        "Unexpected end element '{}'",
                        String::from_utf8_lossy(name)
                    );
                }
            }
        }
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Handler::Message(body)) => {
                body.text(text);
                Ok(())
            }
            Some(Handler::Skip { .. }) => Ok(()),
            Some(Handler::Block) | None => {
                if text.trim().is_empty() {
                    Ok(())
                } else {
                    Err(ProtocolError::new("No character data expected in MsgBlock data").into())
                }
            }
        }
    }

    /// A stream that ends early is a markup failure, not a schema violation.
    fn finish(self) -> Result<RawMessageBlock> {
        if !self.opened {
            return Err(quick_xml::Error::UnexpectedEof(MSG_BLOCK_TAG.to_owned()).into());
        }
        if !self.closed || !self.stack.is_empty() {
            return Err(quick_xml::Error::UnexpectedEof(format!("</{MSG_BLOCK_TAG}>")).into());
        }
        Ok(self.block)
    }
}
