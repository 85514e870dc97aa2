//! Decoder configuration

use super::MAX_BLOCK_SIZE;

/// Default limit on element nesting inside a block.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for a [`MessageBlockDecoder`](super::MessageBlockDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest block window accepted, in bytes.
    pub max_block_size: usize,
    /// Deepest element nesting accepted before the block is rejected.
    pub max_depth: usize,
    /// Have the tag-stream engine reject close tags that do not match the open tag.
    pub check_end_names: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_block_size: MAX_BLOCK_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            check_end_names: true,
        }
    }
}

impl DecoderConfig {
    /// Override the block size limit.
    #[must_use]
    pub const fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }

    /// Override the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Toggle end-name checking in the tag-stream engine.
    #[must_use]
    pub const fn with_check_end_names(mut self, check_end_names: bool) -> Self {
        self.check_end_names = check_end_names;
        self
    }
}
