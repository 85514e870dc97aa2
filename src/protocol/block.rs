//! Decoded message block

use super::RawMessage;

/// Ordered sequence of messages decoded from one `MsgBlock` payload.
///
/// Blocks are only built up by the decoder; once handed to the caller
/// they expose read-only access.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessageBlock {
    messages: Vec<RawMessage>,
}

impl RawMessageBlock {
    /// Create an empty block
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, message: RawMessage) {
        self.messages.push(message);
    }

    /// Messages in source order
    #[must_use]
    pub fn messages(&self) -> &[RawMessage] {
        &self.messages
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the block holds no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate messages in source order
    pub fn iter(&self) -> std::slice::Iter<'_, RawMessage> {
        self.messages.iter()
    }

    /// Take ownership of the messages
    #[must_use]
    pub fn into_messages(self) -> Vec<RawMessage> {
        self.messages
    }
}

impl From<Vec<RawMessage>> for RawMessageBlock {
    fn from(messages: Vec<RawMessage>) -> Self {
        Self { messages }
    }
}

impl FromIterator<RawMessage> for RawMessageBlock {
    fn from_iter<I: IntoIterator<Item = RawMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RawMessageBlock {
    type Item = &'a RawMessage;
    type IntoIter = std::slice::Iter<'a, RawMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl IntoIterator for RawMessageBlock {
    type Item = RawMessage;
    type IntoIter = std::vec::IntoIter<RawMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}
