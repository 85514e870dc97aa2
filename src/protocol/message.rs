//! Raw DCP message implementation

use bytes::Bytes;

use super::DEFAULT_FLAGS;

/// Message data and reception metadata carried inside a `DcpMsg` element.
///
/// Every field is optional: upstream feeds omit whatever the receiving
/// station did not record, and unparseable values are dropped rather
/// than failing the message.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageBody {
    /// Raw message bytes (`BinaryMsg`, base64 on the wire)
    pub data: Option<Bytes>,
    /// Receiver sequence number (`SequenceNum`)
    pub sequence_num: Option<u32>,
    /// Time the message was received locally (`LocalRecvTime`)
    pub local_recv_time: Option<String>,
    /// Start of carrier (`CarrierStart`)
    pub carrier_start: Option<String>,
    /// End of carrier (`CarrierStop`)
    pub carrier_stop: Option<String>,
    /// Transmission time reported by the platform (`XmitTime`)
    pub xmit_time: Option<String>,
    /// Transmission baud rate (`Baud`)
    pub baud: Option<u32>,
    /// Percentage of good phase measurements (`GoodPhasePct`)
    pub good_phase_pct: Option<i32>,
    /// Frequency offset in units of 50 Hz (`FreqOffset`)
    pub freq_offset: Option<i32>,
    /// Signal strength in dBm (`SignalStrength`)
    pub signal_strength: Option<f64>,
    /// Phase noise in degrees RMS (`PhaseNoise`)
    pub phase_noise: Option<f64>,
}

/// One decoded DCP message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessage {
    /// Identifier of the transmitting platform
    platform_id: String,
    /// Delivery/status bitmask
    flags: u64,
    /// Message data and metadata
    body: MessageBody,
}

impl RawMessage {
    /// Create a message with an empty body
    pub fn new(platform_id: impl Into<String>, flags: u64) -> Self {
        Self {
            platform_id: platform_id.into(),
            flags,
            body: MessageBody::default(),
        }
    }

    /// Create a message with [`DEFAULT_FLAGS`]
    pub fn with_default_flags(platform_id: impl Into<String>) -> Self {
        Self::new(platform_id, DEFAULT_FLAGS)
    }

    /// Attach a body
    #[must_use]
    pub fn with_body(mut self, body: MessageBody) -> Self {
        self.body = body;
        self
    }

    /// Get platform ID
    #[must_use]
    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> u64 {
        self.flags
    }

    /// Check whether every bit of `mask` is set
    #[must_use]
    pub const fn has_flags(&self, mask: u64) -> bool {
        self.flags & mask == mask
    }

    /// Get body
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Get mutable body
    pub fn body_mut(&mut self) -> &mut MessageBody {
        &mut self.body
    }

    /// Raw message bytes, empty if the message carried none
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.body.data.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = RawMessage::new("CE31D030", 0x10);

        assert_eq!(msg.platform_id(), "CE31D030");
        assert_eq!(msg.flags(), 16);
        assert!(msg.has_flags(0x10));
        assert!(!msg.has_flags(0x11));
        assert!(msg.data().is_empty());
    }

    #[test]
    fn test_default_flags() {
        let msg = RawMessage::with_default_flags("123");
        assert_eq!(msg.flags(), 1);
    }

    #[test]
    fn test_body_attach() {
        let body = MessageBody {
            data: Some(Bytes::from_static(b"G12345")),
            baud: Some(300),
            ..MessageBody::default()
        };
        let msg = RawMessage::new("123", 1).with_body(body);

        assert_eq!(msg.data(), b"G12345");
        assert_eq!(msg.body().baud, Some(300));
    }
}
