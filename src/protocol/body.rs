//! `DcpMsg` body decoding
//!
//! Consumes the events nested inside one `DcpMsg` element and fills in the
//! [`MessageBody`] of the message under construction. Bad field values
//! are logged and left unset; they never cost the message its place in
//! the block.

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use tracing::{debug, warn};

use super::{MessageBody, RawMessage};

/// Child elements understood inside a `DcpMsg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    BinaryMsg,
    SequenceNum,
    LocalRecvTime,
    CarrierStart,
    CarrierStop,
    XmitTime,
    Baud,
    GoodPhasePct,
    FreqOffset,
    SignalStrength,
    PhaseNoise,
}

impl Field {
    pub(crate) const ALL: [Self; 11] = [
        Self::BinaryMsg,
        Self::SequenceNum,
        Self::LocalRecvTime,
        Self::CarrierStart,
        Self::CarrierStop,
        Self::XmitTime,
        Self::Baud,
        Self::GoodPhasePct,
        Self::FreqOffset,
        Self::SignalStrength,
        Self::PhaseNoise,
    ];

    pub(crate) const fn tag(self) -> &'static str {
        match self {
            Self::BinaryMsg => "BinaryMsg",
            Self::SequenceNum => "SequenceNum",
            Self::LocalRecvTime => "LocalRecvTime",
            Self::CarrierStart => "CarrierStart",
            Self::CarrierStop => "CarrierStop",
            Self::XmitTime => "XmitTime",
            Self::Baud => "Baud",
            Self::GoodPhasePct => "GoodPhasePct",
            Self::FreqOffset => "FreqOffset",
            Self::SignalStrength => "SignalStrength",
            Self::PhaseNoise => "PhaseNoise",
        }
    }

    fn from_tag(name: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.tag().as_bytes().eq_ignore_ascii_case(name))
    }

    /// Text rendering of this field's value, if set.
    pub(crate) fn render(self, body: &MessageBody) -> Option<String> {
        match self {
            Self::BinaryMsg => body.data.as_ref().map(|data| STANDARD.encode(data)),
            Self::SequenceNum => body.sequence_num.map(|v| v.to_string()),
            Self::LocalRecvTime => body.local_recv_time.clone(),
            Self::CarrierStart => body.carrier_start.clone(),
            Self::CarrierStop => body.carrier_stop.clone(),
            Self::XmitTime => body.xmit_time.clone(),
            Self::Baud => body.baud.map(|v| v.to_string()),
            Self::GoodPhasePct => body.good_phase_pct.map(|v| v.to_string()),
            Self::FreqOffset => body.freq_offset.map(|v| v.to_string()),
            Self::SignalStrength => body.signal_strength.map(|v| v.to_string()),
            Self::PhaseNoise => body.phase_noise.map(|v| v.to_string()),
        }
    }

    /// Store `value` into `body`; `false` if the value does not parse.
    fn apply(self, body: &mut MessageBody, value: &str) -> bool {
        match self {
            Self::BinaryMsg => {
                let compact: String = value.split_whitespace().collect();
                match STANDARD.decode(compact) {
                    Ok(data) => {
                        body.data = Some(Bytes::from(data));
                        true
                    }
                    Err(_) => false,
                }
            }
            Self::SequenceNum => store(&mut body.sequence_num, value),
            Self::LocalRecvTime => store_text(&mut body.local_recv_time, value),
            Self::CarrierStart => store_text(&mut body.carrier_start, value),
            Self::CarrierStop => store_text(&mut body.carrier_stop, value),
            Self::XmitTime => store_text(&mut body.xmit_time, value),
            Self::Baud => store(&mut body.baud, value),
            Self::GoodPhasePct => store(&mut body.good_phase_pct, value),
            Self::FreqOffset => store(&mut body.freq_offset, value),
            Self::SignalStrength => store(&mut body.signal_strength, value),
            Self::PhaseNoise => store(&mut body.phase_noise, value),
        }
    }
}

fn store<T: FromStr>(slot: &mut Option<T>, value: &str) -> bool {
    match value.parse() {
        Ok(parsed) => {
            *slot = Some(parsed);
            true
        }
        Err(_) => false,
    }
}

fn store_text(slot: &mut Option<String>, value: &str) -> bool {
    *slot = Some(value.to_owned());
    true
}

/// Handler state for the inside of one `DcpMsg` element.
#[derive(Debug)]
pub(crate) struct MessageBodyDecoder {
    message: RawMessage,
    field: Option<Field>,
    text: String,
    /// Open elements being discarded (unknown children, or markup inside a field).
    skip_depth: usize,
}

impl MessageBodyDecoder {
    pub(crate) fn new(message: RawMessage) -> Self {
        Self {
            message,
            field: None,
            text: String::new(),
            skip_depth: 0,
        }
    }

    pub(crate) fn start(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }
        if let Some(field) = self.field {
            debug!(
                platform_id = self.message.platform_id(),
                field = field.tag(),
                element = %String::from_utf8_lossy(name),
                "markup inside DcpMsg field ignored"
            );
            self.skip_depth = 1;
            return;
        }
        match Field::from_tag(name) {
            Some(field) => {
                self.field = Some(field);
                self.text.clear();
            }
            None => {
                debug!(
                    platform_id = self.message.platform_id(),
                    element = %String::from_utf8_lossy(name),
                    "unknown DcpMsg child element ignored"
                );
                self.skip_depth = 1;
            }
        }
    }

    pub(crate) fn text(&mut self, text: &str) {
        if self.skip_depth > 0 {
            return;
        }
        if self.field.is_some() {
            self.text.push_str(text);
        } else if !text.trim().is_empty() {
            warn!(
                platform_id = self.message.platform_id(),
                "unexpected character data in DcpMsg element ignored"
            );
        }
    }

    /// Handle a close tag; returns `true` once the `DcpMsg` element itself closes.
    pub(crate) fn end(&mut self) -> bool {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return false;
        }
        let Some(field) = self.field.take() else {
            return true;
        };
        let value = self.text.trim();
        if !field.apply(self.message.body_mut(), value) {
            warn!(
                platform_id = self.message.platform_id(),
                field = field.tag(),
                value,
                "invalid DcpMsg field value ignored"
            );
        }
        self.text.clear();
        false
    }

    pub(crate) fn finish(self) -> RawMessage {
        self.message
    }
}
