//! MsgBlock codec (encode/decode)
//!
//! Decoding goes through [`MessageBlockDecoder`]; encoding renders a block
//! back to the same schema so fixtures and relays can produce payloads
//! the decoder accepts.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::body::Field;
use super::{
    DCP_MSG_TAG, FLAGS_ATTR, MSG_BLOCK_TAG, MessageBlockDecoder, PLATFORM_ID_ATTR, RawMessage,
    RawMessageBlock, Result,
};

/// Encode a block to XML
///
/// # Format
///
/// ```text
/// <?xml version="1.0" encoding="UTF-8"?>
/// <MsgBlock>
///   <DcpMsg platformId="..." flags="0x...">
///     <BinaryMsg>BASE64</BinaryMsg>
///     ...
///   </DcpMsg>
/// </MsgBlock>
/// ```
///
/// Body fields that are unset are omitted.
pub fn encode(block: &RawMessageBlock) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(MSG_BLOCK_TAG)))?;
    for message in block {
        write_message(&mut writer, message)?;
    }
    writer.write_event(Event::End(BytesEnd::new(MSG_BLOCK_TAG)))?;

    Ok(writer.into_inner())
}

fn write_message(writer: &mut Writer<Vec<u8>>, message: &RawMessage) -> Result<()> {
    let flags = format!("0x{:x}", message.flags());
    let start = BytesStart::new(DCP_MSG_TAG).with_attributes([
        (PLATFORM_ID_ATTR, message.platform_id()),
        (FLAGS_ATTR, flags.as_str()),
    ]);

    let fields: Vec<(Field, String)> = Field::ALL
        .into_iter()
        .filter_map(|field| field.render(message.body()).map(|text| (field, text)))
        .collect();

    if fields.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for (field, text) in &fields {
        writer.write_event(Event::Start(BytesStart::new(field.tag())))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new(field.tag())))?;
    }
    writer.write_event(Event::End(BytesEnd::new(DCP_MSG_TAG)))?;
    Ok(())
}

/// Decode a block spanning all of `bytes` with the default configuration
pub fn decode(bytes: &[u8], source_name: &str) -> Result<RawMessageBlock> {
    MessageBlockDecoder::new().decode_all(bytes, source_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageBody;
    use bytes::Bytes;

    #[test]
    fn test_encode_decode_roundtrip() {
        let body = MessageBody {
            data: Some(Bytes::from_static(b"CE31D03024123100000G44+1NN161WXX00072\"<&>")),
            sequence_num: Some(4711),
            local_recv_time: Some("2024/123 10:00:03.120".to_owned()),
            baud: Some(1200),
            signal_strength: Some(44.5),
            freq_offset: Some(-1),
            ..MessageBody::default()
        };
        let original: RawMessageBlock = vec![
            RawMessage::new("CE31D030", 0x10).with_body(body),
            RawMessage::new("A&B <1>", u64::MAX),
            RawMessage::with_default_flags("DDCC1234"),
        ]
        .into();

        let encoded = encode(&original).unwrap();
        let decoded = decode(&encoded, "roundtrip").unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_empty_block() {
        let encoded = encode(&RawMessageBlock::new()).unwrap();
        let text = String::from_utf8(encoded.clone()).unwrap();

        assert!(text.contains("<MsgBlock>"));
        assert!(decode(&encoded, "empty").unwrap().is_empty());
    }

    #[test]
    fn test_flags_written_as_hex() {
        let block: RawMessageBlock = vec![RawMessage::new("1", 255)].into();
        let text = String::from_utf8(encode(&block).unwrap()).unwrap();

        assert!(text.contains(r#"flags="0xff""#), "{text}");
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn platform_id_strategy() -> impl Strategy<Value = String> {
            "[A-Za-z0-9 &<>\"'_-]{1,12}"
        }

        fn message_strategy() -> impl Strategy<Value = RawMessage> {
            (
                platform_id_strategy(),
                any::<u64>(),
                prop::option::of(prop::collection::vec(any::<u8>(), 0..256)),
                prop::option::of(any::<u32>()),
            )
                .prop_map(|(platform_id, flags, data, sequence_num)| {
                    RawMessage::new(platform_id, flags).with_body(MessageBody {
                        data: data.map(Bytes::from),
                        sequence_num,
                        ..MessageBody::default()
                    })
                })
        }

        proptest! {
            /// Property: any block survives encode then decode
            #[test]
            fn prop_roundtrip_preserves_messages(
                messages in prop::collection::vec(message_strategy(), 0..16),
            ) {
                let original = RawMessageBlock::from(messages);
                let encoded = encode(&original).unwrap();
                let decoded = decode(&encoded, "prop").unwrap();

                prop_assert_eq!(decoded, original);
            }

            /// Property: a platformId-less message costs exactly one message
            #[test]
            fn prop_missing_platform_id_drops_one(
                messages in prop::collection::vec(message_strategy(), 1..8),
                victim in any::<prop::sample::Index>(),
            ) {
                let original = RawMessageBlock::from(messages);
                let encoded = String::from_utf8(encode(&original).unwrap()).unwrap();

                // Rename one platformId attribute so it is no longer recognized.
                let victim = victim.index(original.len());
                let mut seen = 0;
                let mutated: String = encoded
                    .split("platformId=")
                    .enumerate()
                    .map(|(i, part)| {
                        if i == 0 {
                            part.to_owned()
                        } else {
                            seen += 1;
                            let key = if seen - 1 == victim { "platformIdx=" } else { "platformId=" };
                            format!("{key}{part}")
                        }
                    })
                    .collect();

                let decoded = decode(mutated.as_bytes(), "prop").unwrap();
                prop_assert_eq!(decoded.len(), original.len() - 1);
            }

            /// Property: arbitrary bytes never panic the decoder
            #[test]
            fn prop_arbitrary_input_does_not_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
                let _ = decode(&data, "fuzz");
            }

            /// Property: flags in any hex spelling resolve to the same value
            #[test]
            fn prop_flags_hex_spellings(flags in any::<u64>(), upper in any::<bool>(), prefix in 0usize..3) {
                let digits = if upper { format!("{flags:X}") } else { format!("{flags:x}") };
                let attr = match prefix {
                    0 => digits,
                    1 => format!("0x{digits}"),
                    _ => format!("0X{digits}"),
                };
                let xml = format!(r#"<MsgBlock><DcpMsg platformId="P" flags="{attr}"/></MsgBlock>"#);

                let block = decode(xml.as_bytes(), "prop").unwrap();
                prop_assert_eq!(block.len(), 1);
                prop_assert_eq!(block.messages()[0].flags(), flags);
            }
        }
    }
}
