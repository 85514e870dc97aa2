//! Attribute helpers for `DcpMsg` elements

use quick_xml::Reader;
use quick_xml::events::BytesStart;

use super::Result;

/// Look up an attribute by qualified name, ignoring ASCII case.
///
/// The first matching attribute in source order wins. Values are decoded
/// with the encoding the reader detected for the document.
pub(crate) fn attr_ignore_case(
    reader: &Reader<&[u8]>,
    element: &BytesStart<'_>,
    name: &str,
) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref().eq_ignore_ascii_case(name.as_bytes()) {
            return Ok(Some(attr.decode_and_unescape_value(reader)?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse a `flags` attribute: hexadecimal with an optional `0x`/`0X` prefix.
pub(crate) fn parse_flags(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_flags("0x10"), Some(16));
        assert_eq!(parse_flags("0X10"), Some(16));
        assert_eq!(parse_flags("10"), Some(16));
        assert_eq!(parse_flags("5"), Some(5));
        assert_eq!(parse_flags("ffffffffffffffff"), Some(u64::MAX));
        assert_eq!(parse_flags("0xZZ"), None);
        assert_eq!(parse_flags("0x"), None);
        assert_eq!(parse_flags(""), None);
        assert_eq!(parse_flags("1ffffffffffffffff"), None);
        assert_eq!(parse_flags(" 0x1"), None);
    }

    #[test]
    fn test_attr_lookup_ignores_case() {
        for key in ["platformId", "PLATFORMID", "PlatformId", "platformid"] {
            let element = BytesStart::new("DcpMsg").with_attributes([(key, "CE31D030")]);
            let found = attr_ignore_case(&Reader::from_str(""), &element, "platformId").unwrap();
            assert_eq!(found.as_deref(), Some("CE31D030"));
        }
    }

    #[test]
    fn test_attr_lookup_first_match_wins() {
        let element = BytesStart::new("DcpMsg")
            .with_attributes([("FLAGS", "0x2"), ("flags", "0x4")]);
        let found = attr_ignore_case(&Reader::from_str(""), &element, "flags").unwrap();
        assert_eq!(found.as_deref(), Some("0x2"));
    }

    #[test]
    fn test_attr_lookup_missing() {
        let element = BytesStart::new("DcpMsg").with_attributes([("flags", "1")]);
        assert_eq!(attr_ignore_case(&Reader::from_str(""), &element, "platformId").unwrap(), None);
    }

    #[test]
    fn test_attr_value_is_unescaped() {
        let element = BytesStart::from_content(r#"DcpMsg platformId="A&amp;B""#, 6);
        let found = attr_ignore_case(&Reader::from_str(""), &element, "platformId").unwrap();
        assert_eq!(found.as_deref(), Some("A&B"));
    }
}
