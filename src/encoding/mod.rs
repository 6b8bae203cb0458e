//! Encoding detection and transcoding.
//!
//! Implements BOM sniffing and XML declaration encoding detection per
//! XML 1.0 Section 4.3.3 and Appendix F, bridging to `encoding_rs` for
//! character encoding conversion.
//!
//! # Encoding Detection Strategy
//!
//! 1. Check for a Byte Order Mark (BOM) at the start of the input.
//! 2. If a BOM is found, use the indicated encoding and skip the BOM bytes.
//! 3. If no BOM is found, default to UTF-8 (per the XML specification).
//! 4. After initial decoding, inspect the XML declaration's `encoding=`
//!    attribute to confirm or override the detected encoding.

use std::fmt;

/// An error that occurs during encoding detection or transcoding.
#[derive(Debug, Clone)]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encoding error: {}", self.message)
    }
}

impl std::error::Error for EncodingError {}

/// Detects the encoding of an XML byte stream by inspecting the Byte Order
/// Mark.
///
/// Returns a tuple of (encoding name, number of BOM bytes to skip). The
/// encoding name is an IANA charset name suitable for passing to
/// `encoding_rs`.
///
/// Per XML 1.0 Appendix F, the BOM detection order is:
/// - `EF BB BF` -> UTF-8
/// - `FE FF`    -> UTF-16 BE
/// - `FF FE`    -> UTF-16 LE
/// - No BOM     -> UTF-8 (default per XML spec)
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static str, usize) {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        ("UTF-8", 3)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        ("UTF-16BE", 2)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        ("UTF-16LE", 2)
    } else {
        ("UTF-8", 0)
    }
}

/// Transcodes a byte slice from the named encoding into a UTF-8 `String`.
///
/// Uses `encoding_rs::Encoding::for_label` to look up the encoding by its
/// IANA name (case-insensitive).
///
/// # Errors
///
/// Returns `EncodingError` if the encoding name is not recognized or if the
/// input contains malformed byte sequences.
pub fn transcode(bytes: &[u8], encoding_name: &str) -> Result<String, EncodingError> {
    let encoding = encoding_rs::Encoding::for_label(encoding_name.as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {encoding_name}")))?;

    let (result, _used_encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(EncodingError::new(format!(
            "malformed byte sequence for encoding {encoding_name}"
        )));
    }
    Ok(result.into_owned())
}

/// Decodes an XML byte stream to a UTF-8 `String`, running the full
/// detection pipeline: BOM sniffing, initial transcode, then XML
/// declaration confirmation.
///
/// # Errors
///
/// Returns `EncodingError` if the declared encoding is unknown, contradicts
/// a BOM, or the bytes do not decode cleanly.
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String, EncodingError> {
    let (bom_encoding, skip) = detect_encoding(bytes);

    if skip > 0 {
        // A BOM takes precedence; the declaration may only confirm it.
        let text = transcode(&bytes[skip..], bom_encoding)?;
        if let Some(declared) = extract_xml_decl_encoding(&text) {
            if !encoding_labels_agree(bom_encoding, &declared.to_ascii_lowercase()) {
                return Err(EncodingError::new(format!(
                    "BOM indicates {bom_encoding} but declaration says '{declared}'"
                )));
            }
        }
        return Ok(text);
    }

    // No BOM: sniff the declaration from a lossy decode of the prefix,
    // before committing to a full decode. The declaration is ASCII-only,
    // so the lossy view is reliable for it.
    let prefix_len = bytes.len().min(256);
    let prefix = String::from_utf8_lossy(&bytes[..prefix_len]);
    if let Some(declared) = extract_xml_decl_encoding(&prefix) {
        return transcode(bytes, &declared);
    }
    transcode(bytes, "UTF-8")
}

/// Returns `true` if a declared label is compatible with the BOM-detected
/// encoding (e.g. a `UTF-16LE` BOM with a declared `utf-16`).
fn encoding_labels_agree(bom_encoding: &str, declared_lower: &str) -> bool {
    match bom_encoding {
        "UTF-8" => declared_lower == "utf-8",
        "UTF-16BE" | "UTF-16LE" => declared_lower.starts_with("utf-16"),
        _ => false,
    }
}

/// Extracts the `encoding` attribute value from an XML declaration, if any.
///
/// A lightweight scan of the declaration only — the full parser never sees
/// this text.
fn extract_xml_decl_encoding(text: &str) -> Option<String> {
    if !text.starts_with("<?xml") {
        return None;
    }
    let decl_end = text.find("?>")?;
    let decl = &text[..decl_end];

    let enc_pos = decl.find("encoding")?;
    let after_enc = decl[enc_pos + "encoding".len()..].trim_start();
    let after_eq = after_enc.strip_prefix('=')?.trim_start();
    let quote = after_eq.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let value = &after_eq[1..];
    let end = value.find(quote)?;
    Some(value[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_encoding_boms() {
        assert_eq!(detect_encoding(b"\xEF\xBB\xBF<a/>"), ("UTF-8", 3));
        assert_eq!(detect_encoding(b"\xFE\xFF\x00<"), ("UTF-16BE", 2));
        assert_eq!(detect_encoding(b"\xFF\xFE<\x00"), ("UTF-16LE", 2));
        assert_eq!(detect_encoding(b"<a/>"), ("UTF-8", 0));
    }

    #[test]
    fn test_transcode_utf8() {
        assert_eq!(transcode(b"hello", "UTF-8").unwrap(), "hello");
    }

    #[test]
    fn test_transcode_unknown_label() {
        assert!(transcode(b"x", "no-such-encoding").is_err());
    }

    #[test]
    fn test_decode_latin1_declaration() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><n>caf\xE9</n>";
        let text = decode_to_utf8(bytes).unwrap();
        assert!(text.contains("caf\u{e9}"));
    }

    #[test]
    fn test_decode_utf16le_bom() {
        let source = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in source.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let text = decode_to_utf8(&bytes).unwrap();
        assert!(text.contains("<a/>"));
    }

    #[test]
    fn test_bom_contradicting_declaration() {
        let bytes = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a/>";
        assert!(decode_to_utf8(bytes).is_err());
    }

    #[test]
    fn test_extract_declared_encoding() {
        assert_eq!(
            extract_xml_decl_encoding("<?xml version=\"1.0\" encoding='Shift_JIS'?><a/>"),
            Some("Shift_JIS".to_string())
        );
        assert_eq!(extract_xml_decl_encoding("<a/>"), None);
    }
}
