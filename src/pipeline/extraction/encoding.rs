//! Encoding resolution for non-PDF documents.
//!
//! Raw bytes of unknown provenance are sniffed (BOM first, then a statistical
//! detector) and decoded strictly with the guessed encoding. If that fails the
//! bytes are decoded as ISO-8859-1, which maps every byte to a code point, so
//! decoding as a whole cannot fail.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Result of decoding a byte buffer, with the label that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
    pub used_fallback: bool,
}

/// Label reported when the ISO-8859-1 fallback decoder was used.
pub const FALLBACK_ENCODING: &str = "ISO-8859-1";

/// Decode bytes of unknown encoding. Never fails.
pub fn decode_text(raw: &[u8]) -> String {
    resolve_and_decode(raw).text
}

/// Sniff the encoding of `raw` and decode it, reporting which encoding won.
pub fn resolve_and_decode(raw: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(raw) {
        return decode_with_guess(&raw[bom_len..], encoding);
    }
    decode_with_guess(raw, guess_encoding(raw))
}

/// Statistical best guess over the whole buffer.
pub fn guess_encoding(raw: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    detector.guess(None, true)
}

/// Strict decode with `encoding`; malformed input falls back to ISO-8859-1.
pub fn decode_with_guess(raw: &[u8], encoding: &'static Encoding) -> DecodedText {
    match encoding.decode_without_bom_handling_and_without_replacement(raw) {
        Some(text) => DecodedText {
            text: text.into_owned(),
            encoding: encoding.name(),
            used_fallback: false,
        },
        None => {
            tracing::debug!(
                guessed = encoding.name(),
                bytes = raw.len(),
                "Guessed encoding rejected input, decoding as ISO-8859-1"
            );
            DecodedText {
                text: encoding_rs::mem::decode_latin1(raw).into_owned(),
                encoding: FALLBACK_ENCODING,
                used_fallback: true,
            }
        }
    }
}
