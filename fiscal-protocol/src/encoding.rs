//! Latin-1 text encoding for the vendor toolchain
//!
//! The fiscal executable reads its command file and writes its output
//! in latin-1. `encoding_rs` follows the WHATWG encoding standard,
//! where the `latin1` label resolves to windows-1252; the two agree on
//! every byte the TFHKA command set can produce.

/// Encode a string to latin-1 bytes
///
/// Characters outside the code page are replaced by an ASCII numeric
/// reference, never dropped, so the result is always valid latin-1.
pub fn encode_latin1(s: &str) -> Vec<u8> {
    let (cow, _, _) = encoding_rs::WINDOWS_1252.encode(s);
    cow.into_owned()
}

/// Decode latin-1 bytes to a string (never fails, no replacement loss)
pub fn decode_latin1(bytes: &[u8]) -> String {
    let (cow, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
    cow.into_owned()
}
