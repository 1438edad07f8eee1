use encoding_rs::Encoding;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

use crate::error::{Result, SubfetchError};

/// UTF-8 encoded byte-order mark prepended to generated subtitle files.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decompress a gzip-framed subtitle payload into its raw bytes.
pub fn decompress(payload: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(payload);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SubfetchError::Decompression(format!("Malformed gzip payload: {}", e)))?;

    debug!(
        "Decompressed {} bytes into {} bytes",
        payload.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Resolve a WHATWG charset label into an encoding.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| SubfetchError::Config(format!("Unknown charset label: {}", label)))
}

/// Re-encode legacy subtitle text as UTF-8, optionally BOM-prefixed.
///
/// Payloads that already decode as UTF-8 are kept unchanged when
/// `utf8_passthrough` is set; everything else is decoded with the given
/// single-byte encoding.
pub fn transcode(
    payload: &[u8],
    encoding: &'static Encoding,
    bom: bool,
    utf8_passthrough: bool,
) -> Result<Vec<u8>> {
    let stripped = payload.strip_prefix(&UTF8_BOM).unwrap_or(payload);

    let text: Vec<u8> = if utf8_passthrough && std::str::from_utf8(stripped).is_ok() {
        debug!("Payload is already valid UTF-8, passing through");
        stripped.to_vec()
    } else {
        let (decoded, _, _) = encoding.decode(stripped);
        decoded.into_owned().into_bytes()
    };

    let mut output = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if bom {
        output.extend_from_slice(&UTF8_BOM);
    }
    output.extend_from_slice(&text);
    Ok(output)
}
