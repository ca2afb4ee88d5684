//! Text decoding for the raw catalog bytes
//!
//! The catalog has shipped as UTF-16LE with a BOM as well as plain UTF-8
//! across releases, sometimes preceded by a `#` license line. [`decode`]
//! sniffs the BOM, transcodes UTF-16 to UTF-8 and drops the license line so
//! the CSV reader always starts at the header.
//!
//! UTF-8 input is passed through without validation; invalid sequences surface
//! later as per-row parse failures instead of failing the whole run.

use crate::config::SourceEncoding;
use crate::error::DecodeError;
use encoding_rs::{Encoding, UTF_16LE, UTF_8};
use std::borrow::Cow;

const COMMENT_MARKER: u8 = b'#';

/// UTF-8 CSV text positioned at the header row
#[derive(Debug)]
pub struct DecodedSource<'a> {
    text: Cow<'a, [u8]>,
    start: usize,
    encoding: &'static Encoding,
    license: Option<String>,
}

impl<'a> DecodedSource<'a> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.text[self.start..]
    }

    /// Encoding the source was read as
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Skipped license line, trimmed
    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }
}

pub fn decode(raw: &[u8], fallback: SourceEncoding) -> Result<DecodedSource<'_>, DecodeError> {
    let (encoding, bom_len) = Encoding::for_bom(raw).unwrap_or(match fallback {
        SourceEncoding::Utf8 => (UTF_8, 0),
        SourceEncoding::Utf16Le => (UTF_16LE, 0),
    });
    let body = &raw[bom_len..];

    let text: Cow<'_, [u8]> = if encoding == UTF_8 {
        Cow::Borrowed(body)
    } else {
        let decoded = encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .ok_or(DecodeError::Malformed {
                encoding: encoding.name(),
            })?;
        Cow::Owned(decoded.into_owned().into_bytes())
    };

    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut source = DecodedSource {
        text,
        start: 0,
        encoding,
        license: None,
    };

    if source.text[0] == COMMENT_MARKER {
        let newline = source
            .text
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(DecodeError::UnterminatedBanner)?;
        let banner = String::from_utf8_lossy(&source.text[..newline]).trim().to_string();
        tracing::info!(license = %banner, "Skipping license line");
        source.license = Some(banner);
        source.start = newline + 1;
    }

    Ok(source)
}
