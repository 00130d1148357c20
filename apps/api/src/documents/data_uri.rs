use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};

use super::{DocumentError, DocumentFormat};

/// Standard alphabet; padding is cut off before decoding and unused low bits
/// of the last symbol are ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone)]
pub struct DataUri {
    pub header: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    /// Splits at the first `,` and base64-decodes the payload.
    ///
    /// Characters outside the base64 alphabet (line breaks, stray spaces) are
    /// discarded. Decoding stops at the first complete padded group; an
    /// unterminated partial group is a padding error.
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let (header, payload) = content
            .split_once(',')
            .ok_or(DocumentError::MissingSeparator)?;

        let symbols = significant_symbols(payload)?;
        let bytes = LENIENT.decode(symbols)?;

        Ok(DataUri {
            header: header.to_string(),
            bytes,
        })
    }

    pub fn format(&self) -> DocumentFormat {
        DocumentFormat::from_data_uri_header(&self.header)
    }
}

/// Alphabet symbols up to the end of the first properly padded group, without
/// the padding. `=` that cannot close the current group is skipped.
fn significant_symbols(payload: &str) -> Result<String, DecodeError> {
    let mut symbols = String::with_capacity(payload.len());
    let mut pads = 0usize;

    for c in payload.chars() {
        if c == '=' {
            let group_pos = symbols.len() % 4;
            if group_pos >= 2 {
                pads += 1;
                if group_pos + pads >= 4 {
                    return Ok(symbols);
                }
            }
        } else if c.is_ascii_alphanumeric() || c == '+' || c == '/' {
            pads = 0;
            symbols.push(c);
        }
    }

    match symbols.len() % 4 {
        2 | 3 => Err(DecodeError::InvalidPadding),
        _ => Ok(symbols),
    }
}
