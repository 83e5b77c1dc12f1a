/*!
Hex token streams for terminal tools.

A frame renders as one token per byte, `<delimiter><two hex digits><space>`,
e.g. `$FF $FF $00 $01 `. Tokens are always two digits wide so a parser on the
other side can rely on fixed token boundaries.
*/

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Delimiter and case used for hex tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexStyle {
    pub delimiter: char,
    pub uppercase: bool,
}

impl Default for HexStyle {
    fn default() -> Self {
        Self {
            delimiter: '$',
            uppercase: true,
        }
    }
}

/// Render bytes as a token stream
pub fn render(bytes: &[u8], style: &HexStyle) -> String {
    let mut out = String::with_capacity(bytes.len() * (style.delimiter.len_utf8() + 3));
    for byte in bytes {
        let digits = if style.uppercase {
            hex::encode_upper([*byte])
        } else {
            hex::encode([*byte])
        };
        out.push(style.delimiter);
        out.push_str(&digits);
        out.push(' ');
    }
    out
}

/// Parse a token stream produced by [`render`] (either case)
pub fn parse(text: &str, style: &HexStyle) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = Vec::new();
    for token in text.split_whitespace() {
        let digits = token
            .strip_prefix(style.delimiter)
            .ok_or_else(|| DecodeError::InvalidHexToken {
                token: token.to_string(),
                reason: format!("missing delimiter '{}'", style.delimiter),
            })?;

        if digits.len() != 2 {
            return Err(DecodeError::InvalidHexToken {
                token: token.to_string(),
                reason: "expected exactly two hex digits".to_string(),
            });
        }

        let mut byte = [0u8; 1];
        hex::decode_to_slice(digits, &mut byte).map_err(|e| DecodeError::InvalidHexToken {
            token: token.to_string(),
            reason: e.to_string(),
        })?;
        bytes.push(byte[0]);
    }
    Ok(bytes)
}
