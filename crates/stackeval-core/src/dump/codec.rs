//! Hex token conversion for a single dump line.
//!
//! A token's digit count decides how many bytes it stands for; its value is
//! then laid out in the target byte order. Tokens on one line share a width,
//! except that the final token may be shorter (a partial trailing word).

use crate::error::TokenError;
use crate::types::ByteOrder;

/// Bytes represented by a token of `digits` hex digits.
pub fn token_bytes(digits: usize) -> Option<usize>
{
    match digits {
        1..=2 => Some(1),
        3..=4 => Some(2),
        5..=8 => Some(4),
        9..=16 => Some(8),
        _ => None,
    }
}

/// Convert the whitespace-separated hex tokens of one line into bytes.
///
/// ## Errors
///
/// - `Inconsistent` when a token other than the last differs in width from
///   the first one, or the last one is wider than the rest
/// - `Oversize` when a token has more than 16 digits
/// - `NotHex` when a token is not hexadecimal
pub fn decode_tokens(text: &str, order: ByteOrder) -> Result<Vec<u8>, TokenError>
{
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Ok(Vec::new());
    };
    let expected = first.len();

    let mut out = Vec::with_capacity(tokens.len() * token_bytes(expected).unwrap_or(1));
    for (i, token) in tokens.iter().enumerate() {
        let is_last = i + 1 == tokens.len();
        let found = token.len();
        if found != expected && !(is_last && found < expected) {
            return Err(TokenError::Inconsistent {
                token: (*token).to_string(),
                expected,
                found,
            });
        }

        let width = token_bytes(found).ok_or_else(|| TokenError::Oversize {
            token: (*token).to_string(),
            width: found,
        })?;
        let value = u64::from_str_radix(token, 16).map_err(|source| TokenError::NotHex {
            token: (*token).to_string(),
            source,
        })?;
        order.put(value, width, &mut out);
    }

    Ok(out)
}

/// Format `bytes` as tokens of `width` bytes (1, 2, 4 or 8) in `order`.
///
/// A shorter final chunk becomes a shorter token; callers that need the
/// output to decode back identically only pass a final chunk of 1, 2 or 4
/// bytes.
pub fn encode_tokens(bytes: &[u8], width: usize, order: ByteOrder) -> Vec<String>
{
    bytes
        .chunks(width)
        .map(|chunk| {
            let digits = chunk.len() * 2;
            format!("{:0digits$x}", order.read(chunk))
        })
        .collect()
}
