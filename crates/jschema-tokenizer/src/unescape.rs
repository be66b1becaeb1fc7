//! Decoding of JSON string escapes.

use std::borrow::Cow;
use std::fmt;

/// An escape sequence that JSON does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeError {
    /// Byte offset of the backslash within the input.
    pub offset: usize,
    /// The offending sequence, backslash included.
    pub sequence: String,
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid escape sequence '{}' at offset {}",
            self.sequence, self.offset
        )
    }
}

impl std::error::Error for EscapeError {}

/// Decode the escapes in the inner text of a string literal (quotes excluded).
///
/// Borrows when there is nothing to decode. UTF-16 surrogate pairs written as
/// two `\uXXXX` escapes combine into one character; an unpaired surrogate
/// decodes to U+FFFD.
pub fn unescape(text: &str) -> Result<Cow<'_, str>, EscapeError> {
    if !text.contains('\\') {
        return Ok(Cow::Borrowed(text));
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some((_, '"')) => result.push('"'),
            Some((_, '\\')) => result.push('\\'),
            Some((_, '/')) => result.push('/'),
            Some((_, 'b')) => result.push('\u{8}'),
            Some((_, 'f')) => result.push('\u{c}'),
            Some((_, 'n')) => result.push('\n'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, 't')) => result.push('\t'),
            Some((_, 'u')) => {
                let high = read_hex4(text, i)?;
                for _ in 0..4 {
                    chars.next();
                }

                if (0xD800..0xDC00).contains(&high) {
                    // Look for the low half right behind.
                    let next = i + 6;
                    if text[next..].starts_with("\\u")
                        && let Ok(low) = read_hex4(text, next)
                        && (0xDC00..0xE000).contains(&low)
                    {
                        for _ in 0..6 {
                            chars.next();
                        }
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        result.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    } else {
                        result.push(char::REPLACEMENT_CHARACTER);
                    }
                } else {
                    result.push(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            Some((j, other)) => {
                return Err(EscapeError {
                    offset: i,
                    sequence: text[i..j + other.len_utf8()].to_string(),
                });
            }
            None => {
                return Err(EscapeError {
                    offset: i,
                    sequence: "\\".to_string(),
                });
            }
        }
    }

    Ok(Cow::Owned(result))
}

/// Read the four hex digits of a `\uXXXX` escape whose backslash is at `at`.
fn read_hex4(text: &str, at: usize) -> Result<u32, EscapeError> {
    let digits = text.get(at + 2..at + 6).filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()));
    match digits.and_then(|d| u32::from_str_radix(d, 16).ok()) {
        Some(code) => Ok(code),
        None => {
            let end = text[at + 2..]
                .char_indices()
                .take(4)
                .take_while(|(_, c)| c.is_ascii_hexdigit())
                .last()
                .map(|(j, c)| at + 2 + j + c.len_utf8())
                .unwrap_or(at + 2);
            Err(EscapeError {
                offset: at,
                sequence: text[at..end].to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_without_escapes() {
        assert!(matches!(unescape("plain"), Ok(Cow::Borrowed("plain"))));
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(
            unescape(r#"a\"b\\c\/d\ne\tf"#).unwrap(),
            "a\"b\\c/d\ne\tf"
        );
        assert_eq!(unescape(r"\b\f\r").unwrap(), "\u{8}\u{c}\r");
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(unescape(r"caf\u00e9").unwrap(), "café");
        assert_eq!(unescape(r"\ud83d\ude00").unwrap(), "😀");
        assert_eq!(unescape(r"\ud83dx").unwrap(), "\u{FFFD}x");
        assert_eq!(unescape(r"\ude00").unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_invalid_escapes() {
        let err = unescape(r"ab\qc").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.sequence, r"\q");

        let err = unescape(r"\u12").unwrap_err();
        assert_eq!(err.sequence, r"\u12");

        let err = unescape("trailing\\").unwrap_err();
        assert_eq!(err.offset, 8);
    }
}
