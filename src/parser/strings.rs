//! String-literal scanning for the tolerant parser: `\" \\ \/ \b \f \n
//! \r \t` plus `\uXXXX` (including surrogate pairs); any other escape is
//! preserved as the escaped character itself rather than rejected.

use super::Parser;
use crate::error::RepairError;

fn utf8_char_len(lead_byte: u8) -> usize {
    if lead_byte & 0x80 == 0 {
        1
    } else if lead_byte & 0xE0 == 0xC0 {
        2
    } else if lead_byte & 0xF0 == 0xE0 {
        3
    } else if lead_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

fn parse_hex4(p: &mut Parser) -> Result<u16, RepairError> {
    if p.pos + 4 > p.bytes.len() {
        return Err(RepairError::UnexpectedEnd(p.pos));
    }
    let hex = std::str::from_utf8(&p.bytes[p.pos..p.pos + 4])
        .map_err(|_| RepairError::Parse("invalid unicode escape".to_string(), p.pos))?;
    let value = u16::from_str_radix(hex, 16)
        .map_err(|_| RepairError::Parse("invalid unicode escape".to_string(), p.pos))?;
    p.pos += 4;
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn parse_unicode_escape(p: &mut Parser, out: &mut Vec<u8>) -> Result<(), RepairError> {
    let unit = parse_hex4(p)?;
    if (0xD800..=0xDBFF).contains(&unit) {
        if p.bytes.get(p.pos) == Some(&b'\\') && p.bytes.get(p.pos + 1) == Some(&b'u') {
            let save = p.pos;
            p.pos += 2;
            let low = parse_hex4(p)?;
            if (0xDC00..=0xDFFF).contains(&low) {
                let code = 0x10000 + ((unit as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
                push_char(out, char::from_u32(code).unwrap_or('\u{FFFD}'));
            } else {
                p.pos = save;
                push_char(out, '\u{FFFD}');
            }
        } else {
            push_char(out, '\u{FFFD}');
        }
    } else if (0xDC00..=0xDFFF).contains(&unit) {
        push_char(out, '\u{FFFD}');
    } else {
        push_char(out, char::from_u32(unit as u32).unwrap_or('\u{FFFD}'));
    }
    Ok(())
}

/// Parse a string literal opened by `quote` (the parser's cursor sits on the
/// opening quote byte on entry, and is left just past the closing quote).
pub fn parse_string(p: &mut Parser, quote: u8) -> Result<String, RepairError> {
    p.pos += 1;
    let mut out: Vec<u8> = Vec::new();
    loop {
        match p.bytes.get(p.pos) {
            None => return Err(RepairError::UnexpectedEnd(p.pos)),
            Some(&b) if b == quote => {
                p.pos += 1;
                break;
            }
            Some(&b'\\') => {
                p.pos += 1;
                match p.bytes.get(p.pos) {
                    None => return Err(RepairError::UnexpectedEnd(p.pos)),
                    Some(b'"') => {
                        out.push(b'"');
                        p.pos += 1;
                    }
                    Some(b'\\') => {
                        out.push(b'\\');
                        p.pos += 1;
                    }
                    Some(b'/') => {
                        out.push(b'/');
                        p.pos += 1;
                    }
                    Some(b'b') => {
                        out.push(0x08);
                        p.pos += 1;
                    }
                    Some(b'f') => {
                        out.push(0x0C);
                        p.pos += 1;
                    }
                    Some(b'n') => {
                        out.push(b'\n');
                        p.pos += 1;
                    }
                    Some(b'r') => {
                        out.push(b'\r');
                        p.pos += 1;
                    }
                    Some(b't') => {
                        out.push(b'\t');
                        p.pos += 1;
                    }
                    Some(b'u') => {
                        p.pos += 1;
                        parse_unicode_escape(p, &mut out)?;
                    }
                    Some(&c) => {
                        let len = utf8_char_len(c);
                        out.extend_from_slice(&p.bytes[p.pos..p.pos + len]);
                        p.pos += len;
                    }
                }
            }
            Some(&c) => {
                let len = utf8_char_len(c);
                out.extend_from_slice(&p.bytes[p.pos..p.pos + len]);
                p.pos += len;
            }
        }
    }
    String::from_utf8(out).map_err(|_| RepairError::Parse("invalid utf-8 in string literal".to_string(), p.pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DuplicateKeyPolicy;

    fn parse_one(text: &str) -> String {
        let mut p = Parser {
            bytes: text.as_bytes(),
            pos: 0,
            allow_single_quotes: true,
            duplicate_key_policy: DuplicateKeyPolicy::FirstWins,
            duplicate_key_count: 0,
        };
        parse_string(&mut p, b'"').unwrap()
    }

    #[test]
    fn decodes_standard_escapes() {
        assert_eq!(parse_one(r#""a\nb\tc""#), "a\nb\tc");
    }

    #[test]
    fn unknown_escape_preserves_escaped_character() {
        assert_eq!(parse_one(r#""a\qb""#), "aqb");
    }

    #[test]
    fn decodes_unicode_escape() {
        assert_eq!(parse_one("\"\\u0041\""), "A");
    }

    #[test]
    fn decodes_surrogate_pair() {
        assert_eq!(parse_one(r#""😀""#), "\u{1F600}");
    }
}
