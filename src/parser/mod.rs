//! Hand-rolled recursive-descent parser over already-repaired text,
//! producing a [`Value`] tree directly rather than re-emitted JSON text —
//! callers need a typed in-memory value, not a corrected string.

mod number;
mod strings;

use crate::error::RepairError;
use crate::options::DuplicateKeyPolicy;
use crate::value::Value;
use indexmap::IndexMap;

/// Parse `text` into a [`Value`], returning the number of duplicate object
/// keys encountered along the way (for [`crate::options::RepairMetadata`]).
pub fn parse(text: &str, allow_single_quotes: bool, duplicate_key_policy: DuplicateKeyPolicy) -> Result<(Value, usize), RepairError> {
    let mut p = Parser {
        bytes: text.as_bytes(),
        pos: 0,
        allow_single_quotes,
        duplicate_key_policy,
        duplicate_key_count: 0,
    };
    p.skip_ws();
    let value = p.parse_value()?;
    p.skip_ws();
    if p.pos != p.bytes.len() {
        return Err(RepairError::Parse("trailing data after value".to_string(), p.pos));
    }
    Ok((value, p.duplicate_key_count))
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    allow_single_quotes: bool,
    duplicate_key_policy: DuplicateKeyPolicy,
    duplicate_key_count: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), RepairError> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else if self.peek().is_none() {
            Err(RepairError::UnexpectedEnd(self.pos))
        } else {
            Err(RepairError::UnexpectedChar(self.bytes[self.pos] as char, self.pos))
        }
    }

    fn parse_value(&mut self) -> Result<Value, RepairError> {
        self.skip_ws();
        match self.peek() {
            None => Err(RepairError::UnexpectedEnd(self.pos)),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(Value::String(strings::parse_string(self, b'"')?)),
            Some(b'\'') if self.allow_single_quotes => Ok(Value::String(strings::parse_string(self, b'\'')?)),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b'-') | Some(b'0'..=b'9') => number::parse_number(self),
            Some(c) => Err(RepairError::UnexpectedChar(c as char, self.pos)),
        }
    }

    fn parse_literal(&mut self, lit: &str, value: Value) -> Result<Value, RepairError> {
        let start = self.pos;
        if self.bytes[start..].starts_with(lit.as_bytes()) {
            self.pos += lit.len();
            Ok(value)
        } else {
            Err(RepairError::UnexpectedChar(self.bytes[start] as char, start))
        }
    }

    fn parse_object(&mut self) -> Result<Value, RepairError> {
        self.expect(b'{')?;
        let mut map: IndexMap<String, Value> = IndexMap::new();
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_ws();
            let key_pos = self.pos;
            let key = match self.peek() {
                Some(b'"') => strings::parse_string(self, b'"')?,
                Some(b'\'') if self.allow_single_quotes => strings::parse_string(self, b'\'')?,
                None => return Err(RepairError::UnexpectedEnd(self.pos)),
                Some(_) => return Err(RepairError::ObjectKeyExpected(self.pos)),
            };
            self.skip_ws();
            if self.peek() != Some(b':') {
                return Err(RepairError::ColonExpected(self.pos));
            }
            self.pos += 1;
            let value = self.parse_value()?;

            if map.contains_key(&key) {
                self.duplicate_key_count += 1;
                match self.duplicate_key_policy {
                    DuplicateKeyPolicy::Error => return Err(RepairError::DuplicateKey(key, key_pos)),
                    DuplicateKeyPolicy::FirstWins => {}
                    DuplicateKeyPolicy::LastWins => {
                        map.insert(key, value);
                    }
                }
            } else {
                map.insert(key, value);
            }

            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == Some(b'}') {
                        self.pos += 1;
                        break;
                    }
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(RepairError::UnexpectedEnd(self.pos)),
                Some(c) => return Err(RepairError::UnexpectedChar(c as char, self.pos)),
            }
        }
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, RepairError> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            let value = self.parse_value()?;
            items.push(value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == Some(b']') {
                        self.pos += 1;
                        break;
                    }
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(RepairError::UnexpectedEnd(self.pos)),
                Some(c) => return Err(RepairError::UnexpectedChar(c as char, self.pos)),
            }
        }
        Ok(Value::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(text: &str) -> Value {
        parse(text, true, DuplicateKeyPolicy::FirstWins).unwrap().0
    }

    #[test]
    fn parses_nested_object_and_array() {
        let v = ok(r#"{"a": [1, 2.5, true, null], "b": "x"}"#);
        assert_eq!(v.get("a").unwrap().as_array().unwrap().len(), 4);
        assert_eq!(v.get("b").unwrap().as_str(), Some("x"));
    }

    #[test]
    fn single_quoted_strings_when_allowed() {
        let v = ok("{'a': 'b'}");
        assert_eq!(v.get("a").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn duplicate_keys_first_wins_by_default() {
        let (v, count) = parse(r#"{"a": 1, "a": 2}"#, true, DuplicateKeyPolicy::FirstWins).unwrap();
        assert_eq!(v.get("a").unwrap().as_f64(), Some(1.0));
        assert_eq!(count, 1);
    }

    #[test]
    fn duplicate_keys_last_wins_when_configured() {
        let (v, _) = parse(r#"{"a": 1, "a": 2}"#, true, DuplicateKeyPolicy::LastWins).unwrap();
        assert_eq!(v.get("a").unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn duplicate_keys_error_policy_fails() {
        let err = parse(r#"{"a": 1, "a": 2}"#, true, DuplicateKeyPolicy::Error).unwrap_err();
        assert!(matches!(err, RepairError::DuplicateKey(_, _)));
    }

    #[test]
    fn trailing_data_is_an_error() {
        let err = parse("1 2", true, DuplicateKeyPolicy::FirstWins).unwrap_err();
        assert!(matches!(err, RepairError::Parse(_, _)));
    }

    #[test]
    fn unexpected_end_inside_object() {
        let err = parse(r#"{"a": 1"#, true, DuplicateKeyPolicy::FirstWins).unwrap_err();
        assert!(matches!(err, RepairError::UnexpectedEnd(_)));
    }
}
