//! Number-literal scanning: JSON grammar plus leading `-`, optional
//! fraction, optional exponent.

use super::Parser;
use crate::error::RepairError;
use crate::value::Value;

pub fn parse_number(p: &mut Parser) -> Result<Value, RepairError> {
    let start = p.pos;

    if p.bytes.get(p.pos) == Some(&b'-') {
        p.pos += 1;
    }

    let mut saw_digit = false;
    while matches!(p.bytes.get(p.pos), Some(b'0'..=b'9')) {
        p.pos += 1;
        saw_digit = true;
    }
    if !saw_digit {
        let bad = p.bytes.get(start).map(|&b| b as char).unwrap_or('\0');
        return Err(RepairError::UnexpectedChar(bad, start));
    }

    if p.bytes.get(p.pos) == Some(&b'.') {
        let dot_pos = p.pos;
        p.pos += 1;
        let mut frac_digit = false;
        while matches!(p.bytes.get(p.pos), Some(b'0'..=b'9')) {
            p.pos += 1;
            frac_digit = true;
        }
        if !frac_digit {
            p.pos = dot_pos;
        }
    }

    if matches!(p.bytes.get(p.pos), Some(b'e') | Some(b'E')) {
        let exp_pos = p.pos;
        p.pos += 1;
        if matches!(p.bytes.get(p.pos), Some(b'+') | Some(b'-')) {
            p.pos += 1;
        }
        let mut exp_digit = false;
        while matches!(p.bytes.get(p.pos), Some(b'0'..=b'9')) {
            p.pos += 1;
            exp_digit = true;
        }
        if !exp_digit {
            p.pos = exp_pos;
        }
    }

    let literal = std::str::from_utf8(&p.bytes[start..p.pos]).unwrap();
    literal
        .parse::<f64>()
        .map(Value::Number)
        .map_err(|_| RepairError::Parse(format!("invalid number literal {literal:?}"), start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DuplicateKeyPolicy;

    fn parse_one(text: &str) -> Value {
        let mut p = Parser {
            bytes: text.as_bytes(),
            pos: 0,
            allow_single_quotes: false,
            duplicate_key_policy: DuplicateKeyPolicy::FirstWins,
            duplicate_key_count: 0,
        };
        parse_number(&mut p).unwrap()
    }

    #[test]
    fn parses_integers_and_negatives() {
        assert_eq!(parse_one("42"), Value::Number(42.0));
        assert_eq!(parse_one("-7"), Value::Number(-7.0));
    }

    #[test]
    fn parses_fraction_and_exponent() {
        assert_eq!(parse_one("3.25"), Value::Number(3.25));
        assert_eq!(parse_one("1e3"), Value::Number(1000.0));
        assert_eq!(parse_one("-2.5e-2"), Value::Number(-0.025));
    }

    #[test]
    fn a_dot_with_no_following_digit_is_not_consumed() {
        let mut p = Parser {
            bytes: b"1.",
            pos: 0,
            allow_single_quotes: false,
            duplicate_key_policy: DuplicateKeyPolicy::FirstWins,
            duplicate_key_count: 0,
        };
        let v = parse_number(&mut p).unwrap();
        assert_eq!(v, Value::Number(1.0));
        assert_eq!(p.pos, 1);
    }
}
