//! The tagged value model shared by the parser, validator, streaming engine, and
//! schema inference. An object preserves first-insertion key order.

use indexmap::IndexMap;
use std::fmt;

/// A JSON-ish value. Schemas, diagnostics paths, and SQL policies are all plain
/// `Value`s — there is no separate "schema type".
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn object() -> Self {
        Value::Object(IndexMap::new())
    }

    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Predicate form of "integer-ness": not a tag, a check on the stored double.
    pub fn is_integer(&self) -> bool {
        match self {
            Value::Number(n) => n.is_finite() && (n - n.round()).abs() <= f64::EPSILON.max(1e-9),
            _ => false,
        }
    }

    /// Type name as used in schema `type` keyword matching.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) => {
                if n.is_finite() && (n - n.round()).abs() <= 1e-9 {
                    "integer"
                } else {
                    "number"
                }
            }
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Get a child by JSON-Schema-style `type` match, accepting both `"integer"`
    /// and `"number"` against a numeric value (integer is a specialization).
    pub fn matches_type_name(&self, name: &str) -> bool {
        match name {
            "integer" => matches!(self, Value::Number(_)) && self.is_integer(),
            "number" => matches!(self, Value::Number(_)),
            other => self.type_name() == other,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(o) => o.get(key),
            _ => None,
        }
    }

    #[allow(clippy::len_without_is_empty)] // Option<usize>, not a collection length
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.len()),
            Value::Object(o) => Some(o.len()),
            Value::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Canonical, compact JSON serialization: no whitespace, integers without a
    /// trailing `.0`, non-finite numbers as `null`, insertion-ordered keys.
    pub fn dumps_json(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::String(s) => write_json_string(s, out),
            Value::Array(items) => {
                out.push('[');
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    v.write_canonical(out);
                }
                out.push(']');
            }
            Value::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_json_string(k, out);
                    out.push(':');
                    v.write_canonical(out);
                }
                out.push('}');
            }
        }
    }

    /// Canonical equality for `const`/`enum`: compare via the canonical serializer
    /// rather than host deep-equality, so `1` and `1.0` and differently-ordered
    /// (but equal) objects agree.
    pub fn canonically_eq(&self, other: &Value) -> bool {
        self.dumps_json() == other.dumps_json()
    }
}

fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    if n == n.trunc() && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    // Up to 15 significant digits, then trim trailing zeros (but keep it a valid
    // JSON number, not an integer literal when the value truly has a fraction).
    let mut s = format!("{:.15e}", n);
    if let Ok(parsed) = s.parse::<f64>() {
        s = format!("{}", parsed);
    }
    s
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dumps_json())
    }
}

#[cfg(feature = "serde")]
impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(a) => serde_json::Value::Array(a.iter().map(Into::into).collect()),
            Value::Object(o) => {
                let mut map = serde_json::Map::new();
                for (k, v) in o {
                    map.insert(k.clone(), v.into());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

#[cfg(feature = "serde")]
impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        (&v).into()
    }
}

#[cfg(feature = "serde")]
impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(a) => Value::Array(a.iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => {
                let mut map = IndexMap::new();
                for (k, v) in o {
                    map.insert(k.clone(), v.into());
                }
                Value::Object(map)
            }
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        (&v).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_serialize_without_trailing_zero() {
        assert_eq!(Value::Number(12.0).dumps_json(), "12");
        assert_eq!(Value::Number(-3.0).dumps_json(), "-3");
    }

    #[test]
    fn non_finite_numbers_become_null() {
        assert_eq!(Value::Number(f64::NAN).dumps_json(), "null");
        assert_eq!(Value::Number(f64::INFINITY).dumps_json(), "null");
    }

    #[test]
    fn object_preserves_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Number(1.0));
        map.insert("a".to_string(), Value::Number(2.0));
        let v = Value::Object(map);
        assert_eq!(v.dumps_json(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn canonical_equality_treats_int_and_float_form_the_same() {
        assert!(Value::Number(1.0).canonically_eq(&Value::Number(1.0)));
        assert!(!Value::Number(1.0).canonically_eq(&Value::Number(1.5)));
    }

    #[test]
    fn strings_escape_control_characters() {
        let v = Value::String("a\nb\tc\"d".to_string());
        assert_eq!(v.dumps_json(), r#""a\nb\tc\"d""#);
    }
}
