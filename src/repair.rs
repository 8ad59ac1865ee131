//! Ordered text-rewrite pipeline, applied to an extracted candidate
//! before it reaches the tolerant parser. Each step is independently
//! skippable via [`RepairConfig`] and records whether it fired in
//! [`RepairMetadata`].

use crate::options::{RepairConfig, RepairMetadata};

/// Emit a `tracing::debug!` event when a repair step actually rewrote the
/// text. A no-op when the `logging` feature is off.
#[cfg(feature = "logging")]
fn log_step(step: &str, fired: bool) {
    if fired {
        tracing::debug!(step, "repair step applied");
    }
}

#[cfg(not(feature = "logging"))]
fn log_step(_step: &str, _fired: bool) {}

/// Run every enabled repair step over `candidate` in the fixed order the
/// spec requires, returning the rewritten text plus which steps fired.
pub fn repair(candidate: &str, config: &RepairConfig) -> (String, RepairMetadata) {
    let mut meta = RepairMetadata {
        duplicate_key_policy: config.duplicate_key_policy,
        ..RepairMetadata::default()
    };
    let mut text = candidate.to_string();

    if config.fix_smart_quotes {
        let fixed = fix_smart_quotes(&text);
        meta.fixed_smart_quotes = fixed != text;
        log_step("fixSmartQuotes", meta.fixed_smart_quotes);
        text = fixed;
    }

    if config.strip_json_comments {
        let stripped = strip_json_comments(&text);
        meta.stripped_comments = stripped != text;
        log_step("stripJsonComments", meta.stripped_comments);
        text = stripped;
    }

    if config.replace_python_literals {
        let replaced = replace_python_literals(&text);
        meta.replaced_python_literals = replaced != text;
        log_step("replacePythonLiterals", meta.replaced_python_literals);
        text = replaced;
    }

    if config.convert_kv_object_to_json
        && let Some(converted) = try_kv_object_to_json(&text) {
            meta.converted_kv_object = true;
            log_step("convertKvObjectToJson", true);
            text = converted;
        }

    if config.quote_unquoted_keys {
        let quoted = quote_unquoted_keys(&text);
        meta.quoted_unquoted_keys = quoted != text;
        log_step("quoteUnquotedKeys", meta.quoted_unquoted_keys);
        text = quoted;
    }

    if config.drop_trailing_commas {
        let dropped = drop_trailing_commas(&text);
        meta.dropped_trailing_commas = dropped != text;
        log_step("dropTrailingCommas", meta.dropped_trailing_commas);
        text = dropped;
    }

    (text, meta)
}

/// U+201C/U+201D → `"`, U+2018/U+2019 → `'`.
fn fix_smart_quotes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Remove `//...` and `/*...*/` outside string literals.
fn strip_json_comments(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut in_str = false;
    let mut quote = '\0';
    let mut escape = false;

    while let Some(c) = chars.next() {
        if in_str {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            continue;
        }

        if c == '"' || c == '\'' {
            in_str = true;
            quote = c;
            out.push(c);
            continue;
        }

        if c == '/' && chars.peek() == Some(&'/') {
            chars.next();
            for next in chars.by_ref() {
                if next == '\n' {
                    out.push(next);
                    break;
                }
            }
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for next in chars.by_ref() {
                if prev == '*' && next == '/' {
                    break;
                }
                prev = next;
            }
            continue;
        }

        out.push(c);
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word-boundary `True`/`False`/`None` → `true`/`false`/`null`, outside strings.
fn replace_python_literals(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut in_str = false;
    let mut quote = '\0';
    let mut escape = false;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if in_str {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            in_str = true;
            quote = c;
            out.push(c);
            i += 1;
            continue;
        }

        let preceded_by_ident = i > 0 && is_ident_char(chars[i - 1]);
        if !preceded_by_ident && matches!(c, 'T' | 'F' | 'N')
            && let Some((word, replacement)) = [("True", "true"), ("False", "false"), ("None", "null")]
                .iter()
                .find(|(word, _)| chars[i..].starts_with(&word.chars().collect::<Vec<_>>()[..]))
            {
                let end = i + word.chars().count();
                if chars.get(end).is_none_or(|&c| !is_ident_char(c)) {
                    out.push_str(replacement);
                    i = end;
                    continue;
                }
            }

        out.push(c);
        i += 1;
    }
    out
}

/// `{ foo: 1 }` → `{"foo": 1}`, outside strings: identifier immediately
/// (modulo whitespace) followed by `:` gets quoted.
fn quote_unquoted_keys(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut in_str = false;
    let mut quote = '\0';
    let mut escape = false;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if in_str {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            in_str = true;
            quote = c;
            out.push(c);
            i += 1;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            let mut j = i;
            while j < chars.len() && is_ident_char(chars[j]) {
                j += 1;
            }
            let mut k = j;
            while k < chars.len() && chars[k].is_whitespace() {
                k += 1;
            }
            if k < chars.len() && chars[k] == ':' {
                out.push('"');
                out.extend(&chars[start..j]);
                out.push('"');
                i = j;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }
    out
}

/// If the candidate has no `{`/`[` but does have `=`, try to parse it as
/// `KEY=VALUE` lines and re-emit a JSON object. `None` if it doesn't look
/// like that shape at all (any non-matching, non-blank, non-comment line
/// aborts the conversion).
fn try_kv_object_to_json(s: &str) -> Option<String> {
    if s.contains('{') || s.contains('[') || !s.contains('=') {
        return None;
    }

    let mut map = indexmap::IndexMap::new();
    let mut any = false;
    for line in s.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (key, value) = split_kv_line(line)?;
        any = true;
        map.insert(key, coerce_kv_value(&value));
    }
    if !any {
        return None;
    }
    Some(crate::value::Value::Object(map).dumps_json())
}

fn split_kv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    let eq = trimmed.find('=')?;
    let key = trimmed[..eq].trim();
    if key.is_empty() || !key.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_') {
        return None;
    }
    if !key.chars().all(is_ident_char) {
        return None;
    }
    let value = trimmed[eq + 1..].trim();
    Some((key.to_string(), value.to_string()))
}

fn coerce_kv_value(value: &str) -> crate::value::Value {
    use crate::value::Value;
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        if (bytes[0] == b'"' && bytes[value.len() - 1] == b'"') || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'') {
            return Value::String(value[1..value.len() - 1].to_string());
        }
    }
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        other => other.parse::<f64>().map(Value::Number).unwrap_or_else(|_| Value::String(other.to_string())),
    }
}

/// Drop a `,` immediately (modulo whitespace) before `}`/`]`, outside strings.
fn drop_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut in_str = false;
    let mut quote = '\0';
    let mut escape = false;

    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        if in_str {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            in_str = true;
            quote = c;
            out.push(c);
            i += 1;
            continue;
        }

        if c == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smart_quotes_are_normalized() {
        let (text, meta) = repair("{\u{201C}a\u{201D}: 1}", &RepairConfig::default());
        assert_eq!(text, "{\"a\": 1}");
        assert!(meta.fixed_smart_quotes);
    }

    #[test]
    fn comments_are_stripped_outside_strings() {
        let (text, meta) = repair("{\"a\": 1 /* x */, \"b\": \"// not a comment\"}", &RepairConfig::default());
        assert!(text.contains("// not a comment"));
        assert!(!text.contains("/* x */"));
        assert!(meta.stripped_comments);
    }

    #[test]
    fn python_literals_are_replaced() {
        let (text, meta) = repair("{\"a\": True, \"b\": None}", &RepairConfig::default());
        assert_eq!(text, "{\"a\": true, \"b\": null}");
        assert!(meta.replaced_python_literals);
    }

    #[test]
    fn unquoted_keys_are_quoted() {
        let (text, meta) = repair("{foo: 1, bar: 2}", &RepairConfig::default());
        assert_eq!(text, "{\"foo\": 1, \"bar\": 2}");
        assert!(meta.quoted_unquoted_keys);
    }

    #[test]
    fn trailing_commas_are_dropped() {
        let (text, meta) = repair("{\"a\": [1, 2,],}", &RepairConfig::default());
        assert_eq!(text, "{\"a\": [1, 2]}");
        assert!(meta.dropped_trailing_commas);
    }

    #[test]
    fn kv_lines_convert_to_json_object() {
        let (text, meta) = repair("name=Ada\nage=36\nactive=true", &RepairConfig::default());
        assert!(meta.converted_kv_object);
        assert!(text.contains("\"name\":\"Ada\""));
        assert!(text.contains("\"age\":36"));
        assert!(text.contains("\"active\":true"));
    }

    #[test]
    fn kv_conversion_skipped_when_braces_present() {
        let (_, meta) = repair("{\"a\": 1}", &RepairConfig::default());
        assert!(!meta.converted_kv_object);
    }
}
