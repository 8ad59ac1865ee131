//! Recursive (value, schema, path) walker. `validate` stops at the
//! first violation; `validate_all` collects every one.

use crate::error::Diagnostic;
use crate::formats::matches_format;
use crate::value::Value;
use regex::Regex;
use std::collections::HashMap;

/// Validate `value` against `schema`, stopping at the first violation.
pub fn validate(value: &Value, schema: &Value) -> Result<(), Diagnostic> {
    let mut out = Vec::new();
    walk(value, schema, "$", true, &mut out);
    match out.into_iter().next() {
        Some(d) => Err(d),
        None => Ok(()),
    }
}

/// Validate `value` against `schema`, collecting every violation.
pub fn validate_all(value: &Value, schema: &Value) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    walk(value, schema, "$", false, &mut out);
    out
}

fn is_valid(value: &Value, schema: &Value) -> bool {
    let mut out = Vec::new();
    walk(value, schema, "$", true, &mut out);
    out.is_empty()
}

/// Push a diagnostic, emitting a `tracing::trace!` event alongside it when
/// the `logging` feature is on.
fn push_diag(out: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    #[cfg(feature = "logging")]
    tracing::trace!(path = %diagnostic.path, message = %diagnostic.message, "validation diagnostic");
    out.push(diagnostic);
}

fn array_path(base: &str, index: usize) -> String {
    format!("{base}[{index}]")
}

fn prop_path(base: &str, key: &str) -> String {
    format!("{base}.{key}")
}

fn walk(value: &Value, schema: &Value, path: &str, fail_fast: bool, out: &mut Vec<Diagnostic>) {
    let Some(schema_obj) = schema.as_object() else {
        return;
    };
    macro_rules! stop_if_failed {
        () => {
            if fail_fast && !out.is_empty() {
                return;
            }
        };
    }

    if let Some(t) = schema_obj.get("type") {
        let ok = match t {
            Value::String(name) => value.matches_type_name(name),
            Value::Array(names) => names.iter().filter_map(|n| n.as_str()).any(|n| value.matches_type_name(n)),
            _ => true,
        };
        if !ok {
            push_diag(out, Diagnostic::type_mismatch(
                path,
                format!("expected type {}, got {}", describe_type(t), value.type_name()),
            ));
            stop_if_failed!();
        }
    }

    if let Some(c) = schema_obj.get("const")
        && !value.canonically_eq(c) {
            push_diag(out, Diagnostic::schema(path, "value does not equal const"));
            stop_if_failed!();
        }

    if let Some(Value::Array(options)) = schema_obj.get("enum")
        && !options.iter().any(|o| value.canonically_eq(o)) {
            push_diag(out, Diagnostic::schema(path, "value is not one of the enum options"));
            stop_if_failed!();
        }

    if let Some(Value::Array(subschemas)) = schema_obj.get("allOf")
        && !subschemas.iter().all(|s| is_valid(value, s)) {
            push_diag(out, Diagnostic::schema(path, "value does not match every schema in allOf"));
            stop_if_failed!();
        }
    if let Some(Value::Array(subschemas)) = schema_obj.get("anyOf")
        && !subschemas.iter().any(|s| is_valid(value, s)) {
            push_diag(out, Diagnostic::schema(path, "value does not match any schema in anyOf"));
            stop_if_failed!();
        }
    if let Some(Value::Array(subschemas)) = schema_obj.get("oneOf") {
        let matches = subschemas.iter().filter(|s| is_valid(value, s)).count();
        if matches != 1 {
            push_diag(out, Diagnostic::schema(
                path,
                format!("value matches {matches} schemas in oneOf, expected exactly 1"),
            ));
            stop_if_failed!();
        }
    }

    if let Some(if_schema) = schema_obj.get("if") {
        let branch = if is_valid(value, if_schema) {
            schema_obj.get("then")
        } else {
            schema_obj.get("else")
        };
        if let Some(branch_schema) = branch {
            walk(value, branch_schema, path, fail_fast, out);
            stop_if_failed!();
        }
    }

    match value {
        Value::Number(n) => {
            if let Some(min) = schema_obj.get("minimum").and_then(Value::as_f64)
                && *n < min {
                    push_diag(out, Diagnostic::schema(path, format!("{n} is less than minimum {min}")));
                    stop_if_failed!();
                }
            if let Some(max) = schema_obj.get("maximum").and_then(Value::as_f64)
                && *n > max {
                    push_diag(out, Diagnostic::schema(path, format!("{n} is greater than maximum {max}")));
                    stop_if_failed!();
                }
            if let Some(m) = schema_obj.get("multipleOf").and_then(Value::as_f64)
                && m != 0.0 {
                    let ratio = n / m;
                    if (ratio - ratio.round()).abs() > 1e-9 {
                        push_diag(out, Diagnostic::schema(path, format!("{n} is not a multiple of {m}")));
                        stop_if_failed!();
                    }
                }
        }
        Value::String(s) => {
            let len = s.chars().count();
            if let Some(min) = schema_obj.get("minLength").and_then(Value::as_f64)
                && (len as f64) < min {
                    push_diag(out, Diagnostic::schema(path, format!("length {len} is less than minLength {min}")));
                    stop_if_failed!();
                }
            if let Some(max) = schema_obj.get("maxLength").and_then(Value::as_f64)
                && (len as f64) > max {
                    push_diag(out, Diagnostic::schema(path, format!("length {len} is greater than maxLength {max}")));
                    stop_if_failed!();
                }
            if let Some(pattern) = schema_obj.get("pattern").and_then(Value::as_str) {
                let matches = Regex::new(pattern).map(|re| re.is_match(s)).unwrap_or(false);
                if !matches {
                    push_diag(out, Diagnostic::schema(path, format!("value does not match pattern {pattern}")));
                    stop_if_failed!();
                }
            }
            if let Some(format) = schema_obj.get("format").and_then(Value::as_str)
                && !matches_format(format, s) {
                    push_diag(out, Diagnostic::schema(path, format!("value does not match format {format}")));
                    stop_if_failed!();
                }
        }
        Value::Array(items) => {
            if let Some(min) = schema_obj.get("minItems").and_then(Value::as_f64)
                && (items.len() as f64) < min {
                    push_diag(out, Diagnostic::schema(path, format!("array has {} items, minItems {min}", items.len())));
                    stop_if_failed!();
                }
            if let Some(max) = schema_obj.get("maxItems").and_then(Value::as_f64)
                && (items.len() as f64) > max {
                    push_diag(out, Diagnostic::schema(path, format!("array has {} items, maxItems {max}", items.len())));
                    stop_if_failed!();
                }
            if let Some(item_schema) = schema_obj.get("items") {
                for (i, item) in items.iter().enumerate() {
                    walk(item, item_schema, &array_path(path, i), fail_fast, out);
                    stop_if_failed!();
                }
            }
            if let Some(contains_schema) = schema_obj.get("contains") {
                let count = items.iter().filter(|v| is_valid(v, contains_schema)).count();
                let min_contains = schema_obj.get("minContains").and_then(Value::as_f64).unwrap_or(1.0) as usize;
                let max_contains = schema_obj.get("maxContains").and_then(Value::as_f64).map(|v| v as usize);
                if count < min_contains || max_contains.is_some_and(|max| count > max) {
                    push_diag(out, Diagnostic::schema(path, format!("{count} items match contains, expected at least {min_contains}")));
                    stop_if_failed!();
                }
            }
        }
        Value::Object(map) => {
            if let Some(min) = schema_obj.get("minProperties").and_then(Value::as_f64)
                && (map.len() as f64) < min {
                    push_diag(out, Diagnostic::schema(path, format!("object has {} properties, minProperties {min}", map.len())));
                    stop_if_failed!();
                }
            if let Some(max) = schema_obj.get("maxProperties").and_then(Value::as_f64)
                && (map.len() as f64) > max {
                    push_diag(out, Diagnostic::schema(path, format!("object has {} properties, maxProperties {max}", map.len())));
                    stop_if_failed!();
                }
            if let Some(Value::Array(required)) = schema_obj.get("required") {
                for key in required.iter().filter_map(Value::as_str) {
                    if !map.contains_key(key) {
                        push_diag(out, Diagnostic::schema(prop_path(path, key), format!("missing required property: {key}")));
                        stop_if_failed!();
                    }
                }
            }
            if let Some(Value::Object(dependent)) = schema_obj.get("dependentRequired") {
                for (key, deps) in dependent {
                    if map.contains_key(key)
                        && let Value::Array(deps) = deps {
                            for dep in deps.iter().filter_map(Value::as_str) {
                                if !map.contains_key(dep) {
                                    push_diag(out, Diagnostic::schema(
                                        prop_path(path, dep),
                                        format!("{dep} is required when {key} is present"),
                                    ));
                                    stop_if_failed!();
                                }
                            }
                        }
                }
            }
            if let Some(names_schema) = schema_obj.get("propertyNames") {
                for key in map.keys() {
                    walk(
                        &Value::String(key.clone()),
                        names_schema,
                        &prop_path(path, "propertyNames"),
                        fail_fast,
                        out,
                    );
                    stop_if_failed!();
                }
            }

            let properties = schema_obj.get("properties").and_then(Value::as_object);
            if let Some(properties) = properties {
                for (key, prop_schema) in properties {
                    if let Some(child) = map.get(key) {
                        walk(child, prop_schema, &prop_path(path, key), fail_fast, out);
                        stop_if_failed!();
                    }
                }
            }

            match schema_obj.get("additionalProperties") {
                Some(Value::Bool(false)) => {
                    let declared: HashMap<&str, ()> = properties
                        .map(|p| p.keys().map(|k| (k.as_str(), ())).collect())
                        .unwrap_or_default();
                    for key in map.keys() {
                        if !declared.contains_key(key.as_str()) {
                            push_diag(out, Diagnostic::schema(prop_path(path, key), format!("additional property not allowed: {key}")));
                            stop_if_failed!();
                        }
                    }
                }
                Some(extra_schema @ Value::Object(_)) => {
                    let declared: HashMap<&str, ()> = properties
                        .map(|p| p.keys().map(|k| (k.as_str(), ())).collect())
                        .unwrap_or_default();
                    for (key, child) in map {
                        if !declared.contains_key(key.as_str()) {
                            walk(child, extra_schema, &prop_path(path, key), fail_fast, out);
                            stop_if_failed!();
                        }
                    }
                }
                _ => {}
            }
        }
        _ => {}
    }
}

fn describe_type(t: &Value) -> String {
    match t {
        Value::String(s) => s.clone(),
        Value::Array(names) => names.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(" | "),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value as V;
    use indexmap::IndexMap;

    fn obj(pairs: Vec<(&str, V)>) -> V {
        let mut m = IndexMap::new();
        for (k, v) in pairs {
            m.insert(k.to_string(), v);
        }
        V::Object(m)
    }

    #[test]
    fn type_mismatch_reports_diagnostic() {
        let schema = obj(vec![("type", V::String("string".into()))]);
        let err = validate(&V::Number(1.0), &schema).unwrap_err();
        assert_eq!(err.path, "$");
    }

    #[test]
    fn required_property_missing_reports_path() {
        let schema = obj(vec![("required", V::Array(vec![V::String("name".into())]))]);
        let err = validate(&obj(vec![]), &schema).unwrap_err();
        assert_eq!(err.path, "$.name");
    }

    #[test]
    fn collect_all_gathers_every_violation() {
        let schema = obj(vec![
            ("required", V::Array(vec![V::String("a".into()), V::String("b".into())])),
        ]);
        let diags = validate_all(&obj(vec![]), &schema);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn additional_properties_false_rejects_extras() {
        let schema = obj(vec![
            ("properties", obj(vec![("a", obj(vec![("type", V::String("number".into()))]))])),
            ("additionalProperties", V::Bool(false)),
        ]);
        let value = obj(vec![("a", V::Number(1.0)), ("b", V::Number(2.0))]);
        let err = validate(&value, &schema).unwrap_err();
        assert_eq!(err.path, "$.b");
    }

    #[test]
    fn enum_membership_is_canonical() {
        let schema = obj(vec![("enum", V::Array(vec![V::Number(1.0), V::Number(2.0)]))]);
        assert!(validate(&V::Number(1.0), &schema).is_ok());
        assert!(validate(&V::Number(3.0), &schema).is_err());
    }

    #[test]
    fn nested_array_items_are_validated() {
        let schema = obj(vec![("items", obj(vec![("type", V::String("number".into()))]))]);
        let value = V::Array(vec![V::Number(1.0), V::String("x".into())]);
        let err = validate(&value, &schema).unwrap_err();
        assert_eq!(err.path, "$[1]");
    }
}
