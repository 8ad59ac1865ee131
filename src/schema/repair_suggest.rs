//! Repair-suggestion engine: for each
//! validation error, propose an auto-fix where one exists and otherwise
//! surface the error as unfixable.

use crate::error::Diagnostic;
use crate::options::ValidationRepairConfig;
use crate::value::Value;
use indexmap::IndexMap;

/// One proposed fix for a single validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairSuggestion {
    pub path: String,
    pub error_kind: String,
    pub message: String,
    pub suggestion: String,
    pub original_value: Value,
    pub suggested_value: Value,
    pub auto_fixable: bool,
}

/// Outcome of validating `value` against `schema` with repair attempts applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRepairResult {
    pub valid: bool,
    pub repaired_value: Value,
    pub suggestions: Vec<RepairSuggestion>,
    pub unfixable_errors: Vec<Diagnostic>,
    pub fully_repaired: bool,
}

/// Validate `value` against `schema`; where a violation has a pragmatic
/// auto-fix (type coercion, numeric clamping, enum nearest-neighbor, extra
/// property removal, truncation, schema defaults), apply it to a cloned copy
/// and record a [`RepairSuggestion`]. Everything else is returned unfixed in
/// `unfixable_errors`.
pub fn validate_with_repair(value: &Value, schema: &Value, config: &ValidationRepairConfig) -> ValidationRepairResult {
    let valid = super::validator::validate_all(value, schema).is_empty();
    let mut repaired = value.clone();
    let mut suggestions = Vec::new();
    let mut unfixable = Vec::new();

    walk_repair(&mut repaired, schema, "$", config, &mut suggestions, &mut unfixable);
    suggestions.truncate(config.max_suggestions);

    let fully_repaired = unfixable.is_empty() && super::validator::validate_all(&repaired, schema).is_empty();

    ValidationRepairResult {
        valid,
        repaired_value: repaired,
        suggestions,
        unfixable_errors: unfixable,
        fully_repaired,
    }
}

fn at_cap(suggestions: &[RepairSuggestion], config: &ValidationRepairConfig) -> bool {
    suggestions.len() >= config.max_suggestions
}

fn coerce(value: &Value, target_type: &str) -> Option<Value> {
    match (value, target_type) {
        (Value::String(s), "number" | "integer") => s.trim().parse::<f64>().ok().map(Value::Number),
        (Value::String(s), "boolean") => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (Value::Number(n), "string") => Some(Value::String(Value::Number(*n).dumps_json())),
        (Value::Bool(b), "string") => Some(Value::String(b.to_string())),
        (Value::Bool(b), "number" | "integer") => Some(Value::Number(if *b { 1.0 } else { 0.0 })),
        _ => None,
    }
}

fn walk_repair(
    value: &mut Value,
    schema: &Value,
    path: &str,
    config: &ValidationRepairConfig,
    suggestions: &mut Vec<RepairSuggestion>,
    unfixable: &mut Vec<Diagnostic>,
) {
    let Some(schema_obj) = schema.as_object() else {
        return;
    };
    if at_cap(suggestions, config) {
        return;
    }

    if let Some(Value::String(expected)) = schema_obj.get("type")
        && !value.matches_type_name(expected) {
            let original = value.clone();
            let fixed = if config.coerce_types { coerce(value, expected) } else { None };
            match fixed {
                Some(new_value) => {
                    suggestions.push(RepairSuggestion {
                        path: path.to_string(),
                        error_kind: "type".to_string(),
                        message: format!("expected type {expected}, got {}", original.type_name()),
                        suggestion: format!("coerce to {expected}"),
                        original_value: original,
                        suggested_value: new_value.clone(),
                        auto_fixable: true,
                    });
                    *value = new_value;
                }
                None => unfixable.push(Diagnostic::type_mismatch(
                    path,
                    format!("expected type {expected}, got {}", original.type_name()),
                )),
            }
            return;
        }

    if let Value::Number(n) = value {
        let min = schema_obj.get("minimum").and_then(Value::as_f64);
        let max = schema_obj.get("maximum").and_then(Value::as_f64);
        let clamped = match (min, max) {
            (Some(min), _) if *n < min => Some(min),
            (_, Some(max)) if *n > max => Some(max),
            _ => None,
        };
        if let Some(target) = clamped {
            if config.clamp_numbers {
                let original = Value::Number(*n);
                suggestions.push(RepairSuggestion {
                    path: path.to_string(),
                    error_kind: "range".to_string(),
                    message: format!("{n} is out of range [{min:?}, {max:?}]"),
                    suggestion: format!("clamp to {target}"),
                    original_value: original,
                    suggested_value: Value::Number(target),
                    auto_fixable: true,
                });
                *n = target;
            } else {
                unfixable.push(Diagnostic::schema(path, format!("{n} is out of range [{min:?}, {max:?}]")));
            }
        }
    }

    if let Value::String(s) = value {
        if let Some(Value::Array(options)) = schema_obj.get("enum") {
            let string_options: Vec<&str> = options.iter().filter_map(Value::as_str).collect();
            if !string_options.is_empty() && !string_options.contains(&s.as_str()) {
                if config.fix_enums {
                    if let Some(nearest) = string_options
                        .iter()
                        .min_by_key(|candidate| strsim::levenshtein(s, candidate))
                    {
                        let original = Value::String(s.clone());
                        let suggested = Value::String(nearest.to_string());
                        suggestions.push(RepairSuggestion {
                            path: path.to_string(),
                            error_kind: "enum".to_string(),
                            message: format!("{s:?} is not one of the enum options"),
                            suggestion: format!("closest enum value: {nearest}"),
                            original_value: original,
                            suggested_value: suggested.clone(),
                            auto_fixable: true,
                        });
                        *value = suggested;
                    }
                } else {
                    unfixable.push(Diagnostic::schema(path, format!("{s:?} is not one of the enum options")));
                }
                return;
            }
        }

        let max_len = schema_obj.get("maxLength").and_then(Value::as_f64);
        if let Some(max_len) = max_len {
            let len = s.chars().count();
            if (len as f64) > max_len {
                if config.truncate_strings {
                    let original = Value::String(s.clone());
                    let truncated: String = s.chars().take(max_len as usize).collect();
                    suggestions.push(RepairSuggestion {
                        path: path.to_string(),
                        error_kind: "length".to_string(),
                        message: format!("length {len} exceeds maxLength {max_len}"),
                        suggestion: "truncate to maxLength".to_string(),
                        original_value: original,
                        suggested_value: Value::String(truncated.clone()),
                        auto_fixable: true,
                    });
                    *s = truncated;
                } else {
                    unfixable.push(Diagnostic::schema(path, format!("length {len} exceeds maxLength {max_len}")));
                }
            }
        }

        if let Some(format) = schema_obj.get("format").and_then(Value::as_str)
            && !crate::formats::matches_format(format, s) {
                let trimmed = s.trim();
                if config.fix_formats && trimmed != s && crate::formats::matches_format(format, trimmed) {
                    let original = Value::String(s.clone());
                    let fixed = trimmed.to_string();
                    suggestions.push(RepairSuggestion {
                        path: path.to_string(),
                        error_kind: "format".to_string(),
                        message: format!("value does not match format {format}"),
                        suggestion: "trim surrounding whitespace".to_string(),
                        original_value: original,
                        suggested_value: Value::String(fixed.clone()),
                        auto_fixable: true,
                    });
                    *s = fixed;
                } else {
                    unfixable.push(Diagnostic::schema(path, format!("value does not match format {format}")));
                }
            }
    }

    if let Value::Array(items) = value {
        let max_items = schema_obj.get("maxItems").and_then(Value::as_f64);
        if let Some(max_items) = max_items
            && (items.len() as f64) > max_items {
                if config.truncate_arrays {
                    let original = Value::Array(items.clone());
                    items.truncate(max_items as usize);
                    suggestions.push(RepairSuggestion {
                        path: path.to_string(),
                        error_kind: "length".to_string(),
                        message: format!("array exceeds maxItems {max_items}"),
                        suggestion: "truncate to maxItems".to_string(),
                        original_value: original,
                        suggested_value: Value::Array(items.clone()),
                        auto_fixable: true,
                    });
                } else {
                    unfixable.push(Diagnostic::schema(path, format!("array exceeds maxItems {max_items}")));
                }
            }
        if let Some(item_schema) = schema_obj.get("items") {
            for (i, item) in items.iter_mut().enumerate() {
                walk_repair(item, item_schema, &format!("{path}[{i}]"), config, suggestions, unfixable);
            }
        }
    }

    if let Value::Object(map) = value {
        if let Some(Value::Array(required)) = schema_obj.get("required") {
            let properties = schema_obj.get("properties").and_then(Value::as_object);
            for key in required.iter().filter_map(Value::as_str) {
                if !map.contains_key(key) {
                    let default = properties
                        .and_then(|p| p.get(key))
                        .and_then(|s| s.as_object())
                        .and_then(|o| o.get("default"));
                    match default {
                        Some(default) if config.use_defaults => {
                            suggestions.push(RepairSuggestion {
                                path: format!("{path}.{key}"),
                                error_kind: "required".to_string(),
                                message: format!("missing required property: {key}"),
                                suggestion: "fill with schema default".to_string(),
                                original_value: Value::Null,
                                suggested_value: default.clone(),
                                auto_fixable: true,
                            });
                            map.insert(key.to_string(), default.clone());
                        }
                        _ => unfixable.push(Diagnostic::schema(format!("{path}.{key}"), format!("missing required property: {key}"))),
                    }
                }
            }
        }

        let properties = schema_obj.get("properties").and_then(Value::as_object);
        let declared: IndexMap<&str, ()> = properties
            .map(|p| p.keys().map(|k| (k.as_str(), ())).collect())
            .unwrap_or_default();

        if matches!(schema_obj.get("additionalProperties"), Some(Value::Bool(false))) {
            let extra_keys: Vec<String> = map
                .keys()
                .filter(|k| !declared.contains_key(k.as_str()))
                .cloned()
                .collect();
            for key in extra_keys {
                if config.remove_extra_properties {
                    if let Some(removed) = map.shift_remove(&key) {
                        suggestions.push(RepairSuggestion {
                            path: format!("{path}.{key}"),
                            error_kind: "extra".to_string(),
                            message: format!("additional property not allowed: {key}"),
                            suggestion: "remove property".to_string(),
                            original_value: removed,
                            suggested_value: Value::Null,
                            auto_fixable: true,
                        });
                    }
                } else {
                    unfixable.push(Diagnostic::schema(format!("{path}.{key}"), format!("additional property not allowed: {key}")));
                }
            }
        }

        if let Some(properties) = properties {
            for (key, prop_schema) in properties {
                if let Some(child) = map.get_mut(key) {
                    walk_repair(child, prop_schema, &format!("{path}.{key}"), config, suggestions, unfixable);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        let mut m = IndexMap::new();
        for (k, v) in pairs {
            m.insert(k.to_string(), v);
        }
        Value::Object(m)
    }

    #[test]
    fn coerces_numeric_string_and_marks_auto_fixable() {
        let schema = obj(vec![("type", Value::String("number".into()))]);
        let result = validate_with_repair(&Value::String("42".into()), &schema, &ValidationRepairConfig::default());
        assert!(!result.valid);
        assert_eq!(result.repaired_value, Value::Number(42.0));
        assert!(result.suggestions[0].auto_fixable);
        assert!(result.fully_repaired);
    }

    #[test]
    fn clamps_out_of_range_number() {
        let schema = obj(vec![("maximum", Value::Number(10.0))]);
        let result = validate_with_repair(&Value::Number(15.0), &schema, &ValidationRepairConfig::default());
        assert_eq!(result.repaired_value, Value::Number(10.0));
    }

    #[test]
    fn suggests_nearest_enum_value() {
        let schema = obj(vec![(
            "enum",
            Value::Array(vec![Value::String("red".into()), Value::String("blue".into())]),
        )]);
        let result = validate_with_repair(&Value::String("red!".into()), &schema, &ValidationRepairConfig::default());
        assert_eq!(result.repaired_value, Value::String("red".into()));
    }

    #[test]
    fn missing_required_without_default_is_unfixable() {
        let schema = obj(vec![("required", Value::Array(vec![Value::String("name".into())]))]);
        let result = validate_with_repair(&obj(vec![]), &schema, &ValidationRepairConfig::default());
        assert_eq!(result.unfixable_errors.len(), 1);
        assert!(!result.fully_repaired);
    }

    #[test]
    fn removes_additional_property_when_configured() {
        let schema = obj(vec![
            ("properties", obj(vec![("a", obj(vec![("type", Value::String("number".into()))]))])),
            ("additionalProperties", Value::Bool(false)),
        ]);
        let value = obj(vec![("a", Value::Number(1.0)), ("b", Value::Number(2.0))]);
        let result = validate_with_repair(&value, &schema, &ValidationRepairConfig::default());
        assert_eq!(result.repaired_value.get("b"), None);
        assert!(result.fully_repaired);
    }
}
