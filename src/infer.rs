//! Schema inference: derive a JSON Schema-shaped [`Value`] from
//! example data, and merge two such schemas into their least upper bound.

use crate::formats::detect_format;
use crate::options::SchemaInferenceConfig;
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::BTreeSet;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn is_exact_integer(n: f64) -> bool {
    n == n.floor() && n.abs() <= MAX_SAFE_INTEGER
}

fn obj(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = IndexMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Object(map)
}

/// Infer a schema describing the shape of a single `value`.
pub fn infer_schema(value: &Value, config: &SchemaInferenceConfig) -> Value {
    match value {
        Value::Null => obj(vec![("type", Value::String("null".into()))]),
        Value::Bool(_) => {
            let mut pairs = vec![("type", Value::String("boolean".into()))];
            if config.include_default {
                pairs.push(("default", value.clone()));
            }
            obj(pairs)
        }
        Value::Number(n) => {
            let is_int = is_exact_integer(*n);
            let mut pairs = vec![("type", Value::String(if config.prefer_integer && is_int { "integer".into() } else { "number".into() }))];
            if config.include_default {
                pairs.push(("default", value.clone()));
            }
            if config.infer_numeric_ranges {
                pairs.push(("minimum", Value::Number(*n)));
                pairs.push(("maximum", Value::Number(*n)));
            }
            obj(pairs)
        }
        Value::String(s) => {
            let mut pairs = vec![("type", Value::String("string".into()))];
            if config.infer_formats
                && let Some(fmt) = detect_format(s) {
                    pairs.push(("format", Value::String(fmt.to_string())));
                }
            if config.include_default {
                pairs.push(("default", value.clone()));
            }
            if config.infer_string_lengths {
                let len = s.chars().count() as f64;
                pairs.push(("minLength", Value::Number(len)));
                pairs.push(("maxLength", Value::Number(len)));
            }
            if config.include_examples {
                pairs.push(("examples", Value::Array(vec![value.clone()])));
            }
            obj(pairs)
        }
        Value::Array(items) => infer_array_schema(items, config),
        Value::Object(map) => infer_object_schema(map, config),
    }
}

fn infer_array_schema(arr: &[Value], config: &SchemaInferenceConfig) -> Value {
    let mut pairs = vec![("type", Value::String("array".into()))];
    let items_schema = if arr.is_empty() {
        Value::object()
    } else {
        let mut iter = arr.iter().map(|item| infer_schema(item, config));
        let mut acc = iter.next().unwrap();
        for next in iter {
            acc = merge_schemas(&acc, &next, config);
        }
        acc
    };
    pairs.push(("items", items_schema));
    if config.infer_array_lengths {
        let len = arr.len() as f64;
        pairs.push(("minItems", Value::Number(len)));
        pairs.push(("maxItems", Value::Number(len)));
    }
    obj(pairs)
}

fn infer_object_schema(map: &IndexMap<String, Value>, config: &SchemaInferenceConfig) -> Value {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for (key, value) in map {
        properties.insert(key.clone(), infer_schema(value, config));
        if config.required_by_default {
            required.push(Value::String(key.clone()));
        }
    }
    let mut pairs = vec![("type", Value::String("object".into())), ("properties", Value::Object(properties))];
    if !required.is_empty() {
        pairs.push(("required", Value::Array(required)));
    }
    if config.strict_additional_properties {
        pairs.push(("additionalProperties", Value::Bool(false)));
    }
    obj(pairs)
}

/// Infer one schema covering every element of `values`, merging pairwise and
/// attaching `enum` when the values look like a small closed string set.
pub fn infer_schema_from_values(values: &[Value], config: &SchemaInferenceConfig) -> Value {
    if values.is_empty() {
        return Value::object();
    }
    if values.len() == 1 {
        return infer_schema(&values[0], config);
    }

    let mut schema = infer_schema(&values[0], config);
    for v in &values[1..] {
        schema = merge_schemas(&schema, &infer_schema(v, config), config);
    }

    if config.detect_enums {
        let mut distinct: BTreeSet<&str> = BTreeSet::new();
        let all_strings = values.iter().all(|v| matches!(v, Value::String(_)));
        if all_strings {
            for v in values {
                distinct.insert(v.as_str().unwrap());
            }
            if distinct.len() <= config.max_enum_values && distinct.len() < values.len()
                && let Value::Object(map) = &mut schema {
                    map.insert("enum".to_string(), Value::Array(distinct.into_iter().map(|s| Value::String(s.to_string())).collect()));
                }
        }
    }
    schema
}

fn type_name(schema_obj: &IndexMap<String, Value>) -> Option<&str> {
    schema_obj.get("type").and_then(Value::as_str)
}

fn num_field(obj: &IndexMap<String, Value>, key: &str, default: f64) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Merge two inferred schemas into their least upper bound: same-type
/// schemas merge field by field, different types fall back to `anyOf` (or a
/// merged `type` array when `allowAnyOf` is off).
pub fn merge_schemas(schema1: &Value, schema2: &Value, config: &SchemaInferenceConfig) -> Value {
    let (Some(s1), Some(s2)) = (schema1.as_object(), schema2.as_object()) else {
        return if schema1.as_object().is_none_or(|o| o.is_empty()) { schema2.clone() } else { schema1.clone() };
    };
    if s1.is_empty() {
        return schema2.clone();
    }
    if s2.is_empty() {
        return schema1.clone();
    }

    let t1 = type_name(s1);
    let t2 = type_name(s2);

    if let (Some(t1), Some(t2)) = (t1, t2)
        && t1 == t2 {
            return merge_same_type(t1, s1, s2, config);
        }

    if config.allow_any_of {
        if matches!((t1, t2), (Some("integer"), Some("number")) | (Some("number"), Some("integer"))) {
            return obj(vec![("type", Value::String("number".into()))]);
        }
        return obj(vec![("anyOf", Value::Array(vec![schema1.clone(), schema2.clone()]))]);
    }

    merge_types(schema1.get("type"), schema2.get("type"))
}

fn merge_same_type(t: &str, s1: &IndexMap<String, Value>, s2: &IndexMap<String, Value>, config: &SchemaInferenceConfig) -> Value {
    let mut res = vec![("type", Value::String(t.to_string()))];

    match t {
        "object" => {
            let props1 = s1.get("properties").and_then(Value::as_object);
            let props2 = s2.get("properties").and_then(Value::as_object);
            let mut all_keys: Vec<&String> = Vec::new();
            let mut seen = std::collections::HashSet::new();
            for key in props1.into_iter().flatten().map(|(k, _)| k).chain(props2.into_iter().flatten().map(|(k, _)| k)) {
                if seen.insert(key) {
                    all_keys.push(key);
                }
            }
            let mut merged_props = IndexMap::new();
            for key in all_keys {
                let v1 = props1.and_then(|p| p.get(key));
                let v2 = props2.and_then(|p| p.get(key));
                let merged = match (v1, v2) {
                    (Some(a), Some(b)) => merge_schemas(a, b, config),
                    (Some(a), None) => a.clone(),
                    (None, Some(b)) => b.clone(),
                    (None, None) => unreachable!(),
                };
                merged_props.insert(key.clone(), merged);
            }
            res.push(("properties", Value::Object(merged_props)));

            let req1: BTreeSet<&str> = s1.get("required").and_then(Value::as_array).map(|a| a.iter().filter_map(Value::as_str).collect()).unwrap_or_default();
            let req2: BTreeSet<&str> = s2.get("required").and_then(Value::as_array).map(|a| a.iter().filter_map(Value::as_str).collect()).unwrap_or_default();
            let intersection: Vec<Value> = req1.intersection(&req2).map(|s| Value::String(s.to_string())).collect();
            if !intersection.is_empty() {
                res.push(("required", Value::Array(intersection)));
            }
            if config.strict_additional_properties {
                res.push(("additionalProperties", Value::Bool(false)));
            }
        }
        "array" => {
            let items1 = s1.get("items");
            let items2 = s2.get("items");
            if let (Some(a), Some(b)) = (items1, items2) {
                res.push(("items", merge_schemas(a, b, config)));
            } else if let Some(a) = items1 {
                res.push(("items", a.clone()));
            } else if let Some(b) = items2 {
                res.push(("items", b.clone()));
            }
            if config.infer_array_lengths {
                let min1 = num_field(s1, "minItems", 0.0);
                let min2 = num_field(s2, "minItems", 0.0);
                let max1 = num_field(s1, "maxItems", 1e9);
                let max2 = num_field(s2, "maxItems", 1e9);
                res.push(("minItems", Value::Number(min1.min(min2))));
                res.push(("maxItems", Value::Number(max1.max(max2))));
            }
        }
        "string" => {
            if config.infer_string_lengths {
                let min1 = num_field(s1, "minLength", 0.0);
                let min2 = num_field(s2, "minLength", 0.0);
                let max1 = num_field(s1, "maxLength", 1e9);
                let max2 = num_field(s2, "maxLength", 1e9);
                res.push(("minLength", Value::Number(min1.min(min2))));
                res.push(("maxLength", Value::Number(max1.max(max2))));
            }
            if let (Some(f1), Some(f2)) = (s1.get("format").and_then(Value::as_str), s2.get("format").and_then(Value::as_str))
                && f1 == f2 {
                    res.push(("format", Value::String(f1.to_string())));
                }
            if config.include_examples {
                let mut examples: BTreeSet<&str> = BTreeSet::new();
                for s in [s1, s2] {
                    if let Some(arr) = s.get("examples").and_then(Value::as_array) {
                        for ex in arr.iter().filter_map(Value::as_str) {
                            if examples.len() < config.max_examples {
                                examples.insert(ex);
                            }
                        }
                    }
                }
                if !examples.is_empty() {
                    res.push(("examples", Value::Array(examples.into_iter().map(|s| Value::String(s.to_string())).collect())));
                }
            }
        }
        "number" | "integer"
            if config.infer_numeric_ranges => {
                let min1 = num_field(s1, "minimum", f64::MIN);
                let min2 = num_field(s2, "minimum", f64::MIN);
                let max1 = num_field(s1, "maximum", f64::MAX);
                let max2 = num_field(s2, "maximum", f64::MAX);
                res.push(("minimum", Value::Number(min1.min(min2))));
                res.push(("maximum", Value::Number(max1.max(max2))));
            }
        _ => {}
    }

    obj(res)
}

fn merge_types(t1: Option<&Value>, t2: Option<&Value>) -> Value {
    let mut types: BTreeSet<String> = BTreeSet::new();
    let mut add = |t: Option<&Value>| match t {
        Some(Value::String(s)) => {
            types.insert(s.clone());
        }
        Some(Value::Array(items)) => {
            for item in items {
                if let Some(s) = item.as_str() {
                    types.insert(s.to_string());
                }
            }
        }
        _ => {}
    };
    add(t1);
    add(t2);
    if types.contains("integer") && types.contains("number") {
        types.remove("integer");
    }
    if types.len() == 1 {
        Value::String(types.into_iter().next().unwrap())
    } else {
        Value::Array(types.into_iter().map(Value::String).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SchemaInferenceConfig {
        SchemaInferenceConfig::default()
    }

    #[test]
    fn infers_primitive_types() {
        assert_eq!(infer_schema(&Value::Null, &cfg()).get("type").unwrap().as_str(), Some("null"));
        assert_eq!(infer_schema(&Value::Number(3.0), &cfg()).get("type").unwrap().as_str(), Some("integer"));
        assert_eq!(infer_schema(&Value::Number(3.5), &cfg()).get("type").unwrap().as_str(), Some("number"));
    }

    #[test]
    fn infers_string_format() {
        let schema = infer_schema(&Value::String("a@b.com".into()), &cfg());
        assert_eq!(schema.get("format").unwrap().as_str(), Some("email"));
    }

    #[test]
    fn infers_object_with_required_and_no_additional_properties() {
        let mut map = IndexMap::new();
        map.insert("id".to_string(), Value::Number(1.0));
        let schema = infer_schema(&Value::Object(map), &cfg());
        assert_eq!(schema.get("type").unwrap().as_str(), Some("object"));
        assert_eq!(schema.get("required").unwrap().as_array().unwrap().len(), 1);
        assert_eq!(schema.get("additionalProperties").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn merges_array_item_schemas() {
        let arr = Value::Array(vec![Value::Number(1.0), Value::Number(2.5)]);
        let schema = infer_schema(&arr, &cfg());
        assert_eq!(schema.get("items").unwrap().get("type").unwrap().as_str(), Some("number"));
    }

    #[test]
    fn infers_enum_from_repeated_strings() {
        let values = vec![Value::String("a".into()), Value::String("b".into()), Value::String("a".into())];
        let schema = infer_schema_from_values(&values, &cfg());
        let enum_values = schema.get("enum").unwrap().as_array().unwrap();
        assert_eq!(enum_values.len(), 2);
    }

    #[test]
    fn different_types_become_any_of_when_allowed() {
        let a = infer_schema(&Value::String("x".into()), &cfg());
        let b = infer_schema(&Value::Number(1.0), &cfg());
        let schema = merge_schemas(&a, &b, &cfg());
        assert!(schema.get("anyOf").is_some());
    }

    #[test]
    fn required_becomes_intersection_across_merges() {
        let mut a = IndexMap::new();
        a.insert("id".to_string(), Value::Number(1.0));
        let schema_a = infer_schema(&Value::Object(a), &cfg());

        let mut b = IndexMap::new();
        b.insert("id".to_string(), Value::Number(2.0));
        b.insert("name".to_string(), Value::String("x".into()));
        let schema_b = infer_schema(&Value::Object(b), &cfg());

        let merged = merge_schemas(&schema_a, &schema_b, &cfg());
        let required = merged.get("required").unwrap().as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].as_str(), Some("id"));
    }
}
