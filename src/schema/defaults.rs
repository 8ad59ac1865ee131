//! Default-value injection: for any object
//! schema with `properties`, fill in missing keys whose property subschema
//! carries a `default`. Recurses into nested properties and array items.
//! Never overwrites a key that's already present.

use crate::value::Value;

/// Apply `schema`'s defaults to `value` in place, recursing into nested
/// objects (via `properties`) and array elements (via `items`).
pub fn apply_defaults(value: &mut Value, schema: &Value) {
    let Some(schema_obj) = schema.as_object() else {
        return;
    };

    if let Value::Object(map) = value
        && let Some(properties) = schema_obj.get("properties").and_then(Value::as_object) {
            for (key, prop_schema) in properties {
                if !map.contains_key(key)
                    && let Some(default) = prop_schema.as_object().and_then(|p| p.get("default")) {
                        map.insert(key.clone(), default.clone());
                    }
            }
            for (key, prop_schema) in properties {
                if let Some(child) = map.get_mut(key) {
                    apply_defaults(child, prop_schema);
                }
            }
        }

    if let Value::Array(items) = value
        && let Some(item_schema) = schema_obj.get("items") {
            for item in items.iter_mut() {
                apply_defaults(item, item_schema);
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
    fn fills_missing_property_with_default() {
        let schema = obj(vec![(
            "properties",
            obj(vec![("count", obj(vec![("default", Value::Number(0.0))]))]),
        )]);
        let mut value = obj(vec![]);
        apply_defaults(&mut value, &schema);
        assert_eq!(value.get("count"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn never_overwrites_a_present_key() {
        let schema = obj(vec![(
            "properties",
            obj(vec![("count", obj(vec![("default", Value::Number(0.0))]))]),
        )]);
        let mut value = obj(vec![("count", Value::Number(5.0))]);
        apply_defaults(&mut value, &schema);
        assert_eq!(value.get("count"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn recurses_into_array_items() {
        let item_schema = obj(vec![(
            "properties",
            obj(vec![("active", obj(vec![("default", Value::Bool(true))]))]),
        )]);
        let schema = obj(vec![("items", item_schema)]);
        let mut value = Value::Array(vec![obj(vec![]), obj(vec![("active", Value::Bool(false))])]);
        apply_defaults(&mut value, &schema);
        if let Value::Array(items) = &value {
            assert_eq!(items[0].get("active"), Some(&Value::Bool(true)));
            assert_eq!(items[1].get("active"), Some(&Value::Bool(false)));
        } else {
            panic!("expected array");
        }
    }
}
