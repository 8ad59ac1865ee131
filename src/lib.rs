//! Extract, repair, parse, and validate structured payloads (JSON, SQL)
//! embedded in free-form LLM text.
//!
//! The core pipeline is extraction (find the candidate JSON/SQL span in
//! surrounding prose or fenced code), repair (rewrite common malformations),
//! parsing (a tolerant hand-rolled recursive-descent reader), and validation
//! (a pragmatic JSON Schema subset, or a SQL safety policy). A streaming
//! variant of each lets callers feed growing buffers incrementally.

pub mod cli;
pub mod error;
pub mod extract;
pub mod formats;
pub mod infer;
pub mod options;
pub mod parser;
pub mod repair;
pub mod schema;
pub mod sql;
pub mod stream;
pub mod value;

pub use error::{Diagnostic, DiagnosticKind, RepairError};
pub use options::{
    DuplicateKeyPolicy, RepairConfig, RepairMetadata, SchemaInferenceConfig, ValidationMode,
    ValidationRepairConfig,
};
pub use schema::{RepairSuggestion, ValidationRepairResult};
pub use sql::SqlParsed;
pub use value::Value;

// ============================================================================
// Core API - Extract, Repair, Parse
// ============================================================================

/// Extract the first JSON-looking candidate from `text`, repair it, and
/// parse it into a [`Value`].
///
/// This is the common case: free-form LLM output that may wrap the payload
/// in prose or a fenced code block and may contain the usual malformations
/// (smart quotes, trailing commas, unquoted keys, Python literals, ...).
///
/// # Examples
///
/// ```
/// use llm_structured::{loads, RepairConfig};
///
/// let text = "Sure, here you go:\n```json\n{name: 'John', age: 30,}\n```\n";
/// let value = loads(text, &RepairConfig::default())?;
/// assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("John"));
/// # Ok::<(), llm_structured::RepairError>(())
/// ```
pub fn loads(text: &str, config: &RepairConfig) -> Result<Value, RepairError> {
    let candidate = extract::extract_json_candidate(text)?;
    let (repaired, meta) = repair::repair(&candidate, config);
    let (value, _) = parser::parse(&repaired, config.allow_single_quotes, meta.duplicate_key_policy)?;
    Ok(value)
}

/// Like [`loads`], but also returns the [`RepairMetadata`] describing which
/// repair steps fired.
///
/// # Examples
///
/// ```
/// use llm_structured::{loads_with_metadata, RepairConfig};
///
/// let (value, meta) = loads_with_metadata("{a: 1,}", &RepairConfig::default())?;
/// assert_eq!(value.get("a").and_then(|v| v.as_f64()), Some(1.0));
/// assert!(meta.dropped_trailing_commas);
/// # Ok::<(), llm_structured::RepairError>(())
/// ```
pub fn loads_with_metadata(text: &str, config: &RepairConfig) -> Result<(Value, RepairMetadata), RepairError> {
    let candidate = extract::extract_json_candidate(text)?;
    let (repaired, meta) = repair::repair(&candidate, config);
    let (value, _) = parser::parse(&repaired, config.allow_single_quotes, meta.duplicate_key_policy)?;
    Ok((value, meta))
}

/// Repair `candidate` (already isolated, no surrounding prose) into a
/// canonical compact JSON string, without parsing it into a [`Value`].
///
/// # Examples
///
/// ```
/// use llm_structured::{repair_to_string, RepairConfig};
///
/// let (repaired, meta) = repair_to_string("{a: 1, b: 'x',}", &RepairConfig::default());
/// assert!(meta.dropped_trailing_commas);
/// assert!(meta.quoted_unquoted_keys);
/// assert!(!repaired.contains(",}"));
/// ```
pub fn repair_to_string(candidate: &str, config: &RepairConfig) -> (String, RepairMetadata) {
    repair::repair(candidate, config)
}

/// Extract every JSON-looking candidate span from `text`, in order.
///
/// # Examples
///
/// ```
/// use llm_structured::extract_all;
///
/// let spans = extract_all("first {\"a\":1} then {\"b\":2}").unwrap();
/// assert_eq!(spans.len(), 2);
/// ```
pub fn extract_all(text: &str) -> Result<Vec<String>, RepairError> {
    extract::extract_json_candidates(text)
}

// ============================================================================
// Schema Validation API
// ============================================================================

/// Validate `value` against `schema`, stopping at the first violation.
///
/// # Examples
///
/// ```
/// use llm_structured::{loads, validate, RepairConfig};
///
/// let schema = loads(r#"{"type":"object","required":["name"]}"#, &RepairConfig::default())?;
/// let value = loads(r#"{"name":"Ada"}"#, &RepairConfig::default())?;
/// assert!(validate(&value, &schema).is_ok());
/// # Ok::<(), llm_structured::RepairError>(())
/// ```
pub fn validate(value: &Value, schema: &Value) -> Result<(), Diagnostic> {
    schema::validate(value, schema)
}

/// Validate `value` against `schema`, collecting every violation instead of
/// stopping at the first one.
pub fn validate_all(value: &Value, schema: &Value) -> Vec<Diagnostic> {
    schema::validate_all(value, schema)
}

/// Recursively fill in `schema`'s `default` values for properties/items
/// missing from `value`, returning the result as a new [`Value`].
pub fn apply_defaults(value: &Value, schema: &Value) -> Value {
    let mut value = value.clone();
    schema::apply_defaults(&mut value, schema);
    value
}

/// Validate `value` against `schema`, and where it fails, propose concrete
/// repairs (type coercion, clamping, enum nearest-neighbor, ...) governed by
/// `config`.
pub fn validate_with_repair(
    value: &Value,
    schema: &Value,
    config: &ValidationRepairConfig,
) -> ValidationRepairResult {
    schema::validate_with_repair(value, schema, config)
}

// ============================================================================
// Schema Inference API
// ============================================================================

/// Infer a JSON Schema that describes `value`.
///
/// # Examples
///
/// ```
/// use llm_structured::{loads, infer_schema, RepairConfig, SchemaInferenceConfig};
///
/// let value = loads(r#"{"name":"Ada","age":30}"#, &RepairConfig::default())?;
/// let schema = infer_schema(&value, &SchemaInferenceConfig::default());
/// assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("object"));
/// # Ok::<(), llm_structured::RepairError>(())
/// ```
pub fn infer_schema(value: &Value, config: &SchemaInferenceConfig) -> Value {
    infer::infer_schema(value, config)
}

/// Infer a single schema that describes every value in `values`, merging
/// per-value schemas as it goes.
pub fn infer_schema_from_values(values: &[Value], config: &SchemaInferenceConfig) -> Value {
    infer::infer_schema_from_values(values, config)
}

/// Merge two already-inferred schemas into one that accepts both shapes.
pub fn merge_schemas(schema1: &Value, schema2: &Value, config: &SchemaInferenceConfig) -> Value {
    infer::merge_schemas(schema1, schema2, config)
}

// ============================================================================
// SQL Safety API
// ============================================================================

/// Extract the first SQL statement from `text`, parse it, and check it
/// against `policy`.
///
/// # Examples
///
/// ```
/// use llm_structured::{loads, parse_and_validate_sql, RepairConfig};
///
/// let policy = loads(r#"{"allowedTables":["users"]}"#, &RepairConfig::default())?;
/// let parsed = parse_and_validate_sql("SELECT id FROM users WHERE id = 1", &policy)?;
/// assert_eq!(parsed.statement_type, "select");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_and_validate_sql(text: &str, policy: &Value) -> Result<SqlParsed, Diagnostic> {
    sql::parse_and_validate(text, policy)
}
