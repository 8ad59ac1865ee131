//! Configuration structs. All options are explicit fields passed by the caller;
//! there are no environment-variable lookups.

/// Behavior when a parsed object has repeated keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
    /// Fail with a parse-kind diagnostic whose path is `$.<key>`.
    Error,
    /// Keep the first occurrence (default).
    #[default]
    FirstWins,
    /// Overwrite with the last occurrence.
    LastWins,
}

/// Toggles for the repair pipeline and the duplicate-key policy.
#[derive(Clone, Debug)]
pub struct RepairConfig {
    pub fix_smart_quotes: bool,
    pub strip_json_comments: bool,
    pub replace_python_literals: bool,
    pub convert_kv_object_to_json: bool,
    pub quote_unquoted_keys: bool,
    pub drop_trailing_commas: bool,
    pub allow_single_quotes: bool,
    pub duplicate_key_policy: DuplicateKeyPolicy,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            fix_smart_quotes: true,
            strip_json_comments: true,
            replace_python_literals: true,
            convert_kv_object_to_json: true,
            quote_unquoted_keys: true,
            drop_trailing_commas: true,
            allow_single_quotes: true,
            duplicate_key_policy: DuplicateKeyPolicy::FirstWins,
        }
    }
}

/// One boolean per applied repair step, plus duplicate-key bookkeeping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepairMetadata {
    pub extracted_from_fence: bool,
    pub fixed_smart_quotes: bool,
    pub stripped_comments: bool,
    pub replaced_python_literals: bool,
    pub converted_kv_object: bool,
    pub quoted_unquoted_keys: bool,
    pub dropped_trailing_commas: bool,
    pub duplicate_key_count: usize,
    pub duplicate_key_policy: DuplicateKeyPolicy,
}

/// Validation mode: stop at the first error, or collect every violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    FailFast,
    CollectAll,
}

/// Configuration for the repair-suggestion engine.
#[derive(Clone, Debug)]
pub struct ValidationRepairConfig {
    pub coerce_types: bool,
    pub use_defaults: bool,
    pub clamp_numbers: bool,
    pub truncate_strings: bool,
    pub truncate_arrays: bool,
    pub remove_extra_properties: bool,
    pub fix_enums: bool,
    pub fix_formats: bool,
    pub max_suggestions: usize,
}

impl Default for ValidationRepairConfig {
    fn default() -> Self {
        Self {
            coerce_types: true,
            use_defaults: true,
            clamp_numbers: true,
            truncate_strings: false,
            truncate_arrays: false,
            remove_extra_properties: true,
            fix_enums: true,
            fix_formats: true,
            max_suggestions: 50,
        }
    }
}

/// Configuration for schema inference.
#[derive(Clone, Debug)]
pub struct SchemaInferenceConfig {
    pub include_examples: bool,
    pub max_examples: usize,
    pub include_default: bool,
    pub infer_formats: bool,
    pub infer_patterns: bool,
    pub infer_numeric_ranges: bool,
    pub infer_string_lengths: bool,
    pub infer_array_lengths: bool,
    pub required_by_default: bool,
    pub strict_additional_properties: bool,
    pub prefer_integer: bool,
    pub allow_any_of: bool,
    pub include_descriptions: bool,
    pub detect_enums: bool,
    pub max_enum_values: usize,
}

impl Default for SchemaInferenceConfig {
    fn default() -> Self {
        Self {
            include_examples: false,
            max_examples: 3,
            include_default: false,
            infer_formats: true,
            infer_patterns: false,
            infer_numeric_ranges: false,
            infer_string_lengths: false,
            infer_array_lengths: false,
            required_by_default: true,
            strict_additional_properties: true,
            prefer_integer: true,
            allow_any_of: true,
            include_descriptions: false,
            detect_enums: true,
            max_enum_values: 10,
        }
    }
}
