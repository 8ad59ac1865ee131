//! Schema validation, defaults, repair-suggestion, and pointer derivation.

pub mod pointer;
pub mod validator;
pub mod defaults;
pub mod repair_suggest;

pub use validator::{validate, validate_all};
pub use defaults::apply_defaults;
pub use repair_suggest::{validate_with_repair, RepairSuggestion, ValidationRepairResult};
