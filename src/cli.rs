//! `llm-structured-cli` front end: reads stdin or a file, extracts +
//! repairs + parses (or parses a SQL statement), optionally validates
//! against a schema/policy file, and prints a JSON summary.
//!
//! Arguments are parsed by hand from `std::env::args()`, the same style as
//! the teacher's own `cli.rs` — no `clap` dependency.

use crate::error::Diagnostic;
use crate::options::{DuplicateKeyPolicy, RepairConfig};
use crate::value::Value;
use crate::{extract, parser, repair, schema, sql};
use std::fs;
use std::io::{self, Read};

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} <json|sql> [OPTIONS]\n\
         \n\
         Reads stdin, or --input FILE if given.\n\
         \n\
         Options:\n\
           --schema FILE              Validate against the schema/policy in FILE\n\
           --input FILE               Read input from FILE instead of stdin\n\
           --collect-all              Collect every validation diagnostic (JSON mode only)\n\
           --duplicate-key-policy P   error|first-wins|last-wins (default first-wins)\n\
           -h, --help                 Show this help\n",
        prog = program
    );
}

struct Args {
    mode: Mode,
    schema_path: Option<String>,
    input_path: Option<String>,
    collect_all: bool,
    duplicate_key_policy: DuplicateKeyPolicy,
}

enum Mode {
    Json,
    Sql,
}

fn parse_args() -> Result<Args, i32> {
    let mut raw: Vec<String> = std::env::args().collect();
    let program = raw.first().cloned().unwrap_or_else(|| "llm-structured-cli".to_string());
    raw.remove(0);

    if raw.first().map(String::as_str) == Some("-h") || raw.first().map(String::as_str) == Some("--help") {
        print_help(&program);
        return Err(0);
    }

    let Some(mode_arg) = raw.first().cloned() else {
        eprintln!("missing required <json|sql> mode argument");
        print_help(&program);
        return Err(2);
    };
    let mode = match mode_arg.as_str() {
        "json" => Mode::Json,
        "sql" => Mode::Sql,
        other => {
            eprintln!("unknown mode: {other} (expected json or sql)");
            return Err(2);
        }
    };
    raw.remove(0);

    let mut schema_path = None;
    let mut input_path = None;
    let mut collect_all = false;
    let mut duplicate_key_policy = DuplicateKeyPolicy::FirstWins;

    let mut i = 0usize;
    while i < raw.len() {
        match raw[i].as_str() {
            "--schema" => {
                i += 1;
                let Some(v) = raw.get(i) else {
                    eprintln!("missing FILE for --schema");
                    return Err(2);
                };
                schema_path = Some(v.clone());
            }
            "--input" => {
                i += 1;
                let Some(v) = raw.get(i) else {
                    eprintln!("missing FILE for --input");
                    return Err(2);
                };
                input_path = Some(v.clone());
            }
            "--collect-all" => collect_all = true,
            "--duplicate-key-policy" => {
                i += 1;
                let Some(v) = raw.get(i) else {
                    eprintln!("missing POLICY for --duplicate-key-policy");
                    return Err(2);
                };
                duplicate_key_policy = match v.as_str() {
                    "error" => DuplicateKeyPolicy::Error,
                    "first-wins" => DuplicateKeyPolicy::FirstWins,
                    "last-wins" => DuplicateKeyPolicy::LastWins,
                    other => {
                        eprintln!("unknown duplicate-key-policy: {other}");
                        return Err(2);
                    }
                };
            }
            "-h" | "--help" => {
                print_help(&program);
                return Err(0);
            }
            other => {
                eprintln!("unknown option: {other}");
                return Err(2);
            }
        }
        i += 1;
    }

    Ok(Args {
        mode,
        schema_path,
        input_path,
        collect_all,
        duplicate_key_policy,
    })
}

fn read_input(path: &Option<String>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            Ok(s)
        }
    }
}

fn parse_schema_file(path: &str) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("reading schema file {path}: {e}"))?;
    let (repaired, meta) = repair::repair(&text, &RepairConfig::default());
    parser::parse(&repaired, true, meta.duplicate_key_policy)
        .map(|(v, _)| v)
        .map_err(|e| format!("parsing schema file {path}: {e}"))
}

fn diagnostic_summary(d: &Diagnostic) -> Value {
    let mut map = indexmap::IndexMap::new();
    map.insert("message".to_string(), Value::String(d.message.clone()));
    map.insert("path".to_string(), Value::String(d.path.clone()));
    map.insert("kind".to_string(), Value::String(d.kind.to_string()));
    map.insert("jsonPointer".to_string(), Value::String(d.json_pointer()));
    Value::Object(map)
}

/// Either a printable summary with its exit code, or a hard failure (nothing
/// to print, e.g. unreadable input or unparseable schema file).
fn run_json(args: &Args) -> Result<(Value, i32), i32> {
    let text = read_input(&args.input_path).map_err(|e| {
        eprintln!("reading input: {e}");
        1
    })?;

    let candidate = extract::extract_json_candidate(&text).map_err(|e| {
        eprintln!("{e}");
        1
    })?;

    let config = RepairConfig {
        duplicate_key_policy: args.duplicate_key_policy,
        ..RepairConfig::default()
    };
    let (repaired, meta) = repair::repair(&candidate, &config);
    let (value, _) = parser::parse(&repaired, config.allow_single_quotes, meta.duplicate_key_policy).map_err(|e| {
        eprintln!("{e}");
        1
    })?;

    let mut summary = indexmap::IndexMap::new();
    summary.insert("value".to_string(), value.clone());
    let mut exit_code = 0;

    if let Some(schema_path) = &args.schema_path {
        let schema_value = parse_schema_file(schema_path).map_err(|e| {
            eprintln!("{e}");
            2
        })?;

        if args.collect_all {
            let diagnostics = schema::validate_all(&value, &schema_value);
            let valid = diagnostics.is_empty();
            summary.insert("valid".to_string(), Value::Bool(valid));
            summary.insert("diagnostics".to_string(), Value::Array(diagnostics.iter().map(diagnostic_summary).collect()));
            if !valid {
                exit_code = 1;
            }
        } else {
            match schema::validate(&value, &schema_value) {
                Ok(()) => {
                    summary.insert("valid".to_string(), Value::Bool(true));
                }
                Err(d) => {
                    summary.insert("valid".to_string(), Value::Bool(false));
                    summary.insert("diagnostics".to_string(), Value::Array(vec![diagnostic_summary(&d)]));
                    exit_code = 1;
                }
            }
        }
    }

    Ok((Value::Object(summary), exit_code))
}

fn run_sql(args: &Args) -> Result<(Value, i32), i32> {
    let text = read_input(&args.input_path).map_err(|e| {
        eprintln!("reading input: {e}");
        1
    })?;

    let parsed = sql::parse_sql(&text);
    let mut summary = indexmap::IndexMap::new();
    summary.insert("statementType".to_string(), Value::String(parsed.statement_type.clone()));
    summary.insert("tables".to_string(), Value::Array(parsed.tables.iter().map(|t| Value::String(t.clone())).collect()));
    let mut exit_code = 0;

    if let Some(policy_path) = &args.schema_path {
        let policy = parse_schema_file(policy_path).map_err(|e| {
            eprintln!("{e}");
            2
        })?;
        match sql::validate_sql(&parsed, &policy) {
            Ok(()) => {
                summary.insert("valid".to_string(), Value::Bool(true));
            }
            Err(d) => {
                summary.insert("valid".to_string(), Value::Bool(false));
                summary.insert("diagnostics".to_string(), Value::Array(vec![diagnostic_summary(&d)]));
                exit_code = 1;
            }
        }
    }

    Ok((Value::Object(summary), exit_code))
}

/// Parse CLI arguments, run the requested mode, print its JSON summary to
/// stdout, and return the process exit code (0 success, 1 validation or
/// runtime failure, 2 usage error).
pub fn run() -> i32 {
    let args = match parse_args() {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = match args.mode {
        Mode::Json => run_json(&args),
        Mode::Sql => run_sql(&args),
    };

    match result {
        Ok((summary, code)) => {
            println!("{}", summary.dumps_json());
            code
        }
        Err(code) => code,
    }
}
