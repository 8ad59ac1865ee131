//! SQL safety analyzer: a heuristic firewall, not a parser. Candidate
//! extraction, string/comment stripping, lightweight identifier tokenization,
//! and a policy keyword table evaluated against the derived facts.

use crate::error::Diagnostic;
use crate::value::Value;
use regex::Regex;

/// Parsed facts about one SQL statement, derived without a real grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParsed {
    pub sql: String,
    pub has_comments: bool,
    pub statement_type: String,
    pub has_where: bool,
    pub has_from: bool,
    pub has_union: bool,
    pub has_subquery: bool,
    pub has_limit: bool,
    pub limit: Option<i64>,
    pub tables: Vec<String>,
}

const RESERVED_WORDS: &[&str] = &[
    "select", "from", "where", "join", "inner", "left", "right", "full", "cross", "on", "group", "order", "by", "having", "limit",
    "offset", "union", "all", "distinct", "as", "and", "or", "not", "null", "is", "in", "like", "between", "case", "when", "then",
    "else", "end", "asc", "desc",
];

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Replace string contents and comments with spaces, lowercasing everything
/// else. Returns `(lowered_text, had_any_comments)`.
fn strip_strings_and_comments(sql: &str) -> (String, bool) {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut in_single = false;
    let mut in_double = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    let mut has_comments = false;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let n = chars.get(i + 1).copied().unwrap_or('\0');

        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
                out.push(' ');
            }
            i += 1;
            continue;
        }
        if in_block_comment {
            if c == '*' && n == '/' {
                in_block_comment = false;
                out.push(' ');
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if !in_single && !in_double {
            if c == '-' && n == '-' {
                has_comments = true;
                in_line_comment = true;
                i += 2;
                continue;
            }
            if c == '/' && n == '*' {
                has_comments = true;
                in_block_comment = true;
                i += 2;
                continue;
            }
        }

        if !in_double && c == '\'' {
            in_single = !in_single;
            out.push(' ');
            i += 1;
            continue;
        }
        if !in_single && c == '"' {
            in_double = !in_double;
            out.push(' ');
            i += 1;
            continue;
        }

        if in_single || in_double {
            out.push(' ');
        } else {
            out.extend(c.to_lowercase());
        }
        i += 1;
    }
    (out, has_comments)
}

/// Identifier-like runs over `[a-zA-Z0-9_.]+`.
fn tokenize_identifiers(lowered: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut cur = String::new();
    for c in lowered.chars() {
        if c.is_alphanumeric() || c == '_' || c == '.' {
            cur.push(c);
        } else if !cur.is_empty() {
            tokens.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        tokens.push(cur);
    }
    tokens
}

/// Byte offset of the first statement-terminating `;` outside strings and
/// comments, or `None` if the buffer has no complete statement yet.
pub fn find_statement_terminator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        let n = bytes.get(i + 1).copied().unwrap_or(0);

        if in_line_comment {
            if c == b'\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }
        if in_block_comment {
            if c == b'*' && n == b'/' {
                in_block_comment = false;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if !in_single && !in_double {
            if c == b'-' && n == b'-' {
                in_line_comment = true;
                i += 2;
                continue;
            }
            if c == b'/' && n == b'*' {
                in_block_comment = true;
                i += 2;
                continue;
            }
        }

        if !in_double && c == b'\'' && !(i > 0 && bytes[i - 1] == b'\\') {
            in_single = !in_single;
            i += 1;
            continue;
        }
        if !in_single && c == b'"' && !(i > 0 && bytes[i - 1] == b'\\') {
            in_double = !in_double;
            i += 1;
            continue;
        }

        if !in_single && !in_double && c == b';' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Extract a SQL candidate: a closed ```` ```sql ```` fenced block if present,
/// else the whole text unchanged.
pub fn extract_sql_candidate(text: &str) -> String {
    let mut in_fence = false;
    let mut body = String::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        let lower = trimmed.to_ascii_lowercase();
        if !in_fence {
            if lower.starts_with("```sql") {
                in_fence = true;
                body.clear();
            }
        } else if lower.starts_with("```") {
            if body.ends_with('\n') {
                body.pop();
            }
            return body;
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    text.to_string()
}

/// Parse `sql_statement` (already a single statement, e.g. from
/// [`find_statement_terminator`]) into its derived facts.
fn parse_sql_statement(sql_statement: &str) -> SqlParsed {
    let (lowered, has_comments) = strip_strings_and_comments(sql_statement);
    let tokens = tokenize_identifiers(&lowered);
    let statement_type = tokens.first().cloned().unwrap_or_default();

    let has_where = lowered.contains(" where ") || lowered.trim_start().starts_with("where");
    let has_from = lowered.contains(" from ");
    let has_union = lowered.contains(" union ");
    let has_subquery = Regex::new(r"\(\s*select\b").unwrap().is_match(&lowered);

    let limit_re = Regex::new(r"\blimit\s+(\d+)").unwrap();
    let (has_limit, limit) = match limit_re.captures(&lowered) {
        Some(caps) => (true, caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok())),
        None => (false, None),
    };

    let mut tables = Vec::new();
    let mut i = 0usize;
    while i < tokens.len() {
        let tok = tokens[i].as_str();
        let mut idx = i;
        let starts_clause = if matches!(tok, "left" | "right" | "inner") {
            if tokens.get(i + 1).map(String::as_str) == Some("join") {
                idx = i + 1;
                true
            } else {
                false
            }
        } else {
            tok == "from" || tok == "join"
        };
        if starts_clause
            && let Some(next) = tokens.get(idx + 1) {
                let table = next.split('.').next_back().unwrap_or(next);
                if !table.is_empty() {
                    tables.push(table.to_string());
                }
            }
        i += 1;
    }

    SqlParsed {
        sql: sql_statement.to_string(),
        has_comments,
        statement_type,
        has_where,
        has_from,
        has_union,
        has_subquery,
        has_limit,
        limit,
        tables,
    }
}

/// Extract the candidate statement from `text` and parse it into its facts.
pub fn parse_sql(text: &str) -> SqlParsed {
    parse_sql_statement(&extract_sql_candidate(text))
}

struct Analysis {
    join_types: std::collections::HashSet<String>,
    join_count: usize,
    called_functions: std::collections::HashSet<String>,
    qualified_columns: Vec<(String, String)>,
    unqualified_columns: std::collections::HashSet<String>,
    has_qmark_placeholders: bool,
    has_dollar_placeholders: bool,
    has_or_true_pattern: bool,
}

fn normalize_table(t: &str) -> String {
    t.split('.').next_back().unwrap_or(t).to_string()
}

fn analyze_safety(lowered: &str) -> Analysis {
    let tokens = tokenize_identifiers(lowered);
    let mut alias_to_table = std::collections::HashMap::new();
    let mut join_types = std::collections::HashSet::new();
    let mut join_count = 0usize;

    let mut i = 0usize;
    while i < tokens.len() {
        if tokens[i] == "join" {
            join_count += 1;
            let jt = if i > 0 && matches!(tokens[i - 1].as_str(), "left" | "right" | "inner" | "full" | "cross") {
                tokens[i - 1].clone()
            } else {
                "join".to_string()
            };
            join_types.insert(jt);
        }

        let mut idx = i;
        let mut is_from_or_join = tokens[i] == "from" || tokens[i] == "join";
        if !is_from_or_join && matches!(tokens[i].as_str(), "left" | "right" | "inner" | "full" | "cross") && tokens.get(i + 1).map(String::as_str) == Some("join") {
            is_from_or_join = true;
            idx = i + 1;
        }

        if is_from_or_join
            && let Some(raw) = tokens.get(idx + 1) {
                let table = normalize_table(raw);
                if !table.is_empty() {
                    alias_to_table.insert(table.clone(), table.clone());
                    let mut j = idx + 2;
                    if tokens.get(j).map(String::as_str) == Some("as") {
                        j += 1;
                    }
                    if let Some(alias) = tokens.get(j)
                        && !alias.is_empty() && !is_reserved(alias) {
                            alias_to_table.insert(alias.clone(), table);
                        }
                }
            }
        i += 1;
    }

    let call_re = Regex::new(r"\b([a-z_][a-z0-9_]*)\s*\(").unwrap();
    let called_functions: std::collections::HashSet<String> = call_re
        .captures_iter(lowered)
        .map(|c| c[1].to_string())
        .filter(|fname| !is_reserved(fname))
        .collect();

    let col_re = Regex::new(r"\b([a-z_][a-z0-9_]*)\s*\.\s*([a-z_][a-z0-9_]*)\b").unwrap();
    let qualified_columns: Vec<(String, String)> = col_re
        .captures_iter(lowered)
        .filter_map(|c| {
            let lhs = c[1].to_string();
            let col = c[2].to_string();
            alias_to_table.get(&lhs).map(|table| (table.clone(), col))
        })
        .collect();

    let select_part = Regex::new(r"(?s)\bselect\b(.*?)(\bfrom\b|$)")
        .unwrap()
        .captures(lowered)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let where_part = Regex::new(r"(?s)\bwhere\b(.*?)(\border\s+by\b|\blimit\b|$)")
        .unwrap()
        .captures(lowered)
        .map(|c| c[1].to_string())
        .unwrap_or_default();

    let unqualified_re = Regex::new(r"\b([a-z_][a-z0-9_]*)\b\s*(=|<>|!=|<=|>=|<|>|\blike\b|\bin\b|\bis\b)").unwrap();
    let mut unqualified_columns = std::collections::HashSet::new();
    for part in [&select_part, &where_part] {
        for caps in unqualified_re.captures_iter(part) {
            let col = caps[1].to_string();
            if !is_reserved(&col) {
                unqualified_columns.insert(col);
            }
        }
    }

    Analysis {
        join_types,
        join_count,
        called_functions,
        qualified_columns,
        unqualified_columns,
        has_qmark_placeholders: lowered.contains('?'),
        has_dollar_placeholders: Regex::new(r"\$\d+").unwrap().is_match(lowered),
        has_or_true_pattern: Regex::new(r"\bor\b\s*1\s*=\s*1\b").unwrap().is_match(lowered) || Regex::new(r"\bor\b\s*true\b").unwrap().is_match(lowered),
    }
}

fn string_list(policy: &Value, key: &str) -> Vec<String> {
    policy
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn policy_bool(policy: &Value, key: &str) -> bool {
    policy.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn list_contains_ci(items: &[String], needle: &str) -> bool {
    items.iter().any(|it| it.eq_ignore_ascii_case(needle))
}

fn where_part(lowered: &str) -> String {
    Regex::new(r"(?s)\bwhere\b(.*?)(\border\s+by\b|\blimit\b|$)")
        .unwrap()
        .captures(lowered)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

/// Evaluate `parsed` against `policy` (a plain schema-like [`Value`]),
/// returning the first violated rule as a [`Diagnostic`].
pub fn validate_sql(parsed: &SqlParsed, policy: &Value) -> Result<(), Diagnostic> {
    let (lowered, _) = strip_strings_and_comments(&parsed.sql);
    let analysis = analyze_safety(&lowered);

    if policy_bool(policy, "forbidComments") && parsed.has_comments {
        return Err(Diagnostic::schema("$.comments", "SQL comments forbidden"));
    }
    if policy_bool(policy, "forbidSemicolon") && parsed.sql.contains(';') {
        return Err(Diagnostic::schema("$.semicolon", "SQL semicolon forbidden"));
    }

    let allowed_statements = string_list(policy, "allowedStatements");
    if !allowed_statements.is_empty() && !list_contains_ci(&allowed_statements, &parsed.statement_type) {
        return Err(Diagnostic::schema("$.statementType", format!("statement type not allowed: {}", parsed.statement_type)));
    }

    for kw in string_list(policy, "forbidKeywords") {
        let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&kw))).unwrap();
        if re.is_match(&lowered) {
            return Err(Diagnostic::schema(format!("$.keywords[{kw}]"), format!("forbidden keyword: {kw}")));
        }
    }

    if policy_bool(policy, "requireFrom") && !parsed.has_from {
        return Err(Diagnostic::schema("$.from", "FROM required"));
    }
    if policy_bool(policy, "requireWhere") && !parsed.has_where {
        return Err(Diagnostic::schema("$.where", "WHERE required"));
    }
    if policy_bool(policy, "requireLimit") && !parsed.has_limit {
        return Err(Diagnostic::schema("$.limit", "LIMIT required"));
    }
    if policy_bool(policy, "forbidUnion") && parsed.has_union {
        return Err(Diagnostic::schema("$.union", "UNION forbidden"));
    }
    if policy_bool(policy, "forbidSubqueries") && parsed.has_subquery {
        return Err(Diagnostic::schema("$.subquery", "subqueries forbidden"));
    }

    if let Some(max_limit) = policy.get("maxLimit").and_then(Value::as_f64)
        && let Some(limit) = parsed.limit
            && (limit as f64) > max_limit {
                return Err(Diagnostic::schema("$.limit", "LIMIT exceeds maxLimit"));
            }

    if policy_bool(policy, "forbidSelectStar") && Regex::new(r"\bselect\s*\*").unwrap().is_match(&lowered) {
        return Err(Diagnostic::schema("$.selectStar", "SELECT * forbidden"));
    }

    let forbid_schemas = string_list(policy, "forbidSchemas");
    if !forbid_schemas.is_empty() {
        for tok in tokenize_identifiers(&lowered) {
            if let Some((schema_name, _)) = tok.split_once('.')
                && list_contains_ci(&forbid_schemas, schema_name) {
                    return Err(Diagnostic::schema(format!("$.schema[{schema_name}]"), format!("schema forbidden: {schema_name}")));
                }
        }
    }

    if policy_bool(policy, "forbidCrossJoin") && Regex::new(r"\bcross\s+join\b").unwrap().is_match(&lowered) {
        return Err(Diagnostic::schema("$.joins.cross", "CROSS JOIN forbidden"));
    }

    if let Some(max_joins) = policy.get("maxJoins").and_then(Value::as_f64)
        && analysis.join_count as f64 > max_joins {
            return Err(Diagnostic::schema("$.joins.count", "JOIN count exceeds maxJoins"));
        }
    let allowed_joins = string_list(policy, "allowedJoinTypes");
    if !allowed_joins.is_empty() {
        for jt in &analysis.join_types {
            if !list_contains_ci(&allowed_joins, jt) {
                return Err(Diagnostic::schema(format!("$.joins.types[{jt}]"), format!("JOIN type not allowed: {jt}")));
            }
        }
    }

    if policy_bool(policy, "forbidOrTrue") && analysis.has_or_true_pattern {
        return Err(Diagnostic::schema("$.where.orTrue", "OR-true pattern forbidden"));
    }

    if let Some(style) = policy.get("placeholderStyle").and_then(Value::as_str) {
        match style.to_ascii_lowercase().as_str() {
            "qmark" if analysis.has_dollar_placeholders => {
                return Err(Diagnostic::schema("$.placeholders", "dollar placeholders forbidden (expected ?)"));
            }
            "dollar" if analysis.has_qmark_placeholders => {
                return Err(Diagnostic::schema("$.placeholders", "qmark placeholders forbidden (expected $1)"));
            }
            _ => {}
        }
    }

    match policy.get("forbidFunctions") {
        Some(Value::Bool(true)) if !analysis.called_functions.is_empty() => {
            return Err(Diagnostic::schema("$.functions", "function calls forbidden"));
        }
        Some(Value::Array(_)) => {
            let forbid = string_list(policy, "forbidFunctions");
            for fname in &analysis.called_functions {
                if list_contains_ci(&forbid, fname) {
                    return Err(Diagnostic::schema(format!("$.functions[{fname}]"), format!("function forbidden: {fname}")));
                }
            }
        }
        _ => {}
    }

    if policy_bool(policy, "forbidSelectWithoutLimit") && parsed.statement_type.eq_ignore_ascii_case("select") && !parsed.has_limit {
        return Err(Diagnostic::schema("$.limit", "SELECT without LIMIT forbidden"));
    }
    if policy_bool(policy, "requireOrderBy") && !Regex::new(r"\border\s+by\b").unwrap().is_match(&lowered) {
        return Err(Diagnostic::schema("$.orderBy", "ORDER BY required"));
    }

    let allowed_tables = string_list(policy, "allowedTables");
    if !allowed_tables.is_empty() {
        for t in &parsed.tables {
            if !list_contains_ci(&allowed_tables, t) {
                return Err(Diagnostic::schema(format!("$.tables[{t}]"), format!("table not allowed: {t}")));
            }
        }
    }

    if let Some(allowed_columns) = policy.get("allowedColumns").and_then(Value::as_object) {
        let mut allowed: std::collections::HashMap<String, std::collections::HashSet<String>> = std::collections::HashMap::new();
        for (table, cols) in allowed_columns {
            if let Some(cols) = cols.as_array() {
                let set: std::collections::HashSet<String> = cols.iter().filter_map(Value::as_str).map(str::to_ascii_lowercase).collect();
                allowed.insert(table.to_ascii_lowercase(), set);
            }
        }

        for (table, col) in &analysis.qualified_columns {
            let known = allowed.get(table).is_some_and(|cols| cols.contains(col));
            if !known {
                return Err(Diagnostic::schema(format!("$.columns[{table}.{col}]"), format!("column not allowed: {table}.{col}")));
            }
        }

        if !policy_bool(policy, "allowUnqualifiedColumns") {
            let union_allowed: std::collections::HashSet<&String> = allowed.values().flatten().collect();
            for col in &analysis.unqualified_columns {
                if !union_allowed.contains(col) {
                    return Err(Diagnostic::schema(format!("$.columns[{col}]"), format!("unqualified column not allowed: {col}")));
                }
            }
        }
    }

    let forbid_tables = string_list(policy, "forbidTables");
    if !forbid_tables.is_empty() {
        for t in &parsed.tables {
            if list_contains_ci(&forbid_tables, t) {
                return Err(Diagnostic::schema(format!("$.tables[{t}]"), format!("table forbidden: {t}")));
            }
        }
    }

    let require_where_columns = string_list(policy, "requireWhereColumns");
    if !require_where_columns.is_empty() {
        let where_text = where_part(&lowered);
        for col in &require_where_columns {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(col))).unwrap();
            if !re.is_match(&where_text) {
                return Err(Diagnostic::schema("$.where", format!("WHERE must mention column: {col}")));
            }
        }
    }

    if let Some(patterns) = policy.get("requireWherePatterns").and_then(Value::as_array) {
        let where_text = where_part(&lowered);
        for pat in patterns.iter().filter_map(Value::as_str) {
            let re = Regex::new(&format!("(?i){pat}")).map_err(|e| Diagnostic::schema("$.where", format!("invalid requireWherePatterns entry: {e}")))?;
            if !re.is_match(&where_text) {
                return Err(Diagnostic::schema("$.where", "WHERE does not match required pattern"));
            }
        }
    }

    Ok(())
}

/// Parse and validate `text` against `policy` in one step.
pub fn parse_and_validate(text: &str, policy: &Value) -> Result<SqlParsed, Diagnostic> {
    let parsed = parse_sql(text);
    validate_sql(&parsed, policy)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn policy_from(pairs: &[(&str, Value)]) -> Value {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn extracts_statement_type_and_tables() {
        let parsed = parse_sql("SELECT id FROM users WHERE id = 1 LIMIT 1");
        assert_eq!(parsed.statement_type, "select");
        assert!(parsed.has_where);
        assert!(parsed.has_limit);
        assert_eq!(parsed.limit, Some(1));
        assert_eq!(parsed.tables, vec!["users".to_string()]);
    }

    #[test]
    fn full_policy_chain_succeeds() {
        let policy = policy_from(&[
            ("allowedStatements", Value::Array(vec![Value::String("select".into())])),
            ("requireWhere", Value::Bool(true)),
            ("requireLimit", Value::Bool(true)),
            ("maxLimit", Value::Number(10.0)),
            ("forbidUnion", Value::Bool(true)),
            ("requireOrderBy", Value::Bool(true)),
            ("forbidSelectStar", Value::Bool(true)),
            ("allowedTables", Value::Array(vec![Value::String("users".into())])),
        ]);
        let result = parse_and_validate("SELECT id FROM users WHERE id = 1 ORDER BY id DESC LIMIT 1", &policy);
        assert!(result.is_ok());
    }

    #[test]
    fn or_true_with_dollar_placeholder_is_flagged() {
        let policy = policy_from(&[("placeholderStyle", Value::String("dollar".into())), ("forbidOrTrue", Value::Bool(true))]);
        let err = parse_and_validate("SELECT id FROM users WHERE id = $1 OR 1=1 LIMIT 1", &policy).unwrap_err();
        assert_eq!(err.path, "$.where.orTrue");
    }

    #[test]
    fn qmark_forbidden_when_dollar_style_required() {
        let policy = policy_from(&[("placeholderStyle", Value::String("dollar".into()))]);
        let err = parse_and_validate("SELECT id FROM users WHERE id = ?", &policy).unwrap_err();
        assert_eq!(err.path, "$.placeholders");
    }

    #[test]
    fn disallowed_table_is_flagged() {
        let policy = policy_from(&[("allowedTables", Value::Array(vec![Value::String("orders".into())]))]);
        let err = parse_and_validate("SELECT id FROM users", &policy).unwrap_err();
        assert_eq!(err.path, "$.tables[users]");
    }

    #[test]
    fn forbidden_keyword_is_detected() {
        let policy = policy_from(&[("forbidKeywords", Value::Array(vec![Value::String("drop".into())]))]);
        let err = parse_and_validate("DROP TABLE users", &policy).unwrap_err();
        assert_eq!(err.path, "$.keywords[drop]");
    }

    #[test]
    fn fenced_sql_block_is_extracted() {
        let text = "run this:\n```sql\nSELECT 1;\n```\nthanks";
        let candidate = extract_sql_candidate(text);
        assert_eq!(candidate.trim(), "SELECT 1;");
    }

    #[test]
    fn statement_terminator_ignores_semicolons_in_strings() {
        let text = "SELECT ';' FROM t; SELECT 2;";
        let end = find_statement_terminator(text).unwrap();
        assert_eq!(&text[..end], "SELECT ';' FROM t");
    }

    #[test]
    fn comments_are_stripped_and_detected() {
        let parsed = parse_sql("SELECT 1 -- comment\nFROM t");
        assert!(parsed.has_comments);
        assert!(parsed.has_from);
    }

    #[test]
    fn qualified_column_not_in_allow_list_is_rejected() {
        let mut cols = IndexMap::new();
        cols.insert("users".to_string(), Value::Array(vec![Value::String("id".into())]));
        let policy = policy_from(&[("allowedColumns", Value::Object(cols))]);
        let err = parse_and_validate("SELECT u.name FROM users u", &policy).unwrap_err();
        assert_eq!(err.path, "$.columns[users.name]");
    }
}
