//! Streaming incremental engine: grow-only byte buffers wrapped in
//! four JSON state machines plus a SQL counterpart, all sharing the same
//! `append`/`poll`/`location` contract.

use crate::error::Diagnostic;
use crate::extract;
use crate::options::RepairConfig;
use crate::parser;
use crate::schema::{apply_defaults, validate};
use crate::sql::{self, SqlParsed};
use crate::value::Value;

/// Outcome of a single `poll()`. A not-yet-ready poll is
/// `{done:false, ok:false, value:None, error:None}`.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamOutcome<T> {
    pub done: bool,
    pub ok: bool,
    pub value: Option<T>,
    pub error: Option<Diagnostic>,
}

impl<T> StreamOutcome<T> {
    fn pending() -> Self {
        Self { done: false, ok: false, value: None, error: None }
    }

    fn ok(done: bool, value: T) -> Self {
        Self { done, ok: true, value: Some(value), error: None }
    }

    fn err(diagnostic: Diagnostic) -> Self {
        Self { done: true, ok: false, value: None, error: Some(diagnostic) }
    }
}

/// `{offset, line, col}`, recomputed from the live buffer on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

fn locate(buf: &str) -> StreamLocation {
    let newlines = buf.matches('\n').count();
    let col = match buf.rfind('\n') {
        Some(pos) => buf[pos + 1..].chars().count() + 1,
        None => buf.chars().count() + 1,
    };
    StreamLocation { offset: buf.len(), line: 1 + newlines, col }
}

fn buffer_limit_error(buf_len: usize, max: usize) -> Diagnostic {
    Diagnostic::limit("$.stream.maxBufferBytes", format!("size={buf_len}, max={max}"))
}

fn items_limit_error(count: usize, max: usize) -> Diagnostic {
    Diagnostic::limit("$.stream.maxItems", format!("items={count}, max={max}"))
}

/// Emit a `tracing::debug!` event when a stream state machine transitions
/// into its terminal `done` state. A no-op when the `logging` feature is off.
#[cfg(feature = "logging")]
fn log_transition(machine: &str, outcome: &str) {
    tracing::debug!(machine, outcome, "stream reached done state");
}

#[cfg(not(feature = "logging"))]
fn log_transition(_machine: &str, _outcome: &str) {}

fn parse_and_validate(candidate: &str, schema: &Value) -> Result<Value, Diagnostic> {
    let (repaired, meta) = crate::repair::repair(candidate, &RepairConfig::default());
    let (value, _) = parser::parse(&repaired, true, meta.duplicate_key_policy)
        .map_err(|e| Diagnostic::parse("$", e.to_string()))?;
    validate(&value, schema)?;
    Ok(value)
}

/// Single-value streaming parser: extracts one candidate from the whole
/// buffer, parses and validates it, and caches the terminal outcome.
pub struct JsonStreamParser {
    schema: Value,
    buf: String,
    max_buffer_bytes: usize,
    finished: bool,
    done: bool,
    last: StreamOutcome<Value>,
}

impl JsonStreamParser {
    pub fn new(schema: Value) -> Self {
        Self::with_max_buffer_bytes(schema, usize::MAX)
    }

    pub fn with_max_buffer_bytes(schema: Value, max_buffer_bytes: usize) -> Self {
        Self { schema, buf: String::new(), max_buffer_bytes, finished: false, done: false, last: StreamOutcome::pending() }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.finished = false;
        self.done = false;
        self.last = StreamOutcome::pending();
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn append(&mut self, chunk: &str) {
        if self.done {
            return;
        }
        self.buf.push_str(chunk);
        if self.buf.len() > self.max_buffer_bytes {
            self.done = true;
            log_transition("JsonStreamParser", "err");
            self.last = StreamOutcome::err(buffer_limit_error(self.buf.len(), self.max_buffer_bytes));
        }
    }

    pub fn poll(&mut self) -> StreamOutcome<Value> {
        if self.done {
            return self.last.clone();
        }
        match extract::extract_json_candidate_streaming(&self.buf) {
            Some(candidate) => match parse_and_validate(&candidate, &self.schema) {
                Ok(value) => {
                    self.done = true;
                    log_transition("JsonStreamParser", "ok");
                    self.last = StreamOutcome::ok(true, value);
                }
                Err(diag) => {
                    self.done = true;
                    log_transition("JsonStreamParser", "err");
                    self.last = StreamOutcome::err(diag);
                }
            },
            None => {
                if self.finished {
                    self.done = true;
                    log_transition("JsonStreamParser", "err");
                    self.last = StreamOutcome::err(Diagnostic::parse("$.stream.incomplete", "stream finished with an incomplete value"));
                }
            }
        }
        self.last.clone()
    }

    pub fn location(&self) -> StreamLocation {
        locate(&self.buf)
    }
}

/// Shared pop-loop: drain complete candidates from the head of `buf`,
/// parse+validate each, stopping at the first failure.
fn drain_items(buf: &mut String, schema: &Value, items: &mut Vec<Value>, max_items: usize) -> Option<Diagnostic> {
    while let Some((candidate, consumed)) = extract::pop_next_json_candidate(buf) {
        buf.drain(..consumed);
        match parse_and_validate(&candidate, schema) {
            Ok(value) => {
                items.push(value);
                if items.len() > max_items {
                    return Some(items_limit_error(items.len(), max_items));
                }
            }
            Err(diag) => return Some(diag),
        }
    }
    None
}

/// Collects every item from the stream, emitting the full array only once
/// `close()` has been called and the buffer is fully drained.
pub struct JsonStreamCollector {
    schema: Value,
    buf: String,
    max_buffer_bytes: usize,
    max_items: usize,
    closed: bool,
    done: bool,
    items: Vec<Value>,
    last: StreamOutcome<Vec<Value>>,
}

impl JsonStreamCollector {
    pub fn new(item_schema: Value) -> Self {
        Self::with_limits(item_schema, usize::MAX, usize::MAX)
    }

    pub fn with_limits(item_schema: Value, max_buffer_bytes: usize, max_items: usize) -> Self {
        Self {
            schema: item_schema,
            buf: String::new(),
            max_buffer_bytes,
            max_items,
            closed: false,
            done: false,
            items: Vec::new(),
            last: StreamOutcome::pending(),
        }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.closed = false;
        self.done = false;
        self.items.clear();
        self.last = StreamOutcome::pending();
    }

    pub fn append(&mut self, chunk: &str) {
        if self.done {
            return;
        }
        self.buf.push_str(chunk);
        if self.buf.len() > self.max_buffer_bytes {
            self.done = true;
            log_transition("JsonStreamCollector", "err");
            self.last = StreamOutcome::err(buffer_limit_error(self.buf.len(), self.max_buffer_bytes));
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn poll(&mut self) -> StreamOutcome<Vec<Value>> {
        if self.done {
            return self.last.clone();
        }
        if let Some(diag) = drain_items(&mut self.buf, &self.schema, &mut self.items, self.max_items) {
            self.done = true;
            log_transition("JsonStreamCollector", "err");
            self.last = StreamOutcome::err(diag);
            return self.last.clone();
        }
        if self.closed {
            self.done = true;
            log_transition("JsonStreamCollector", "ok");
            self.last = StreamOutcome::ok(true, self.items.clone());
        }
        self.last.clone()
    }

    pub fn location(&self) -> StreamLocation {
        locate(&self.buf)
    }
}

/// Like [`JsonStreamCollector`], but each `poll()` emits only the items
/// parsed since the previous poll.
pub struct JsonStreamBatchCollector {
    schema: Value,
    buf: String,
    max_buffer_bytes: usize,
    max_items: usize,
    emitted_items: usize,
    closed: bool,
    done: bool,
    last: StreamOutcome<Vec<Value>>,
    items: Vec<Value>,
}

impl JsonStreamBatchCollector {
    pub fn new(item_schema: Value) -> Self {
        Self::with_limits(item_schema, usize::MAX, usize::MAX)
    }

    pub fn with_limits(item_schema: Value, max_buffer_bytes: usize, max_items: usize) -> Self {
        Self {
            schema: item_schema,
            buf: String::new(),
            max_buffer_bytes,
            max_items,
            emitted_items: 0,
            closed: false,
            done: false,
            last: StreamOutcome::pending(),
            items: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.emitted_items = 0;
        self.closed = false;
        self.done = false;
        self.items.clear();
        self.last = StreamOutcome::pending();
    }

    pub fn append(&mut self, chunk: &str) {
        if self.done {
            return;
        }
        self.buf.push_str(chunk);
        if self.buf.len() > self.max_buffer_bytes {
            self.done = true;
            log_transition("JsonStreamBatchCollector", "err");
            self.last = StreamOutcome::err(buffer_limit_error(self.buf.len(), self.max_buffer_bytes));
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn poll(&mut self) -> StreamOutcome<Vec<Value>> {
        if self.done {
            return self.last.clone();
        }
        if let Some(diag) = drain_items(&mut self.buf, &self.schema, &mut self.items, self.max_items) {
            self.done = true;
            log_transition("JsonStreamBatchCollector", "err");
            self.last = StreamOutcome::err(diag);
            return self.last.clone();
        }
        let new_items: Vec<Value> = self.items[self.emitted_items..].to_vec();
        self.emitted_items = self.items.len();
        if !new_items.is_empty() {
            self.last = StreamOutcome::ok(false, new_items);
            return self.last.clone();
        }
        if self.closed {
            self.done = true;
            log_transition("JsonStreamBatchCollector", "ok");
            self.last = StreamOutcome::ok(true, Vec::new());
            return self.last.clone();
        }
        self.last = StreamOutcome::pending();
        self.last.clone()
    }

    pub fn location(&self) -> StreamLocation {
        locate(&self.buf)
    }
}

/// Like [`JsonStreamBatchCollector`], but applies schema defaults to each
/// item before validating it.
pub struct JsonStreamValidatedBatchCollector {
    schema: Value,
    buf: String,
    max_buffer_bytes: usize,
    max_items: usize,
    emitted_items: usize,
    closed: bool,
    done: bool,
    last: StreamOutcome<Vec<Value>>,
    items: Vec<Value>,
}

impl JsonStreamValidatedBatchCollector {
    pub fn new(item_schema: Value) -> Self {
        Self::with_limits(item_schema, usize::MAX, usize::MAX)
    }

    pub fn with_limits(item_schema: Value, max_buffer_bytes: usize, max_items: usize) -> Self {
        Self {
            schema: item_schema,
            buf: String::new(),
            max_buffer_bytes,
            max_items,
            emitted_items: 0,
            closed: false,
            done: false,
            last: StreamOutcome::pending(),
            items: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.emitted_items = 0;
        self.closed = false;
        self.done = false;
        self.items.clear();
        self.last = StreamOutcome::pending();
    }

    pub fn append(&mut self, chunk: &str) {
        if self.done {
            return;
        }
        self.buf.push_str(chunk);
        if self.buf.len() > self.max_buffer_bytes {
            self.done = true;
            log_transition("JsonStreamValidatedBatchCollector", "err");
            self.last = StreamOutcome::err(buffer_limit_error(self.buf.len(), self.max_buffer_bytes));
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    fn drain_with_defaults(&mut self) -> Option<Diagnostic> {
        while let Some((candidate, consumed)) = extract::pop_next_json_candidate(&self.buf) {
            self.buf.drain(..consumed);
            let (repaired, meta) = crate::repair::repair(&candidate, &RepairConfig::default());
            let parsed = parser::parse(&repaired, true, meta.duplicate_key_policy).map(|(v, _)| v);
            match parsed {
                Ok(mut value) => {
                    apply_defaults(&mut value, &self.schema);
                    match validate(&value, &self.schema) {
                        Ok(()) => {
                            self.items.push(value);
                            if self.items.len() > self.max_items {
                                return Some(items_limit_error(self.items.len(), self.max_items));
                            }
                        }
                        Err(diag) => return Some(diag),
                    }
                }
                Err(e) => return Some(Diagnostic::parse("$", e.to_string())),
            }
        }
        None
    }

    pub fn poll(&mut self) -> StreamOutcome<Vec<Value>> {
        if self.done {
            return self.last.clone();
        }
        if let Some(diag) = self.drain_with_defaults() {
            self.done = true;
            log_transition("JsonStreamValidatedBatchCollector", "err");
            self.last = StreamOutcome::err(diag);
            return self.last.clone();
        }
        let new_items: Vec<Value> = self.items[self.emitted_items..].to_vec();
        self.emitted_items = self.items.len();
        if !new_items.is_empty() {
            self.last = StreamOutcome::ok(false, new_items);
            return self.last.clone();
        }
        if self.closed {
            self.done = true;
            log_transition("JsonStreamValidatedBatchCollector", "ok");
            self.last = StreamOutcome::ok(true, Vec::new());
            return self.last.clone();
        }
        self.last = StreamOutcome::pending();
        self.last.clone()
    }

    pub fn location(&self) -> StreamLocation {
        locate(&self.buf)
    }
}

/// Streaming counterpart of the SQL analyzer: buffers until a
/// statement-terminating `;` outside strings/comments, or `finish()`, then
/// runs `parse_sql` + policy validation.
pub struct SqlStreamParser {
    schema: Value,
    buf: String,
    max_buffer_bytes: usize,
    finished: bool,
    done: bool,
    last: StreamOutcome<SqlParsed>,
}

impl SqlStreamParser {
    pub fn new(schema: Value) -> Self {
        Self::with_max_buffer_bytes(schema, usize::MAX)
    }

    pub fn with_max_buffer_bytes(schema: Value, max_buffer_bytes: usize) -> Self {
        Self { schema, buf: String::new(), max_buffer_bytes, finished: false, done: false, last: StreamOutcome::pending() }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.finished = false;
        self.done = false;
        self.last = StreamOutcome::pending();
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn append(&mut self, chunk: &str) {
        if self.done {
            return;
        }
        self.buf.push_str(chunk);
        if self.buf.len() > self.max_buffer_bytes {
            self.done = true;
            log_transition("SqlStreamParser", "err");
            self.last = StreamOutcome::err(buffer_limit_error(self.buf.len(), self.max_buffer_bytes));
        }
    }

    pub fn poll(&mut self) -> StreamOutcome<SqlParsed> {
        if self.done {
            return self.last.clone();
        }
        let statement_end = sql::find_statement_terminator(&self.buf);
        if statement_end.is_none() && !self.finished {
            return self.last.clone();
        }
        let text = match statement_end {
            Some(end) => &self.buf[..end],
            None => &self.buf[..],
        };
        if text.trim().is_empty() {
            if self.finished {
                self.done = true;
                log_transition("SqlStreamParser", "err");
                self.last = StreamOutcome::err(Diagnostic::parse("$.stream.incomplete", "stream finished with an incomplete statement"));
            }
            return self.last.clone();
        }
        let parsed = sql::parse_sql(text);
        match sql::validate_sql(&parsed, &self.schema) {
            Ok(()) => {
                self.done = true;
                log_transition("SqlStreamParser", "ok");
                self.last = StreamOutcome::ok(true, parsed);
            }
            Err(diag) => {
                self.done = true;
                log_transition("SqlStreamParser", "err");
                self.last = StreamOutcome::err(diag);
            }
        }
        self.last.clone()
    }

    pub fn location(&self) -> StreamLocation {
        locate(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn any_schema() -> Value {
        Value::Object(IndexMap::new())
    }

    #[test]
    fn single_value_parser_emits_once_complete() {
        let mut p = JsonStreamParser::new(any_schema());
        p.append("{\"a\": ");
        assert!(!p.poll().done);
        p.append("1}");
        let outcome = p.poll();
        assert!(outcome.done && outcome.ok);
        assert_eq!(outcome.value.unwrap().get("a").unwrap().as_f64(), Some(1.0));
    }

    #[test]
    fn single_value_parser_errors_on_finish_with_incomplete_buffer() {
        let mut p = JsonStreamParser::new(any_schema());
        p.append("{\"a\": 1");
        p.finish();
        let outcome = p.poll();
        assert!(outcome.done && !outcome.ok);
        assert_eq!(outcome.error.unwrap().path, "$.stream.incomplete");
    }

    #[test]
    fn collector_emits_full_array_on_close() {
        let mut c = JsonStreamCollector::new(any_schema());
        c.append("{\"a\": 1}{\"a\": 2}");
        c.close();
        let outcome = c.poll();
        assert!(outcome.done && outcome.ok);
        assert_eq!(outcome.value.unwrap().len(), 2);
    }

    #[test]
    fn batch_collector_emits_incrementally() {
        let mut c = JsonStreamBatchCollector::new(any_schema());
        c.append("{\"a\": 1}");
        let outcome = c.poll();
        assert!(!outcome.done && outcome.ok);
        assert_eq!(outcome.value.unwrap().len(), 1);
        c.close();
        let outcome2 = c.poll();
        assert!(outcome2.done && outcome2.ok);
        assert_eq!(outcome2.value.unwrap().len(), 0);
    }

    #[test]
    fn buffer_limit_reports_size_and_max() {
        let mut p = JsonStreamParser::with_max_buffer_bytes(any_schema(), 4);
        p.append("12345");
        let outcome = p.poll();
        assert!(outcome.done && !outcome.ok);
        let message = &outcome.error.unwrap().message;
        assert!(message.contains("size=5"));
        assert!(message.contains("max=4"));
    }

    #[test]
    fn location_tracks_line_and_column() {
        let mut p = JsonStreamParser::new(any_schema());
        p.append("{\"a\":\n1");
        let loc = p.location();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.col, 2);
    }
}
