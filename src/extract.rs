//! Candidate extraction: find one or every JSON-shaped fragment in
//! arbitrary free-form text, via fenced code blocks or balanced brace/bracket
//! scanning. Shared by the repair pipeline (single candidate) and the
//! streaming engine (incomplete-stream detection reuses the same scan).

use crate::error::RepairError;

/// Fence language tags accepted as an opener for a JSON-shaped block.
/// Kept as a list (not hardcoded to "json") because the same fenced-block
/// scanner is reused by the SQL analyzer's `extract_sql_candidate` with
/// a different tag.
const JSON_FENCE_TAGS: &[&str] = &["json", "sql", "yaml", "yml", "toml", "xml", "html"];

/// One balanced or fenced fragment, with its start offset and whether it came
/// from a fenced block (fenced candidates sort ahead of non-fenced ones at
/// the same start offset, per the tie-break rule).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub text: String,
    pub from_fence: bool,
}

/// `true` if the opening line of a fence (lowercased, left-trimmed) begins
/// with one of `tags`.
fn fence_tag_matches(opening_line: &str, tags: &[&str]) -> bool {
    let line = opening_line.trim_start();
    let lower = line.to_ascii_lowercase();
    tags.iter().any(|t| lower.starts_with(t))
}

/// Scan `text` line by line for the first fenced block whose opener matches
/// `tags`. Returns `Some(Ok(body))` on a closed fence, `Some(Err(()))` if a
/// fence opened but never closed (the "not yet" / incomplete-stream case),
/// or `None` if no matching fence opener was found at all.
fn first_fenced_block(text: &str, tags: &[&str]) -> Option<Result<String, ()>> {
    let mut in_fence = false;
    let mut body = String::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if !in_fence {
            if trimmed.starts_with("```") && fence_tag_matches(&trimmed[3..], tags) {
                in_fence = true;
                body.clear();
            }
        } else if trimmed.starts_with("```") {
            if body.ends_with('\n') {
                body.pop();
            }
            return Some(Ok(body));
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    if in_fence { Some(Err(())) } else { None }
}

/// Scan for the first balanced `open`/`close` container, honoring string
/// literals (single or double quoted) with backslash-escape awareness so
/// braces inside strings don't affect depth. Returns `Some(Ok((start, text))`
/// on a closed container, `Some(Err(()))` if one opened but never closed, or
/// `None` if `open` never occurs outside a string.
fn first_balanced(text: &str, open: char, close: char) -> Option<Result<(usize, String), ()>> {
    let mut in_str = false;
    let mut quote = '\0';
    let mut escape = false;
    let mut depth = 0usize;
    let mut start = None;

    for (idx, c) in text.char_indices() {
        if in_str {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            continue;
        }

        if c == '"' || c == '\'' {
            in_str = true;
            quote = c;
            continue;
        }

        if c == open {
            if depth == 0 {
                start = Some(idx);
            }
            depth += 1;
        } else if c == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                let s = start.unwrap();
                let end = idx + c.len_utf8();
                return Some(Ok((s, text[s..end].to_string())));
            }
        }
    }

    start.map(|_| Err(()))
}

/// `true` if `c` can begin a JSON value (used by the extractor's fallback
/// heuristic).
fn starts_json_value(c: char) -> bool {
    matches!(c, '{' | '[' | '"' | '\'' | '-') || c.is_ascii_digit() || c == 't' || c == 'f' || c == 'n'
}

/// The first closed fenced block, else the first balanced `{...}`, else the
/// first balanced `[...]`. An unclosed fence or container at one level falls
/// through to try the next level rather than giving up, since "not closed
/// here" doesn't mean "not present elsewhere" (e.g. a dangling `{` earlier in
/// the text shouldn't hide a complete `[...]` later in it). Returns `None`
/// when none of the three closes anywhere in `text` — this covers both "no
/// opener at all" and "opener seen but never closed", which callers that only
/// care about a complete candidate (streaming polls) should treat alike.
fn extract_closed_candidate(text: &str) -> Option<String> {
    if let Some(Ok(body)) = first_fenced_block(text, JSON_FENCE_TAGS) {
        return Some(body);
    }
    if let Some(Ok((_, s))) = first_balanced(text, '{', '}') {
        return Some(s);
    }
    if let Some(Ok((_, s))) = first_balanced(text, '[', ']') {
        return Some(s);
    }
    None
}

/// Extract the single best JSON candidate from `text`:
/// 1. The first closed fenced block tagged json/sql/yaml/yml/toml/xml/html.
/// 2. Else the first balanced `{...}`, else the first balanced `[...]`.
/// 3. Else, if the trimmed text starts with a JSON-value-initiating
///    character, the trimmed text itself (so the parser reports a precise
///    error instead of this function reporting "no JSON found").
pub fn extract_json_candidate(text: &str) -> Result<String, RepairError> {
    if let Some(candidate) = extract_closed_candidate(text) {
        return Ok(candidate);
    }

    let trimmed = text.trim();
    if let Some(c) = trimmed.chars().next()
        && starts_json_value(c) {
            return Ok(trimmed.to_string());
        }

    Err(RepairError::NoCandidateFound)
}

/// Streaming counterpart of [`extract_json_candidate`] used by
/// [`JsonStreamParser`](crate::stream::JsonStreamParser)'s poll loop: the same
/// fence/object/array search, but *without* the bare-value fallback. A
/// streaming poll must distinguish "nothing complete yet" from "this is
/// malformed" — the bare-value fallback exists precisely to turn the former
/// into the latter for one-shot callers, which is wrong for a buffer that is
/// simply still growing. Returns `None` until something closes.
pub fn extract_json_candidate_streaming(text: &str) -> Option<String> {
    extract_closed_candidate(text)
}

/// Enumerate every candidate in `text`: every closed fenced JSON block, plus
/// every balanced container whose opener lies outside any fenced region.
/// Sorted by start offset; ties break fenced-first, then by length.
pub fn extract_json_candidates(text: &str) -> Result<Vec<String>, RepairError> {
    let candidates = collect_candidates(text);
    if candidates.is_empty() {
        return Err(RepairError::NoCandidateFound);
    }
    Ok(candidates.into_iter().map(|c| c.text).collect())
}

/// Same as [`extract_json_candidates`] but keeps start offsets and the
/// fenced/non-fenced flag, for callers that need positions (e.g. the
/// streaming engine's "consume up through the chosen candidate" bookkeeping).
pub fn collect_candidates(text: &str) -> Vec<Candidate> {
    let fenced_ranges = fenced_json_ranges(text);

    let mut candidates: Vec<Candidate> = fenced_ranges
        .iter()
        .map(|r| Candidate {
            start: r.start,
            text: r.body.clone(),
            from_fence: true,
        })
        .collect();

    let bytes = text.as_bytes();
    let mut in_str = false;
    let mut quote = 0u8;
    let mut escape = false;
    let mut idx = 0usize;
    while idx < bytes.len() {
        if let Some(skip_to) = fenced_range_end(idx, &fenced_ranges) {
            idx = skip_to;
            continue;
        }

        let c = bytes[idx];
        if in_str {
            if escape {
                escape = false;
            } else if c == b'\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            idx += 1;
            continue;
        }

        if c == b'"' || c == b'\'' {
            in_str = true;
            quote = c;
        } else if (c == b'{' || c == b'[')
            && let Some((start, body, end)) = scan_balanced_from(text, idx) {
                candidates.push(Candidate {
                    start,
                    text: body,
                    from_fence: false,
                });
                idx = end;
                continue;
            }
        idx += 1;
    }

    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.from_fence.cmp(&a.from_fence))
            .then(a.text.len().cmp(&b.text.len()))
    });
    candidates
}

struct FencedRange {
    start: usize,
    end: usize,
    body: String,
}

/// If `pos` falls inside a fenced range, the byte offset to jump the scan to
/// (the range's end), so a candidate opener never fires from inside a fence
/// body. `None` if `pos` isn't inside any fenced range.
fn fenced_range_end(pos: usize, ranges: &[FencedRange]) -> Option<usize> {
    ranges
        .iter()
        .find(|r| pos >= r.start && pos < r.end)
        .map(|r| r.end)
}

/// Find every closed `json`-tagged fenced block and its byte span in `text`.
fn fenced_json_ranges(text: &str) -> Vec<FencedRange> {
    let mut ranges = Vec::new();
    let mut search_from = 0usize;
    loop {
        let rest = &text[search_from..];
        let Some(fence_start_rel) = find_fence_open(rest, JSON_FENCE_TAGS) else {
            break;
        };
        let fence_start = search_from + fence_start_rel;
        let Some(body_start_rel) = text[fence_start..].find('\n') else {
            break;
        };
        let body_start = fence_start + body_start_rel + 1;
        let Some(end_rel) = text[body_start..].find("```") else {
            break;
        };
        let end = body_start + end_rel;
        let mut body = text[body_start..end].to_string();
        if body.ends_with('\n') {
            body.pop();
        }
        ranges.push(FencedRange {
            start: fence_start,
            end: end + 3,
            body,
        });
        search_from = end + 3;
    }
    ranges
}

/// Byte offset (relative to `text`) of the next ` ``` ` whose language tag
/// matches `tags`, scanning line by line like [`first_fenced_block`].
fn find_fence_open(text: &str, tags: &[&str]) -> Option<usize> {
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") && fence_tag_matches(&trimmed[3..], tags) {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// From a known opening brace/bracket byte offset `start`, scan forward for
/// its matching close, honoring string literals. Returns
/// `(start, matched_text, end_offset_exclusive)`. `None` if unclosed — the
/// caller then leaves that opener alone (not yet a candidate).
fn scan_balanced_from(text: &str, start: usize) -> Option<(usize, String, usize)> {
    let bytes = text.as_bytes();
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut in_str = false;
    let mut quote = 0u8;
    let mut escape = false;
    let mut depth = 0i32;

    for (idx, &c) in bytes.iter().enumerate().skip(start) {
        if in_str {
            if escape {
                escape = false;
            } else if c == b'\\' {
                escape = true;
            } else if c == quote {
                in_str = false;
            }
            continue;
        }
        if c == b'"' || c == b'\'' {
            in_str = true;
            quote = c;
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            if depth > 0 {
                depth -= 1;
            }
            if depth == 0 {
                let end = idx + 1;
                return Some((start, text[start..end].to_string(), end));
            }
        }
    }
    None
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    let (hb, nb) = (haystack.as_bytes(), needle.as_bytes());
    if hb.len() < nb.len() {
        return None;
    }
    (0..=hb.len() - nb.len()).find(|&i| hb[i..i + nb.len()].eq_ignore_ascii_case(nb))
}

/// Pop the next JSON candidate from the *head* of a growing stream buffer
/// (pop-next semantics): a `\`\`\`json` fence anywhere in the buffer
/// wins if closed, else the earliest balanced `{...}`/`[...]`. Returns the
/// candidate text and how many leading bytes of `buf` it consumes (the
/// caller drains that prefix so progress is never re-scanned). `None` means
/// nothing is complete yet.
pub fn pop_next_json_candidate(buf: &str) -> Option<(String, usize)> {
    if let Some(start) = find_ci(buf, "```json") {
        let body_start = buf[start..].find('\n')? + start + 1;
        let end_pos = buf[body_start..].find("```")? + body_start;
        let mut body = buf[body_start..end_pos].to_string();
        if body.ends_with('\n') {
            body.pop();
        }
        return Some((body, end_pos + 3));
    }

    let obj = first_balanced(buf, '{', '}');
    let arr = first_balanced(buf, '[', ']');
    let mut best: Option<(usize, usize, String)> = None;
    if let Some(Ok((start, body))) = obj {
        let end = start + body.len();
        best = Some((start, end, body));
    }
    if let Some(Ok((start, body))) = arr
        && best.as_ref().is_none_or(|b| start < b.0) {
            let end = start + body.len();
            best = Some((start, end, body));
        }
    best.map(|(_, end, body)| (body, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_fenced_json_block() {
        let text = "here you go:\n```json\n{\"a\": 1}\n```\nthanks";
        assert_eq!(extract_json_candidate(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn unclosed_fence_is_not_yet_an_error() {
        let text = "```json\n{\"a\": 1";
        assert_eq!(extract_json_candidate(text), Err(RepairError::NoCandidateFound));
    }

    #[test]
    fn unclosed_fence_falls_through_to_a_later_valid_object() {
        let text = "```yaml\nname: Ada\nthen elsewhere: {\"a\": 1}";
        assert_eq!(extract_json_candidate(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn unclosed_object_falls_through_to_a_later_valid_array() {
        let text = "{\"a\": 1 [1,2,3]";
        assert_eq!(extract_json_candidate(text).unwrap(), "[1,2,3]");
    }

    #[test]
    fn falls_back_to_balanced_braces_without_fence() {
        let text = "sure, here is the object {\"a\": [1,2,3]} done.";
        assert_eq!(extract_json_candidate(text).unwrap(), "{\"a\": [1,2,3]}");
    }

    #[test]
    fn braces_inside_strings_do_not_affect_depth() {
        let text = r#"{"a": "not a { brace"}"#;
        assert_eq!(extract_json_candidate(text).unwrap(), text);
    }

    #[test]
    fn fallback_heuristic_passes_through_bare_trimmed_text() {
        let text = "  true  ";
        assert_eq!(extract_json_candidate(text).unwrap(), "true");
    }

    #[test]
    fn no_candidate_found_for_prose() {
        let text = "well, this is not json at all";
        assert_eq!(extract_json_candidate(text), Err(RepairError::NoCandidateFound));
    }

    #[test]
    fn multi_candidate_sorted_by_start_then_fenced_first() {
        let text = "{\"a\":1} and ```json\n{\"b\":2}\n```";
        let candidates = extract_json_candidates(text).unwrap();
        assert_eq!(candidates, vec!["{\"a\":1}".to_string(), "{\"b\":2}".to_string()]);
    }

    #[test]
    fn multi_candidate_skips_braces_inside_fenced_ranges() {
        let text = "```json\n{\"a\": 1}\n```\nnot json: { unrelated";
        let candidates = extract_json_candidates(text).unwrap();
        assert_eq!(candidates, vec!["{\"a\": 1}".to_string()]);
    }

    #[test]
    fn pop_next_returns_candidate_and_consume_length() {
        let buf = "{\"a\": 1} trailing garbage";
        let (text, consumed) = pop_next_json_candidate(buf).unwrap();
        assert_eq!(text, "{\"a\": 1}");
        assert_eq!(&buf[..consumed], "{\"a\": 1}");
    }

    #[test]
    fn pop_next_returns_none_for_unclosed_container() {
        assert_eq!(pop_next_json_candidate("{\"a\": 1"), None);
    }
}
