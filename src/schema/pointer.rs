//! JSONPath-ish path to RFC 6901 JSON Pointer conversion.

/// Split a `$.a.b[0]`-style path into its raw segments (no escaping applied
/// yet): `.` starts a new segment, `[...]` starts and closes one. The
/// leading `$` is dropped; `$` alone has no segments.
fn path_segments(path: &str) -> Vec<String> {
    let rest = path.strip_prefix('$').unwrap_or(path);
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for c in rest.chars() {
        match c {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                in_bracket = true;
            }
            ']' if in_bracket => {
                segments.push(std::mem::take(&mut current));
                in_bracket = false;
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// RFC 6901 token escaping: `~` → `~0`, `/` → `~1` (order matters).
fn escape_token(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Derive the RFC-6901 JSON Pointer equivalent of a JSONPath-ish diagnostic
/// path. Non-array bracket segments (e.g. `[Intro]`) are treated as ordinary
/// pointer segments, same as array indices — the pointer format doesn't
/// distinguish them.
pub fn json_pointer_from_path(path: &str) -> String {
    let segments = path_segments(path);
    if segments.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        out.push_str(&escape_token(&seg));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_has_empty_pointer() {
        assert_eq!(json_pointer_from_path("$"), "");
    }

    #[test]
    fn dotted_and_bracket_segments_both_become_pointer_segments() {
        assert_eq!(json_pointer_from_path("$.a.b[0]"), "/a/b/0");
        assert_eq!(json_pointer_from_path("$.headings[Intro]"), "/headings/Intro");
    }

    #[test]
    fn escapes_tilde_and_slash_in_segments() {
        assert_eq!(json_pointer_from_path("$.a~b"), "/a~0b");
        assert_eq!(json_pointer_from_path("$.a/b"), "/a~1b");
    }
}
