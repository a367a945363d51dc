use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// A bracket group never spans lines or nests.
static EXPLICIT_TOOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]\r\n]*)\]").expect("explicit tool regex must compile"));

/// Tool names referenced as `[name]` in a query.
///
/// Names are trimmed, blank groups are skipped, and repeats collapse into
/// their first occurrence.
#[must_use]
pub fn extract_explicit_tools(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for captures in EXPLICIT_TOOL_RE.captures_iter(query) {
        let Some(raw) = captures.get(1) else {
            continue;
        };
        let name = raw.as_str().trim();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
