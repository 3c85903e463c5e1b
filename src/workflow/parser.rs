//! Parser for planner output: one sub-task per line, enumeration markers removed

/// Split a raw planner response into sub-tasks.
///
/// Blank lines and lines that are nothing but markers are dropped. The number
/// of sub-tasks is whatever the response contains; it is not checked against
/// the requested count.
pub fn parse_sub_tasks(raw: &str) -> Vec<String> {
    raw.lines()
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove a leading list marker ("1.", "2)", "-", "*", "•") and outer whitespace.
///
/// Only the front is searched for markers, so trailing digits and punctuation
/// survive ("Buy 2 cakes." stays as is). Idempotent: stripping an already
/// stripped line returns it unchanged.
pub fn strip_marker(line: &str) -> &str {
    line.trim_start_matches(is_marker_char).trim_end()
}

fn is_marker_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | '-' | ')' | '*' | '•')
}
