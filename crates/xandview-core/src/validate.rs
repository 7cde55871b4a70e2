// ── Input validation ──
//
// Checks applied to user-supplied strings and numbers before they reach
// the engine. All functions are total.

/// Longest accepted free-text input, in characters.
pub const MAX_INPUT_LEN: usize = 100;

const NODE_ID_PREFIX: &str = "XN-";
const NODE_ID_DIGITS: usize = 4;

/// Trim, strip angle brackets, and keep at most the first 100 characters.
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .take(MAX_INPUT_LEN)
        .collect()
}

/// `XN-` followed by exactly four ASCII digits.
pub fn is_valid_node_id(id: &str) -> bool {
    id.strip_prefix(NODE_ID_PREFIX)
        .is_some_and(|digits| digits.len() == NODE_ID_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Non-empty, at most 100 characters, drawn from letters, digits,
/// whitespace and `-_,.`.
pub fn is_valid_search_query(query: &str) -> bool {
    !query.is_empty()
        && query.chars().count() <= MAX_INPUT_LEN
        && query
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | ',' | '.'))
}

/// Inclusive range check; NaN is never in range.
pub fn is_in_range(value: f64, min: f64, max: f64) -> bool {
    !value.is_nan() && value >= min && value <= max
}
