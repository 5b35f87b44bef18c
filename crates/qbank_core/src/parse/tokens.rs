/// Splits operator identifier input into trimmed, non-empty tokens.
///
/// Commas and line breaks separate tokens; whitespace inside a token is
/// kept so that forms like `#123 RS` survive.
pub fn split_tokens(input: &str) -> Vec<String> {
    input
        .split([',', '\n', '\r', ';'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
