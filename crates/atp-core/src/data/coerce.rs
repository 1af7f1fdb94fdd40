// Light field coercion for the source tables.

/// Parse a numeric field, ignoring surrounding whitespace, `%` signs and
/// `,` thousands separators. Empty or non-finite values yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '%')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Like `parse_number` but for an optional CSV field.
pub fn parse_opt(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_number)
}

/// First run of four consecutive ASCII digits in a free-text period label,
/// e.g. `"2019"` or `"2019 season"`. Labels such as `"career"` have no year.
pub fn extract_year(label: &str) -> Option<i32> {
    label
        .as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|s| s.parse().ok())
}

/// Convert a non-negative count to `u32`, rounding fractional values.
pub fn to_count(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else {
        value.round().min(u32::MAX as f64) as u32
    }
}
