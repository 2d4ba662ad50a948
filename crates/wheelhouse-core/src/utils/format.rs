use chrono::NaiveDate;

/// Parse a record date. Accepts `YYYY-MM-DD` and RFC 3339 timestamps
/// (the date part is kept).
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    // "2024-01-05T00:00:00" without an offset
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    match parse_record_date(date) {
        Some(d) => d.format("%b %d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Lowercase and collapse internal whitespace, for name matching.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a whole number with thousands separators (1600 -> "1,600").
pub fn format_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a month count as "1y 3m", "8m" or "0m".
pub fn format_months(months: u32) -> String {
    let years = months / 12;
    let rem = months % 12;
    match (years, rem) {
        (0, m) => format!("{}m", m),
        (y, 0) => format!("{}y", y),
        (y, m) => format!("{}y {}m", y, m),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
