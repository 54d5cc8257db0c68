use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Utility functions shared by the report, the SVG charts and the TUI

// ===== STRING UTILITIES =====

/// Masks a bearer token for safe logging (shows first 4 characters, masks the rest)
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    let hidden = token.chars().count().saturating_sub(4);
    if hidden == 0 {
        "*".repeat(visible.chars().count())
    } else {
        format!("{}{}", visible, "*".repeat(hidden.min(8)))
    }
}

/// Truncates a string to a display width, adding "..." if truncated
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

// ===== FORMATTING UTILITIES =====

/// ISO calendar date (`YYYY-MM-DD`)
pub fn fmt_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Groups thousands with commas: `1234567` -> `1,234,567`
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Coordinate formatting for path data: at most two decimals, no trailing zeros
pub fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9"), "eyJh********");
        assert_eq!(mask_token("abcd"), "****");
        assert_eq!(mask_token("ab"), "**");
        assert_eq!(mask_token(""), "");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("very long string", 9), "very l...");
        assert_eq!(truncate_to_width("abcd", 3), "...");
        assert_eq!(truncate_to_width("", 4), "");
        // Wide characters count double
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本...");
    }

    #[test]
    fn test_fmt_date() {
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap();
        assert_eq!(fmt_date(&date), "2024-02-29");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-4500), "-4,500");
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(10.0), "10");
        assert_eq!(fmt_coord(5.5), "5.5");
        assert_eq!(fmt_coord(1.0 / 3.0), "0.33");
        assert_eq!(fmt_coord(-0.001), "0");
    }
}
