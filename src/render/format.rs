//! Number and text formatting for labels, axes and tooltips

pub const CURRENCY_SUFFIX: &str = " VNĐ";

/// Integer with thousands separators: `1234567.4` -> `"1,234,567"`
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"1,234,567 VNĐ"`
pub fn currency(value: f64) -> String {
    format!("{}{}", thousands(value), CURRENCY_SUFFIX)
}

/// Ratio as a percentage with fixed decimals: `percent(0.1234, 2)` -> `"12.34%"`
pub fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

/// Shortest plain rendering; integers print without a fraction
pub fn plain(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Axis abbreviation with one decimal and a trailing `.0` dropped:
/// `1_500_000` -> `"1.5M"`, `2_000` -> `"2K"`, `3e9` -> `"3B"`
pub fn abbreviate(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        return plain(value);
    };

    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}

/// Escape text for XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1_234_567.4), "1,234,567");
        assert_eq!(thousands(-45_000.0), "-45,000");
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(3_070_000.0), "3,070,000 VNĐ");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.1234, 2), "12.34%");
        assert_eq!(percent(0.5, 1), "50.0%");
        assert_eq!(percent(0.333, 0), "33%");
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate(1_500_000.0), "1.5M");
        assert_eq!(abbreviate(2_000_000.0), "2M");
        assert_eq!(abbreviate(2_000.0), "2K");
        assert_eq!(abbreviate(3e9), "3B");
        assert_eq!(abbreviate(450.0), "450");
        assert_eq!(abbreviate(0.0), "0");
    }

    #[test]
    fn test_plain() {
        assert_eq!(plain(12.0), "12");
        assert_eq!(plain(0.25), "0.25");
        assert_eq!(plain(-0.0), "0");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
        assert_eq!(escape_xml("say \"hi\""), "say &quot;hi&quot;");
    }
}
