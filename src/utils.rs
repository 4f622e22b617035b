use url::Url;

/// Turns an image or link reference into an absolute URL
///
/// Protocol-relative references get `https:`, root-relative ones are resolved
/// against `base_url`, anything else is returned unchanged.
pub fn normalize_url(raw: &str, base_url: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        Url::parse(base_url)
            .and_then(|base| base.join(raw))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}{}", base_url.trim_end_matches('/'), raw))
    } else {
        raw.to_string()
    }
}

/// Formats an integer with `,` between groups of three digits
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Keeps only the ASCII digits of `text` and parses them
pub fn parse_digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Trims and collapses runs of whitespace into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
