fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let fixed = format!("{:.2}", val.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let sign = if val < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Magnitude of a percentage change for display; direction is shown separately.
pub fn change_label(percent: f64) -> String {
    if percent == 0.0 {
        "0.0%".to_string()
    } else if percent.abs() > 1000.0 {
        "999+%".to_string()
    } else {
        format!("{:.1}%", percent.abs())
    }
}

pub fn change_arrow(percent: f64) -> &'static str {
    if percent >= 0.0 {
        "\u{2191}"
    } else {
        "\u{2193}"
    }
}

/// Fixed-width text bar, clamped to 0..=100 percent.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(-0.001), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(65.4), "$65.40");
        assert_eq!(money(999.999), "$1,000.00");
    }

    #[test]
    fn test_change_label_caps_large_values() {
        assert_eq!(change_label(0.0), "0.0%");
        assert_eq!(change_label(100.0), "100.0%");
        assert_eq!(change_label(-12.34), "12.3%");
        assert_eq!(change_label(1000.0), "1000.0%");
        assert_eq!(change_label(1500.0), "999+%");
        assert_eq!(change_label(-2500.0), "999+%");
    }

    #[test]
    fn test_progress_bar_clamps() {
        assert_eq!(progress_bar(50.0, 4), "\u{2588}\u{2588}\u{2591}\u{2591}");
        assert_eq!(progress_bar(150.0, 3), "\u{2588}\u{2588}\u{2588}");
        assert_eq!(progress_bar(-5.0, 2), "\u{2591}\u{2591}");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
