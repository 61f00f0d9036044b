/// Format a bar total for display above the bar.
///
/// Values strictly between 0 and 1 are read as proportions and shown as a
/// percentage with one decimal (`0.256` -> `"25.6%"`). Everything else,
/// including exactly 0, exactly 1 and all negatives, is rounded to an integer
/// with comma thousands separators (`1234` -> `"1,234"`).
pub fn format_value(v: f64) -> String {
    if v > 0.0 && v < 1.0 {
        return format!("{:.1}%", v * 100.0);
    }
    if !v.is_finite() {
        return v.to_string();
    }
    group_thousands(&format!("{:.0}", v))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_boundaries() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(0.5), "50.0%");
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(-3.0), "-3");
    }

    #[test]
    fn test_format_percentages() {
        assert_eq!(format_value(0.256), "25.6%");
        assert_eq!(format_value(0.001), "0.1%");
        assert_eq!(format_value(0.9999), "100.0%");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_value(1234.0), "1,234");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(1000.0), "1,000");
        assert_eq!(format_value(1234567.0), "1,234,567");
        assert_eq!(format_value(-50.0), "-50");
        assert_eq!(format_value(-1234567.0), "-1,234,567");
    }

    #[test]
    fn test_format_rounds_to_integer() {
        assert_eq!(format_value(1.6), "2");
        assert_eq!(format_value(15.2), "15");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    }
}
