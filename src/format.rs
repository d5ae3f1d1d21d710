use compact_str::{format_compact, CompactString};

/// `4.500` → `4.5`, `4.000` → `4`. `None` for infinities and NaN.
pub fn format_result(value: f64) -> Option<CompactString> {
    if !value.is_finite() {
        return None;
    }

    let fixed = format_compact!("{value:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    Some(match trimmed {
        "-0" => CompactString::from("0"),
        _ => CompactString::from(trimmed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(value: f64) -> Option<String> {
        format_result(value).map(String::from)
    }

    #[test]
    fn test_whole_numbers_lose_decimal_point() {
        assert_eq!(formatted(4.0).as_deref(), Some("4"));
        assert_eq!(formatted(100.0).as_deref(), Some("100"));
        assert_eq!(formatted(0.0).as_deref(), Some("0"));
        assert_eq!(formatted(-20.0).as_deref(), Some("-20"));
    }

    #[test]
    fn test_trailing_zeros_stripped() {
        assert_eq!(formatted(4.5).as_deref(), Some("4.5"));
        assert_eq!(formatted(2.25).as_deref(), Some("2.25"));
        assert_eq!(formatted(10.05).as_deref(), Some("10.05"));
    }

    #[test]
    fn test_rounded_to_three_decimals() {
        assert_eq!(formatted(1.0 / 3.0).as_deref(), Some("0.333"));
        assert_eq!(formatted(2.0 / 3.0).as_deref(), Some("0.667"));
        assert_eq!(formatted(1.9999).as_deref(), Some("2"));
    }

    #[test]
    fn test_negative_zero_shown_as_zero() {
        assert_eq!(formatted(-0.0001).as_deref(), Some("0"));
        assert_eq!(formatted(-0.0).as_deref(), Some("0"));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(formatted(f64::INFINITY), None);
        assert_eq!(formatted(f64::NEG_INFINITY), None);
        assert_eq!(formatted(f64::NAN), None);
    }
}
