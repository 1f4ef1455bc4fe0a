use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_RGX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap()
});

/// Convert a catalog duration token (`PT1H2M3S`) into `H:MM:SS` or `M:SS`.
///
/// Returns an empty string for anything that is not a `PT[nH][nM][nS]` token.
pub fn normalize_duration(token: &str) -> String {
    let captures = match DURATION_RGX.captures(token.trim()) {
        Some(captures) => captures,
        None => return String::new(),
    };

    let component = |idx: usize| -> Option<u64> {
        match captures.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let (hours, minutes, seconds) = match (component(1), component(2), component(3)) {
        (Some(h), Some(m), Some(s)) => (h, m, s),
        // Component too large for u64
        _ => return String::new(),
    };

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_token() {
        assert_eq!(normalize_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(normalize_duration("PT10H0M59S"), "10:00:59");
    }

    #[test]
    fn test_partial_tokens() {
        assert_eq!(normalize_duration("PT45S"), "0:45");
        assert_eq!(normalize_duration("PT2M"), "2:00");
        assert_eq!(normalize_duration("PT3H"), "3:00:00");
        assert_eq!(normalize_duration("PT12M5S"), "12:05");
        assert_eq!(normalize_duration("PT1H7S"), "1:00:07");
    }

    #[test]
    fn test_zero_hours_uses_short_form() {
        assert_eq!(normalize_duration("PT0H4M9S"), "4:09");
    }

    #[test]
    fn test_bare_prefix() {
        assert_eq!(normalize_duration("PT"), "0:00");
    }

    #[test]
    fn test_minutes_not_carried() {
        assert_eq!(normalize_duration("PT90M"), "90:00");
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(normalize_duration("bogus"), "");
        assert_eq!(normalize_duration(""), "");
        assert_eq!(normalize_duration("P1DT2H"), "");
        assert_eq!(normalize_duration("PT3.5S"), "");
        assert_eq!(normalize_duration("PT5S4M"), "");
        assert_eq!(normalize_duration("PT99999999999999999999999S"), "");
    }
}
