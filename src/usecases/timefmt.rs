//! Timestamp Formatter: absolute instant -> localized human string.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::OsintError;

/// Parse a zone name (e.g. "Europe/Paris"). Invalid names are a configuration
/// error and abort the invocation.
pub fn parse_zone(name: &str) -> Result<Tz, OsintError> {
    name.parse::<Tz>()
        .map_err(|_| OsintError::Config(format!("unknown time zone: {name}")))
}

/// Format an instant as `YYYY-MM-DD HH:MM:SS <zone-abbrev>` in the given zone,
/// or `None` when no instant was supplied.
pub fn format_instant(instant: Option<DateTime<Utc>>, tz: Tz) -> Option<String> {
    instant.map(|t| {
        t.with_timezone(&tz)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn none_instant_formats_to_none() {
        let tz = parse_zone("Europe/Paris").unwrap();
        assert_eq!(format_instant(None, tz), None);
    }

    #[test]
    fn utc_instant_is_localized_with_zone_abbrev() {
        let tz = parse_zone("Europe/Paris").unwrap();
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            format_instant(Some(t), tz).unwrap(),
            "2024-01-15 11:30:00 CET"
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let tz = parse_zone("Asia/Almaty").unwrap();
        let t = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(format_instant(Some(t), tz), format_instant(Some(t), tz));
    }

    #[test]
    fn invalid_zone_is_a_config_error() {
        assert!(matches!(
            parse_zone("Mars/Olympus"),
            Err(OsintError::Config(_))
        ));
    }
}
