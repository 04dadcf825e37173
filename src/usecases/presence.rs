//! Status Translator: presence status -> human "last seen" phrase.
//!
//! Total function: every variant maps to some string, never a failure.

use chrono_tz::Tz;

use crate::domain::PresenceStatus;
use crate::usecases::timefmt::format_instant;

pub fn last_seen_phrase(status: &PresenceStatus, tz: Tz) -> String {
    match status {
        PresenceStatus::Empty => "never".to_string(),
        PresenceStatus::Online => "now".to_string(),
        PresenceStatus::Offline { was_online } => {
            format_instant(*was_online, tz).unwrap_or_else(|| "unknown".to_string())
        }
        PresenceStatus::Recently => "recently".to_string(),
        PresenceStatus::LastWeek => "last week".to_string(),
        PresenceStatus::LastMonth => "last month".to_string(),
        PresenceStatus::Unknown => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn paris() -> Tz {
        "Europe/Paris".parse().unwrap()
    }

    #[test]
    fn every_variant_has_a_phrase() {
        assert_eq!(last_seen_phrase(&PresenceStatus::Empty, paris()), "never");
        assert_eq!(last_seen_phrase(&PresenceStatus::Online, paris()), "now");
        assert_eq!(
            last_seen_phrase(&PresenceStatus::Recently, paris()),
            "recently"
        );
        assert_eq!(
            last_seen_phrase(&PresenceStatus::LastWeek, paris()),
            "last week"
        );
        assert_eq!(
            last_seen_phrase(&PresenceStatus::LastMonth, paris()),
            "last month"
        );
        assert_eq!(
            last_seen_phrase(&PresenceStatus::Unknown, paris()),
            "unknown"
        );
    }

    #[test]
    fn offline_with_timestamp_formats_it() {
        let t = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let s = last_seen_phrase(
            &PresenceStatus::Offline {
                was_online: Some(t),
            },
            paris(),
        );
        assert_eq!(s, "2024-07-01 14:00:00 CEST");
    }

    #[test]
    fn offline_without_timestamp_falls_back_to_unknown() {
        let s = last_seen_phrase(&PresenceStatus::Offline { was_online: None }, paris());
        assert_eq!(s, "unknown");
    }
}
