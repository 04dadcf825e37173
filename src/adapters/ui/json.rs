//! JSON presenter: the full record, pretty-printed.
//!
//! serde_json keeps non-ASCII characters literal and indents with 2 spaces;
//! non-primitive platform values were stringified at the adapter boundary.

use crate::domain::{CollectedInfo, OsintError};

pub fn render(info: &CollectedInfo) -> Result<String, OsintError> {
    serde_json::to_string_pretty(info)
        .map_err(|e| OsintError::Unexpected(anyhow::anyhow!("serialize record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CollectedInfo, GroupInfo};

    #[test]
    fn primitive_fields_round_trip() {
        let info = CollectedInfo::Group(GroupInfo {
            kind: "chat".to_string(),
            id: 42,
            title: Some("Crème brûlée fans".to_string()),
            created: None,
            downloaded_photos: vec![],
            download_error: None,
        });
        let json = render(&info).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "chat");
        assert_eq!(value["id"], 42);
        assert_eq!(value["title"], "Crème brûlée fans");
        assert!(value["created"].is_null());
        // download_error is only present when set.
        assert!(value.get("download_error").is_none());
        // Non-ASCII stays literal.
        assert!(json.contains("brûlée"));
    }

    #[test]
    fn empty_entity_lists_are_always_present() {
        let info = CollectedInfo::Group(GroupInfo {
            kind: "chat".to_string(),
            id: 1,
            title: None,
            created: None,
            downloaded_photos: vec![],
            download_error: None,
        });
        let value: serde_json::Value = serde_json::from_str(&render(&info).unwrap()).unwrap();
        assert!(value["downloaded_photos"].as_array().unwrap().is_empty());
    }
}
