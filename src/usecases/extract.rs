//! Text Entity Extractor: URLs, @mentions and #hashtags from raw text.
//!
//! Pattern matching only. No dedup or normalization at this layer; callers
//! that need merged sets (the message collector) do that themselves.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::TextEntities;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+").expect("url pattern"));

// Platform handles have a 5-character minimum; shorter matches are noise.
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]{5,})").expect("mention pattern"));

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w{2,})").expect("hashtag pattern"));

/// Extract entities from optional text. Never fails; absent text yields three
/// empty sequences.
pub fn extract_from_text(text: Option<&str>) -> TextEntities {
    let Some(text) = text else {
        return TextEntities::default();
    };
    TextEntities {
        urls: URL_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        mentions: MENTION_RE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect(),
        hashtags: HASHTAG_RE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_text_yields_empty_sequences() {
        let e = extract_from_text(None);
        assert!(e.urls.is_empty() && e.mentions.is_empty() && e.hashtags.is_empty());

        let e = extract_from_text(Some(""));
        assert!(e.urls.is_empty() && e.mentions.is_empty() && e.hashtags.is_empty());
    }

    #[test]
    fn urls_match_http_and_https_case_insensitive() {
        let e = extract_from_text(Some("see HTTPS://example.com/x and http://a.b/c?d=1"));
        assert_eq!(e.urls, vec!["HTTPS://example.com/x", "http://a.b/c?d=1"]);
    }

    #[test]
    fn url_stops_at_whitespace() {
        let e = extract_from_text(Some("http://example.com/path more text"));
        assert_eq!(e.urls, vec!["http://example.com/path"]);
    }

    #[test]
    fn mentions_require_five_characters() {
        let e = extract_from_text(Some("ping @ab and @abcde and @long_name99"));
        assert_eq!(e.mentions, vec!["abcde", "long_name99"]);
    }

    #[test]
    fn hashtags_require_two_characters() {
        let e = extract_from_text(Some("#a #ab #tag_2024"));
        assert_eq!(e.hashtags, vec!["ab", "tag_2024"]);
    }

    #[test]
    fn order_is_preserved_and_duplicates_kept() {
        let e = extract_from_text(Some("@first_one then @first_one again"));
        assert_eq!(e.mentions, vec!["first_one", "first_one"]);
    }

    #[test]
    fn mixed_text_extracts_all_three_kinds() {
        let e = extract_from_text(Some("join @mygroup at https://t.me/mygroup #osint #news"));
        assert_eq!(e.urls, vec!["https://t.me/mygroup"]);
        assert_eq!(e.mentions, vec!["mygroup"]);
        assert_eq!(e.hashtags, vec!["osint", "news"]);
    }
}
