//! Collected-info records: the output side of the pipeline.
//!
//! One variant per target kind. A record is built once by a collector, fully
//! populated, then handed to a presenter; it is never mutated afterward.
//! Field names follow the JSON document this tool emits.

use serde::{Deserialize, Serialize};

use crate::domain::ReactionTally;

/// Extracted text entities. Always present, possibly empty, ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntities {
    pub urls: Vec<String>,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
}

/// Tagged record produced by exactly one collector per invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CollectedInfo {
    User(UserInfo),
    Channel(ChannelInfo),
    Group(GroupInfo),
    Message(MessageInfo),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub kind: String,
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub last_seen: String,
    pub bio: Option<String>,
    pub bio_urls: Vec<String>,
    pub bio_mentions: Vec<String>,
    pub bio_hashtags: Vec<String>,
    pub premium: bool,
    pub verified: bool,
    pub bot: bool,
    pub scam: bool,
    pub fake: bool,
    pub support: bool,
    pub bot_info_version: Option<i32>,
    pub restriction_reason: Option<String>,
    pub emoji_status: bool,
    pub emoji_status_until: Option<String>,
    pub has_video_avatar: bool,
    pub common_chats_count: Option<i32>,
    pub profile_photos_count: Option<usize>,
    pub downloaded_photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub kind: String,
    pub id: i64,
    pub title: Option<String>,
    pub username: Option<String>,
    pub created: Option<String>,
    pub about: Option<String>,
    pub about_urls: Vec<String>,
    pub about_mentions: Vec<String>,
    pub about_hashtags: Vec<String>,
    pub megagroup: bool,
    pub broadcast: bool,
    pub forum: bool,
    pub gigagroup: bool,
    pub verified: bool,
    pub scam: bool,
    pub fake: bool,
    pub restricted: bool,
    pub participants_count: Option<i32>,
    pub admins_count: Option<i32>,
    pub kicked_count: Option<i32>,
    pub banned_count: Option<i32>,
    pub online_count: Option<i32>,
    pub slowmode_seconds: Option<i32>,
    pub default_banned_rights: Option<String>,
    pub linked_chat_id: Option<i64>,
    pub stickerset: Option<String>,
    pub location: Option<String>,
    pub theme_emoticon: Option<String>,
    pub downloaded_photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupInfo {
    pub kind: String,
    pub id: i64,
    pub title: Option<String>,
    pub created: Option<String>,
    pub downloaded_photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageInfo {
    pub kind: String,
    /// Channel handle when public, numeric id otherwise.
    pub channel: String,
    pub id: i32,
    pub date: Option<String>,
    pub edit_date: Option<String>,
    pub text: String,
    pub views: Option<i32>,
    pub forwards: Option<i32>,
    pub replies: Option<i32>,
    pub reactions: Vec<ReactionTally>,
    pub fwd_from: Option<String>,
    pub via_bot_id: Option<i64>,
    pub reply_to: Option<i32>,
    /// Merged plain-text + rich entities, deduplicated and sorted.
    pub entities_found: TextEntities,
    pub media: Option<MediaInfo>,
    /// Stringified raw platform record. JSON mode only; the human presenter
    /// never prints it.
    pub raw: String,
}

/// Media descriptor for a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_photo: Option<bool>,
}
