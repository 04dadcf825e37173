//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram/IO types here — these are mapped from adapters.

use chrono::{DateTime, Utc};

/// Reference to a resolved peer, sufficient for follow-up API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRef {
    User { id: i64, access_hash: i64 },
    Channel { id: i64, access_hash: i64 },
    Group { id: i64 },
}

impl PeerRef {
    pub fn id(&self) -> i64 {
        match self {
            Self::User { id, .. } | Self::Channel { id, .. } | Self::Group { id } => *id,
        }
    }
}

/// A target after resolution: the peer handle plus its classified profile.
/// The profile variant, not the CLI flag, decides which collector runs.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub peer: PeerRef,
    pub profile: TargetProfile,
}

#[derive(Debug, Clone)]
pub enum TargetProfile {
    User(UserProfile),
    Channel(ChannelProfile),
    Group(GroupProfile),
}

/// When a user was last active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Empty,
    Online,
    Offline { was_online: Option<DateTime<Utc>> },
    Recently,
    LastWeek,
    LastMonth,
    Unknown,
}

/// Base user fields, available right after resolution.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub status: PresenceStatus,
    pub premium: bool,
    pub verified: bool,
    pub bot: bool,
    pub scam: bool,
    pub fake: bool,
    pub support: bool,
    pub bot_info_version: Option<i32>,
    pub restriction_reason: Option<String>,
    pub has_emoji_status: bool,
    pub emoji_status_until: Option<DateTime<Utc>>,
    pub has_video_avatar: bool,
    /// Current profile photo id, if any. Needed for the peer-photo download.
    pub photo_id: Option<i64>,
}

impl Default for PresenceStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Extra user fields only the full-user query returns.
#[derive(Debug, Clone, Default)]
pub struct UserExtra {
    pub bio: Option<String>,
    pub common_chats_count: Option<i32>,
}

/// Base channel/supergroup fields, available right after resolution.
#[derive(Debug, Clone, Default)]
pub struct ChannelProfile {
    pub id: i64,
    pub title: Option<String>,
    pub username: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub megagroup: bool,
    pub broadcast: bool,
    pub forum: bool,
    pub gigagroup: bool,
    pub verified: bool,
    pub scam: bool,
    pub fake: bool,
    pub restricted: bool,
    pub default_banned_rights: Option<String>,
    pub photo_id: Option<i64>,
}

/// Extra channel fields only the full-channel query returns.
#[derive(Debug, Clone, Default)]
pub struct ChannelExtra {
    pub about: Option<String>,
    pub participants_count: Option<i32>,
    pub admins_count: Option<i32>,
    pub kicked_count: Option<i32>,
    pub banned_count: Option<i32>,
    pub online_count: Option<i32>,
    pub slowmode_seconds: Option<i32>,
    pub linked_chat_id: Option<i64>,
    pub stickerset: Option<String>,
    pub location: Option<String>,
    pub theme_emoticon: Option<String>,
}

/// Basic (legacy) group: minimal metadata only.
#[derive(Debug, Clone, Default)]
pub struct GroupProfile {
    pub id: i64,
    pub title: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub photo_id: Option<i64>,
}

/// One entry of a peer's profile-photo history.
#[derive(Debug, Clone)]
pub struct PhotoMeta {
    pub id: i64,
    pub access_hash: i64,
    pub file_reference: Vec<u8>,
    pub date: Option<DateTime<Utc>>,
    /// Thumb size identifier of the largest available rendition.
    pub largest_thumb: String,
}

/// A page of profile photos. `total` is set when the platform reports the
/// overall count (sliced responses), sparing a full enumeration.
#[derive(Debug, Clone, Default)]
pub struct PhotoPage {
    pub photos: Vec<PhotoMeta>,
    pub total: Option<i32>,
}

/// Platform-declared annotation on message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichEntity {
    /// URL hidden behind display text; carries the actual URL.
    TextUrl { url: String },
    /// `@mention`, located by char offset and length in the message text.
    Mention { offset: usize, length: usize },
    /// `#hashtag`, located by char offset and length.
    Hashtag { offset: usize, length: usize },
}

/// A single fetched message, mapped from the platform record.
#[derive(Debug, Clone, Default)]
pub struct MessageRecord {
    pub id: i32,
    pub date: Option<DateTime<Utc>>,
    pub edit_date: Option<DateTime<Utc>>,
    pub text: String,
    pub views: Option<i32>,
    pub forwards: Option<i32>,
    pub replies: Option<i32>,
    pub reactions: Vec<ReactionTally>,
    pub fwd_from: Option<String>,
    pub via_bot_id: Option<i64>,
    pub reply_to_msg_id: Option<i32>,
    pub rich_entities: Vec<RichEntity>,
    pub media: Option<crate::domain::report::MediaInfo>,
    /// Stringified raw platform record, exposed in JSON mode.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReactionTally {
    pub reaction: String,
    pub count: i32,
}
