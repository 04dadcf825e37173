//! Entity Collectors: one full-info query per target, assembled into a
//! CollectedInfo record.
//!
//! Photo downloads are best-effort: rate limits and RPC failures during a
//! download are recorded in `download_error` and never abort the collection.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    ChannelInfo, ChannelProfile, CollectedInfo, GroupInfo, GroupProfile, MessageInfo, OsintError,
    PeerRef, ResolvedTarget, RichEntity, TargetProfile, TextEntities, UserInfo, UserProfile,
};
use crate::ports::TgGateway;
use crate::usecases::extract::extract_from_text;
use crate::usecases::presence::last_seen_phrase;
use crate::usecases::timefmt::format_instant;

/// Page size for profile-photo enumeration.
const PHOTO_PAGE: i32 = 100;

#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub tz: Tz,
    pub photos: bool,
    pub limit_photos: usize,
    /// Guard against unbounded photo-history enumeration.
    pub photo_scan_cap: usize,
}

/// Gathers and assembles all metadata for one target kind.
pub struct Collector {
    tg: Arc<dyn TgGateway>,
    opts: CollectOptions,
}

impl Collector {
    pub fn new(tg: Arc<dyn TgGateway>, opts: CollectOptions) -> Self {
        Self { tg, opts }
    }

    pub async fn user(
        &self,
        peer: PeerRef,
        profile: &UserProfile,
    ) -> Result<UserInfo, OsintError> {
        let extra = self.tg.full_user(peer).await?;
        let bio_entities = extract_from_text(extra.bio.as_deref());
        let profile_photos_count = self.count_photos(peer).await;
        let (downloaded_photos, download_error) =
            self.maybe_download_photos(peer, profile.photo_id, profile.id).await;

        Ok(UserInfo {
            kind: "user".to_string(),
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            username: profile.username.clone(),
            last_seen: last_seen_phrase(&profile.status, self.opts.tz),
            bio: extra.bio,
            bio_urls: bio_entities.urls,
            bio_mentions: bio_entities.mentions,
            bio_hashtags: bio_entities.hashtags,
            premium: profile.premium,
            verified: profile.verified,
            bot: profile.bot,
            scam: profile.scam,
            fake: profile.fake,
            support: profile.support,
            bot_info_version: profile.bot_info_version,
            restriction_reason: profile.restriction_reason.clone(),
            emoji_status: profile.has_emoji_status,
            emoji_status_until: format_instant(profile.emoji_status_until, self.opts.tz),
            has_video_avatar: profile.has_video_avatar,
            common_chats_count: extra.common_chats_count,
            profile_photos_count,
            downloaded_photos,
            download_error,
        })
    }

    pub async fn channel(
        &self,
        peer: PeerRef,
        profile: &ChannelProfile,
    ) -> Result<ChannelInfo, OsintError> {
        let extra = self.tg.full_channel(peer).await?;
        let about_entities = extract_from_text(extra.about.as_deref());
        let (downloaded_photos, download_error) =
            self.maybe_download_photos(peer, profile.photo_id, profile.id).await;

        Ok(ChannelInfo {
            kind: if profile.megagroup {
                "supergroup".to_string()
            } else {
                "channel".to_string()
            },
            id: profile.id,
            title: profile.title.clone(),
            username: profile.username.clone(),
            created: format_instant(profile.created, self.opts.tz),
            about: extra.about,
            about_urls: about_entities.urls,
            about_mentions: about_entities.mentions,
            about_hashtags: about_entities.hashtags,
            megagroup: profile.megagroup,
            broadcast: profile.broadcast,
            forum: profile.forum,
            gigagroup: profile.gigagroup,
            verified: profile.verified,
            scam: profile.scam,
            fake: profile.fake,
            restricted: profile.restricted,
            participants_count: extra.participants_count,
            admins_count: extra.admins_count,
            kicked_count: extra.kicked_count,
            banned_count: extra.banned_count,
            online_count: extra.online_count,
            slowmode_seconds: extra.slowmode_seconds,
            default_banned_rights: profile.default_banned_rights.clone(),
            linked_chat_id: extra.linked_chat_id,
            stickerset: extra.stickerset,
            location: extra.location,
            theme_emoticon: extra.theme_emoticon,
            downloaded_photos,
            download_error,
        })
    }

    pub async fn group(
        &self,
        peer: PeerRef,
        profile: &GroupProfile,
    ) -> Result<GroupInfo, OsintError> {
        let (downloaded_photos, download_error) =
            self.maybe_download_photos(peer, profile.photo_id, profile.id).await;

        Ok(GroupInfo {
            kind: "chat".to_string(),
            id: profile.id,
            title: profile.title.clone(),
            created: format_instant(profile.created, self.opts.tz),
            downloaded_photos,
            download_error,
        })
    }

    /// Parse a public message URL, resolve the channel reference, fetch the
    /// message and merge pattern-matched with platform-declared entities.
    pub async fn message(&self, url: &str) -> Result<MessageInfo, OsintError> {
        let locator = parse_message_url(url)?;
        let target = match &locator.channel {
            ChannelKey::Handle(handle) => self.tg.resolve_handle(handle).await?,
            ChannelKey::Internal(id) => self.tg.resolve_internal_channel(*id).await?,
        };
        let record = self.tg.fetch_message(target.peer, locator.message_id).await?;

        let plain = extract_from_text(Some(&record.text));
        let mut urls: BTreeSet<String> = plain.urls.into_iter().collect();
        let mut mentions: BTreeSet<String> = plain.mentions.into_iter().collect();
        let mut hashtags: BTreeSet<String> = plain.hashtags.into_iter().collect();
        for entity in &record.rich_entities {
            match entity {
                RichEntity::TextUrl { url } => {
                    urls.insert(url.clone());
                }
                RichEntity::Mention { offset, length } => {
                    if let Some(s) = slice_chars(&record.text, *offset, *length) {
                        mentions.insert(s.trim_start_matches('@').to_string());
                    }
                }
                RichEntity::Hashtag { offset, length } => {
                    if let Some(s) = slice_chars(&record.text, *offset, *length) {
                        hashtags.insert(s.trim_start_matches('#').to_string());
                    }
                }
            }
        }

        let channel = match &target.profile {
            TargetProfile::Channel(c) => c.username.clone().unwrap_or_else(|| c.id.to_string()),
            TargetProfile::User(u) => u.username.clone().unwrap_or_else(|| u.id.to_string()),
            TargetProfile::Group(g) => g.id.to_string(),
        };

        Ok(MessageInfo {
            kind: "message".to_string(),
            channel,
            id: record.id,
            date: format_instant(record.date, self.opts.tz),
            edit_date: format_instant(record.edit_date, self.opts.tz),
            text: record.text,
            views: record.views,
            forwards: record.forwards,
            replies: record.replies,
            reactions: record.reactions,
            fwd_from: record.fwd_from,
            via_bot_id: record.via_bot_id,
            reply_to: record.reply_to_msg_id,
            entities_found: TextEntities {
                urls: urls.into_iter().collect(),
                mentions: mentions.into_iter().collect(),
                hashtags: hashtags.into_iter().collect(),
            },
            media: record.media,
            raw: record.raw,
        })
    }

    /// Run the collector matching the resolved target's runtime kind.
    pub async fn collect_resolved(
        &self,
        target: &ResolvedTarget,
    ) -> Result<CollectedInfo, OsintError> {
        match &target.profile {
            TargetProfile::User(p) => Ok(CollectedInfo::User(self.user(target.peer, p).await?)),
            TargetProfile::Channel(p) => {
                Ok(CollectedInfo::Channel(self.channel(target.peer, p).await?))
            }
            TargetProfile::Group(p) => Ok(CollectedInfo::Group(self.group(target.peer, p).await?)),
        }
    }

    /// Count profile photos by paged enumeration, bounded by the scan cap.
    /// Failures are non-fatal and leave the count unknown.
    async fn count_photos(&self, peer: PeerRef) -> Option<usize> {
        let mut total = 0usize;
        let mut offset = 0i32;
        loop {
            let page = match self.tg.profile_photos(peer, offset, PHOTO_PAGE).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(error = %e, "photo enumeration failed, count unknown");
                    return None;
                }
            };
            if let Some(count) = page.total {
                return Some(count.max(0) as usize);
            }
            if page.photos.is_empty() {
                return Some(total);
            }
            total += page.photos.len();
            offset += page.photos.len() as i32;
            if total >= self.opts.photo_scan_cap {
                return Some(total);
            }
        }
    }

    async fn maybe_download_photos(
        &self,
        peer: PeerRef,
        photo_id: Option<i64>,
        owner_id: i64,
    ) -> (Vec<String>, Option<String>) {
        if !self.opts.photos {
            return (Vec::new(), None);
        }
        let mut saved = Vec::new();
        match self.download_photos(peer, photo_id, owner_id, &mut saved).await {
            Ok(()) => (saved, None),
            Err(OsintError::FloodWait { seconds }) => {
                warn!(seconds, "rate limited while downloading photos");
                (saved, Some(format!("Rate limited: wait {seconds}s")))
            }
            Err(e) => {
                warn!(error = %e, "photo download failed");
                (saved, Some(e.to_string()))
            }
        }
    }

    /// Current profile photo first (named by the owner's id), then history up
    /// to `limit_photos`, each named by its timestamp or an ordinal fallback.
    async fn download_photos(
        &self,
        peer: PeerRef,
        photo_id: Option<i64>,
        owner_id: i64,
        saved: &mut Vec<String>,
    ) -> Result<(), OsintError> {
        if let Some(photo_id) = photo_id {
            let path = format!("{owner_id}.jpg");
            if self
                .tg
                .download_profile_photo(peer, photo_id, Path::new(&path))
                .await?
            {
                saved.push(path);
            }
        }
        let mut fetched = 0usize;
        let mut offset = 0i32;
        'pages: loop {
            let page = self.tg.profile_photos(peer, offset, PHOTO_PAGE).await?;
            if page.photos.is_empty() {
                break;
            }
            offset += page.photos.len() as i32;
            for photo in &page.photos {
                if fetched >= self.opts.limit_photos {
                    break 'pages;
                }
                let stem = photo
                    .date
                    .map(|d| d.format("%Y%m%d_%H%M%S").to_string())
                    .unwrap_or_else(|| format!("photo_{fetched}"));
                let path = format!("{stem}.jpg");
                if self.tg.download_photo(photo, Path::new(&path)).await? {
                    saved.push(path);
                }
                fetched += 1;
            }
        }
        Ok(())
    }
}

/// Channel reference inside a message URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKey {
    Handle(String),
    Internal(i64),
}

/// A message URL decomposed into its channel reference and message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLocator {
    pub channel: ChannelKey,
    pub message_id: i32,
}

/// Parse `https://t.me/<handle>/<msg_id>` or `https://t.me/c/<internal>/<msg_id>`.
/// Any other shape, or a non-integer message id, is a format error.
pub fn parse_message_url(raw: &str) -> Result<MessageLocator, OsintError> {
    let parsed = Url::parse(raw).map_err(|e| OsintError::BadUrl(format!("{raw}: {e}")))?;
    let parts: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let (channel, msg_part) = match parts.as_slice() {
        ["c", internal, msg_id, ..] => {
            let internal = internal.parse::<i64>().map_err(|_| {
                OsintError::BadUrl(format!("internal chat id must be an integer: {internal}"))
            })?;
            (ChannelKey::Internal(internal), *msg_id)
        }
        ["c", ..] => {
            return Err(OsintError::BadUrl(format!(
                "expected /c/<internal_id>/<message_id>: {raw}"
            )));
        }
        [handle, msg_id, ..] => (ChannelKey::Handle((*handle).to_string()), *msg_id),
        _ => {
            return Err(OsintError::BadUrl(format!(
                "expected /<channel>/<message_id> or /c/<internal_id>/<message_id>: {raw}"
            )));
        }
    };

    let message_id = msg_part
        .parse::<i32>()
        .map_err(|_| OsintError::BadUrl(format!("message id must be an integer: {msg_part}")))?;

    Ok(MessageLocator {
        channel,
        message_id,
    })
}

/// Substring by char offset and length, the way the platform locates rich
/// entities. Returns None when the range falls outside the text.
fn slice_chars(text: &str, offset: usize, length: usize) -> Option<String> {
    let slice: String = text.chars().skip(offset).take(length).collect();
    if slice.chars().count() == length {
        Some(slice)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_handle_url_parses() {
        let loc = parse_message_url("https://t.me/mychannel/42").unwrap();
        assert_eq!(loc.channel, ChannelKey::Handle("mychannel".to_string()));
        assert_eq!(loc.message_id, 42);
    }

    #[test]
    fn internal_id_url_parses() {
        let loc = parse_message_url("https://t.me/c/100200300/7").unwrap();
        assert_eq!(loc.channel, ChannelKey::Internal(100200300));
        assert_eq!(loc.message_id, 7);
    }

    #[test]
    fn single_segment_is_a_format_error() {
        assert!(matches!(
            parse_message_url("https://t.me/onlyone"),
            Err(OsintError::BadUrl(_))
        ));
    }

    #[test]
    fn non_integer_message_id_is_a_format_error() {
        assert!(matches!(
            parse_message_url("https://t.me/mychannel/notanumber"),
            Err(OsintError::BadUrl(_))
        ));
    }

    #[test]
    fn short_internal_url_is_a_format_error() {
        assert!(matches!(
            parse_message_url("https://t.me/c/100200300"),
            Err(OsintError::BadUrl(_))
        ));
    }

    #[test]
    fn not_a_url_is_a_format_error() {
        assert!(matches!(
            parse_message_url("mychannel/42"),
            Err(OsintError::BadUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let loc = parse_message_url("https://t.me/mychannel/42/").unwrap();
        assert_eq!(loc.message_id, 42);
    }

    #[test]
    fn slice_chars_follows_char_offsets() {
        assert_eq!(slice_chars("hi @user_name", 3, 10).as_deref(), Some("@user_name"));
        // Offsets count chars, not bytes.
        assert_eq!(slice_chars("héllo #tag", 6, 4).as_deref(), Some("#tag"));
        assert_eq!(slice_chars("short", 3, 10), None);
    }
}
