//! Map grammers TL types to domain entities.
//!
//! Everything the rest of the pipeline sees comes through here; no TL type
//! leaves this module. Non-primitive platform values the record only carries
//! for display (forward headers, banned rights, sticker sets) are
//! stringified at this boundary.

use chrono::{DateTime, Utc};
use grammers_client::tl;

use crate::domain::{
    ChannelProfile, GroupProfile, MediaInfo, MessageRecord, PeerRef, PhotoMeta, PresenceStatus,
    ReactionTally, ResolvedTarget, RichEntity, TargetProfile, UserProfile,
};

fn ts(secs: i32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(secs), 0)
}

pub fn presence(status: Option<&tl::enums::UserStatus>) -> PresenceStatus {
    match status {
        None => PresenceStatus::Unknown,
        Some(tl::enums::UserStatus::Empty) => PresenceStatus::Empty,
        Some(tl::enums::UserStatus::Online(_)) => PresenceStatus::Online,
        Some(tl::enums::UserStatus::Offline(s)) => PresenceStatus::Offline {
            was_online: ts(s.was_online),
        },
        Some(tl::enums::UserStatus::Recently(_)) => PresenceStatus::Recently,
        Some(tl::enums::UserStatus::LastWeek(_)) => PresenceStatus::LastWeek,
        Some(tl::enums::UserStatus::LastMonth(_)) => PresenceStatus::LastMonth,
    }
}

pub fn user_peer(u: &tl::types::User) -> PeerRef {
    PeerRef::User {
        id: u.id,
        access_hash: u.access_hash.unwrap_or(0),
    }
}

pub fn user_profile(u: &tl::types::User) -> UserProfile {
    let (photo_id, has_video_avatar) = match &u.photo {
        Some(tl::enums::UserProfilePhoto::Photo(p)) => (Some(p.photo_id), p.has_video),
        _ => (None, false),
    };
    let (has_emoji_status, emoji_status_until) = match &u.emoji_status {
        Some(tl::enums::EmojiStatus::Status(s)) => (true, s.until.and_then(ts)),
        Some(tl::enums::EmojiStatus::Empty) => (false, None),
        Some(_) => (true, None),
        None => (false, None),
    };
    UserProfile {
        id: u.id,
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        username: u.username.clone(),
        status: presence(u.status.as_ref()),
        premium: u.premium,
        verified: u.verified,
        bot: u.bot,
        scam: u.scam,
        fake: u.fake,
        support: u.support,
        bot_info_version: u.bot_info_version,
        restriction_reason: restriction_text(u.restriction_reason.as_deref()),
        has_emoji_status,
        emoji_status_until,
        has_video_avatar,
        photo_id,
    }
}

pub fn target_from_user(u: &tl::types::User) -> ResolvedTarget {
    ResolvedTarget {
        peer: user_peer(u),
        profile: TargetProfile::User(user_profile(u)),
    }
}

pub fn channel_peer(c: &tl::types::Channel) -> PeerRef {
    PeerRef::Channel {
        id: c.id,
        access_hash: c.access_hash.unwrap_or(0),
    }
}

pub fn channel_profile(c: &tl::types::Channel) -> ChannelProfile {
    ChannelProfile {
        id: c.id,
        title: Some(c.title.clone()),
        username: c.username.clone(),
        created: ts(c.date),
        megagroup: c.megagroup,
        broadcast: c.broadcast,
        forum: c.forum,
        gigagroup: c.gigagroup,
        verified: c.verified,
        scam: c.scam,
        fake: c.fake,
        restricted: c.restricted,
        default_banned_rights: c
            .default_banned_rights
            .as_ref()
            .map(|r| format!("{r:?}")),
        photo_id: chat_photo_id(&c.photo),
    }
}

pub fn target_from_channel(c: &tl::types::Channel) -> ResolvedTarget {
    ResolvedTarget {
        peer: channel_peer(c),
        profile: TargetProfile::Channel(channel_profile(c)),
    }
}

pub fn group_profile(g: &tl::types::Chat) -> GroupProfile {
    GroupProfile {
        id: g.id,
        title: Some(g.title.clone()),
        created: ts(g.date),
        photo_id: chat_photo_id(&g.photo),
    }
}

pub fn target_from_group(g: &tl::types::Chat) -> ResolvedTarget {
    ResolvedTarget {
        peer: PeerRef::Group { id: g.id },
        profile: TargetProfile::Group(group_profile(g)),
    }
}

fn chat_photo_id(photo: &tl::enums::ChatPhoto) -> Option<i64> {
    match photo {
        tl::enums::ChatPhoto::Photo(p) => Some(p.photo_id),
        tl::enums::ChatPhoto::Empty => None,
    }
}

fn restriction_text(reasons: Option<&[tl::enums::RestrictionReason]>) -> Option<String> {
    let reasons = reasons?;
    if reasons.is_empty() {
        return None;
    }
    Some(
        reasons
            .iter()
            .map(|r| {
                let tl::enums::RestrictionReason::Reason(r) = r;
                format!("{}-{}: {}", r.platform, r.reason, r.text)
            })
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Metadata for one photo of a profile-photo history entry.
pub fn photo_meta(photo: &tl::enums::Photo) -> Option<PhotoMeta> {
    match photo {
        tl::enums::Photo::Photo(p) => Some(PhotoMeta {
            id: p.id,
            access_hash: p.access_hash,
            file_reference: p.file_reference.clone(),
            date: ts(p.date),
            largest_thumb: largest_thumb(&p.sizes),
        }),
        tl::enums::Photo::Empty(_) => None,
    }
}

// Sizes come ordered smallest to largest; stripped/path entries carry no
// downloadable rendition.
fn largest_thumb(sizes: &[tl::enums::PhotoSize]) -> String {
    sizes
        .iter()
        .rev()
        .find_map(|s| match s {
            tl::enums::PhotoSize::Size(x) => Some(x.r#type.clone()),
            tl::enums::PhotoSize::Progressive(x) => Some(x.r#type.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "x".to_string())
}

pub fn message_record(m: &tl::types::Message) -> MessageRecord {
    let replies = m.replies.as_ref().map(|r| {
        let tl::enums::MessageReplies::Replies(r) = r;
        r.replies
    });
    let reactions = m
        .reactions
        .as_ref()
        .map(|r| {
            let tl::enums::MessageReactions::Reactions(r) = r;
            r.results
                .iter()
                .map(|rc| {
                    let tl::enums::ReactionCount::Count(rc) = rc;
                    ReactionTally {
                        reaction: reaction_text(&rc.reaction),
                        count: rc.count,
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    let reply_to_msg_id = m.reply_to.as_ref().and_then(|r| match r {
        tl::enums::MessageReplyHeader::Header(h) => h.reply_to_msg_id,
        _ => None,
    });

    MessageRecord {
        id: m.id,
        date: ts(m.date),
        edit_date: m.edit_date.and_then(ts),
        text: m.message.clone(),
        views: m.views,
        forwards: m.forwards,
        replies,
        reactions,
        fwd_from: m.fwd_from.as_ref().map(|f| format!("{f:?}")),
        via_bot_id: m.via_bot_id,
        reply_to_msg_id,
        rich_entities: rich_entities(m.entities.as_deref().unwrap_or_default()),
        media: media_info(m.media.as_ref()),
        raw: format!("{m:?}"),
    }
}

fn reaction_text(reaction: &tl::enums::Reaction) -> String {
    match reaction {
        tl::enums::Reaction::Emoji(e) => e.emoticon.clone(),
        tl::enums::Reaction::CustomEmoji(e) => format!("custom:{}", e.document_id),
        tl::enums::Reaction::Empty | tl::enums::Reaction::Paid => String::new(),
    }
}

fn rich_entities(entities: &[tl::enums::MessageEntity]) -> Vec<RichEntity> {
    entities
        .iter()
        .filter_map(|e| match e {
            tl::enums::MessageEntity::TextUrl(t) => Some(RichEntity::TextUrl {
                url: t.url.clone(),
            }),
            tl::enums::MessageEntity::Mention(e) => Some(RichEntity::Mention {
                offset: e.offset as usize,
                length: e.length as usize,
            }),
            tl::enums::MessageEntity::Hashtag(e) => Some(RichEntity::Hashtag {
                offset: e.offset as usize,
                length: e.length as usize,
            }),
            _ => None,
        })
        .collect()
}

fn media_info(media: Option<&tl::enums::MessageMedia>) -> Option<MediaInfo> {
    let media = media?;
    let mut info = MediaInfo {
        kind: media_kind(media).to_string(),
        mime_type: None,
        size: None,
        file_name: None,
        has_photo: None,
    };
    match media {
        tl::enums::MessageMedia::Photo(_) => {
            info.has_photo = Some(true);
        }
        tl::enums::MessageMedia::Document(d) => {
            if let Some(tl::enums::Document::Document(doc)) = d.document.as_ref() {
                info.mime_type = Some(doc.mime_type.clone());
                info.size = Some(doc.size);
                // First attribute exposing a filename wins.
                info.file_name = doc.attributes.iter().find_map(|a| match a {
                    tl::enums::DocumentAttribute::Filename(f) => Some(f.file_name.clone()),
                    _ => None,
                });
            }
        }
        _ => {}
    }
    Some(info)
}

fn media_kind(media: &tl::enums::MessageMedia) -> &'static str {
    match media {
        tl::enums::MessageMedia::Photo(_) => "MessageMediaPhoto",
        tl::enums::MessageMedia::Document(_) => "MessageMediaDocument",
        tl::enums::MessageMedia::Geo(_) => "MessageMediaGeo",
        tl::enums::MessageMedia::Contact(_) => "MessageMediaContact",
        tl::enums::MessageMedia::WebPage(_) => "MessageMediaWebPage",
        tl::enums::MessageMedia::Venue(_) => "MessageMediaVenue",
        tl::enums::MessageMedia::Game(_) => "MessageMediaGame",
        tl::enums::MessageMedia::Invoice(_) => "MessageMediaInvoice",
        tl::enums::MessageMedia::GeoLive(_) => "MessageMediaGeoLive",
        tl::enums::MessageMedia::Poll(_) => "MessageMediaPoll",
        tl::enums::MessageMedia::Dice(_) => "MessageMediaDice",
        _ => "MessageMediaOther",
    }
}
