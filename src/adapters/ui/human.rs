//! Human presenter: one `Label: value` line per populated field.
//!
//! Fields that are None, empty strings or empty sequences are silently
//! omitted. Boolean flag groups render as one comma-joined line of the true
//! flags in declared order, or the literal "none". Styling is a value
//! threaded in from main, not process-wide state; --no-color turns it off.

use std::fmt::Display;

use crossterm::style::Stylize;

use crate::domain::{ChannelInfo, CollectedInfo, GroupInfo, MediaInfo, MessageInfo, UserInfo};

/// Console styling configuration.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub color: bool,
}

impl Styles {
    fn label(&self, text: &str) -> String {
        if self.color {
            format!("{}", text.cyan())
        } else {
            text.to_string()
        }
    }
}

pub struct HumanPresenter {
    styles: Styles,
}

impl HumanPresenter {
    pub fn new(styles: Styles) -> Self {
        Self { styles }
    }

    pub fn render(&self, info: &CollectedInfo) -> String {
        let mut out = String::new();
        match info {
            CollectedInfo::User(u) => self.render_user(&mut out, u),
            CollectedInfo::Channel(c) => self.render_channel(&mut out, c),
            CollectedInfo::Group(g) => self.render_group(&mut out, g),
            CollectedInfo::Message(m) => self.render_message(&mut out, m),
        }
        out
    }

    fn render_user(&self, out: &mut String, u: &UserInfo) {
        self.line(out, "User ID", Some(u.id));
        self.line(out, "First name", u.first_name.as_ref());
        self.line(out, "Last name", u.last_name.as_ref());
        self.line(out, "Username", u.username.as_ref().map(|n| format!("@{n}")));
        self.line(out, "Last seen", Some(&u.last_seen));
        self.flags(
            out,
            "Flags",
            &[
                ("premium", u.premium),
                ("verified", u.verified),
                ("bot", u.bot),
                ("scam", u.scam),
                ("fake", u.fake),
                ("support", u.support),
            ],
        );
        self.line(out, "Emoji status", u.emoji_status.then_some("yes"));
        self.line(out, "Emoji status until", u.emoji_status_until.as_ref());
        self.line(out, "Video avatar", u.has_video_avatar.then_some("yes"));
        self.line(out, "Bot info version", u.bot_info_version);
        self.line(out, "Restriction reason", u.restriction_reason.as_ref());
        self.line(out, "Common chats", u.common_chats_count);
        self.line(out, "Profile photos count", u.profile_photos_count);
        if u.bio.as_deref().is_some_and(|b| !b.is_empty()) {
            self.line(out, "Bio", u.bio.as_ref());
            self.joined(out, "Bio URLs", &u.bio_urls);
            self.joined(out, "Bio mentions", &u.bio_mentions);
            self.joined(out, "Bio hashtags", &u.bio_hashtags);
        }
        self.joined(out, "Downloaded photos", &u.downloaded_photos);
    }

    fn render_channel(&self, out: &mut String, c: &ChannelInfo) {
        self.line(out, "Type", Some(&c.kind));
        self.line(out, "Channel ID", Some(c.id));
        self.line(out, "Title", c.title.as_ref());
        self.line(out, "Username", c.username.as_ref().map(|n| format!("@{n}")));
        self.line(out, "Created", c.created.as_ref());
        self.flags(
            out,
            "Flags",
            &[
                ("verified", c.verified),
                ("scam", c.scam),
                ("fake", c.fake),
                ("restricted", c.restricted),
                ("forum", c.forum),
                ("gigagroup", c.gigagroup),
                ("broadcast", c.broadcast),
                ("megagroup", c.megagroup),
            ],
        );
        self.line(out, "Participants", c.participants_count);
        self.line(out, "Admins", c.admins_count);
        self.line(out, "Online", c.online_count);
        self.line(out, "Banned", c.banned_count);
        self.line(out, "Kicked", c.kicked_count);
        self.line(out, "Slowmode (s)", c.slowmode_seconds);
        self.line(out, "Default banned rights", c.default_banned_rights.as_ref());
        self.line(out, "Linked chat id", c.linked_chat_id);
        self.line(out, "Sticker set", c.stickerset.as_ref());
        self.line(out, "Location", c.location.as_ref());
        self.line(out, "Theme emoticon", c.theme_emoticon.as_ref());
        if c.about.as_deref().is_some_and(|a| !a.is_empty()) {
            self.line(out, "About", c.about.as_ref());
            self.joined(out, "About URLs", &c.about_urls);
            self.joined(out, "About mentions", &c.about_mentions);
            self.joined(out, "About hashtags", &c.about_hashtags);
        }
        self.joined(out, "Downloaded photos", &c.downloaded_photos);
    }

    fn render_group(&self, out: &mut String, g: &GroupInfo) {
        self.line(out, "Type", Some(&g.kind));
        self.line(out, "Group ID", Some(g.id));
        self.line(out, "Title", g.title.as_ref());
        self.line(out, "Created", g.created.as_ref());
        self.joined(out, "Downloaded photos", &g.downloaded_photos);
    }

    fn render_message(&self, out: &mut String, m: &MessageInfo) {
        self.line(out, "Channel", Some(&m.channel));
        self.line(out, "Message ID", Some(m.id));
        self.line(out, "Date", m.date.as_ref());
        self.line(out, "Edited", m.edit_date.as_ref());
        self.line(out, "Views", m.views);
        self.line(out, "Forwards", m.forwards);
        self.line(out, "Replies", m.replies);
        let reactions: Vec<String> = m
            .reactions
            .iter()
            .map(|r| format!("{} x{}", r.reaction, r.count))
            .collect();
        self.joined(out, "Reactions", &reactions);
        self.line(out, "Forwarded from", m.fwd_from.as_ref());
        self.line(out, "Via bot id", m.via_bot_id);
        self.line(out, "Reply to", m.reply_to);
        if !m.text.is_empty() {
            self.line(out, "Text", Some(&m.text));
        }
        self.joined(out, "URLs", &m.entities_found.urls);
        self.joined(out, "Mentions", &m.entities_found.mentions);
        self.joined(out, "Hashtags", &m.entities_found.hashtags);
        if let Some(media) = &m.media {
            self.line(out, "Media", Some(media_line(media)));
        }
        // The raw platform record is JSON-mode only.
    }

    /// Append `Label: value` when there is a value to show.
    fn line<V: Display>(&self, out: &mut String, label: &str, value: Option<V>) {
        if let Some(value) = value {
            let value = value.to_string();
            if value.is_empty() {
                return;
            }
            out.push_str(&self.styles.label(label));
            out.push_str(": ");
            out.push_str(&value);
            out.push('\n');
        }
    }

    /// Comma-joined sequence line, omitted entirely when the sequence is empty.
    fn joined(&self, out: &mut String, label: &str, values: &[String]) {
        if !values.is_empty() {
            self.line(out, label, Some(values.join(", ")));
        }
    }

    /// Flag-group line: the true flags in declared order, or "none".
    fn flags(&self, out: &mut String, label: &str, flags: &[(&str, bool)]) {
        let set: Vec<&str> = flags
            .iter()
            .filter_map(|(name, on)| on.then_some(*name))
            .collect();
        let value = if set.is_empty() {
            "none".to_string()
        } else {
            set.join(", ")
        };
        self.line(out, label, Some(value));
    }
}

fn media_line(media: &MediaInfo) -> String {
    let mut parts = vec![media.kind.clone()];
    if let Some(mime) = &media.mime_type {
        parts.push(format!("mime={mime}"));
    }
    if let Some(size) = media.size {
        parts.push(format!("size={size}"));
    }
    if let Some(name) = &media.file_name {
        parts.push(format!("name={name}"));
    }
    if media.has_photo == Some(true) {
        parts.push("photo".to_string());
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TextEntities;

    fn plain() -> HumanPresenter {
        HumanPresenter::new(Styles { color: false })
    }

    fn user_fixture() -> UserInfo {
        UserInfo {
            kind: "user".to_string(),
            id: 777,
            first_name: Some("Ada".to_string()),
            last_name: None,
            username: Some("ada_l".to_string()),
            last_seen: "recently".to_string(),
            bio: None,
            bio_urls: vec![],
            bio_mentions: vec![],
            bio_hashtags: vec![],
            premium: false,
            verified: false,
            bot: false,
            scam: false,
            fake: false,
            support: false,
            bot_info_version: None,
            restriction_reason: None,
            emoji_status: false,
            emoji_status_until: None,
            has_video_avatar: false,
            common_chats_count: None,
            profile_photos_count: Some(3),
            downloaded_photos: vec![],
            download_error: None,
        }
    }

    #[test]
    fn empty_fields_are_omitted() {
        let text = plain().render(&CollectedInfo::User(user_fixture()));
        assert!(text.contains("User ID: 777\n"));
        assert!(text.contains("Username: @ada_l\n"));
        assert!(!text.contains("Last name"));
        assert!(!text.contains("Bio"));
        assert!(!text.contains("Downloaded photos"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn no_true_flags_renders_none() {
        let text = plain().render(&CollectedInfo::User(user_fixture()));
        assert!(text.contains("Flags: none\n"));
    }

    #[test]
    fn true_flags_render_in_declared_order() {
        let mut u = user_fixture();
        u.premium = true;
        u.bot = true;
        let text = plain().render(&CollectedInfo::User(u));
        assert!(text.contains("Flags: premium, bot\n"));
    }

    #[test]
    fn bio_block_appears_with_extracted_entities() {
        let mut u = user_fixture();
        u.bio = Some("links at https://example.com".to_string());
        u.bio_urls = vec!["https://example.com".to_string()];
        let text = plain().render(&CollectedInfo::User(u));
        assert!(text.contains("Bio: links at https://example.com\n"));
        assert!(text.contains("Bio URLs: https://example.com\n"));
        assert!(!text.contains("Bio mentions"));
    }

    #[test]
    fn message_omits_raw_and_renders_entities() {
        let m = MessageInfo {
            kind: "message".to_string(),
            channel: "mychannel".to_string(),
            id: 42,
            date: Some("2024-01-15 11:30:00 CET".to_string()),
            edit_date: None,
            text: "hello #world".to_string(),
            views: Some(100),
            forwards: None,
            replies: None,
            reactions: vec![],
            fwd_from: None,
            via_bot_id: None,
            reply_to: None,
            entities_found: TextEntities {
                urls: vec![],
                mentions: vec![],
                hashtags: vec!["world".to_string()],
            },
            media: None,
            raw: "raw platform record".to_string(),
        };
        let text = plain().render(&CollectedInfo::Message(m));
        assert!(text.contains("Channel: mychannel\n"));
        assert!(text.contains("Hashtags: world\n"));
        assert!(!text.contains("Edited"));
        assert!(!text.contains("raw platform record"));
    }

    #[test]
    fn color_wraps_labels_only() {
        let styled = HumanPresenter::new(Styles { color: true });
        let text = styled.render(&CollectedInfo::Group(GroupInfo {
            kind: "chat".to_string(),
            id: 1,
            title: Some("t".to_string()),
            created: None,
            downloaded_photos: vec![],
            download_error: None,
        }));
        assert!(text.contains("\u{1b}["));
        assert!(text.contains(": chat\n"));
    }
}
