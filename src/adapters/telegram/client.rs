//! Implements TgGateway using the grammers Client.
//!
//! Raw `invoke` with TL functions throughout; responses are mapped to domain
//! types in `mapper`. RPC failures are classified into the domain error
//! taxonomy here, including FloodWait (code 420) with the mandated wait.

use std::path::Path;

use grammers_client::{Client, InvocationError, tl};
use tracing::{debug, warn};

use crate::adapters::telegram::mapper;
use crate::domain::{
    ChannelExtra, MessageRecord, OsintError, PeerRef, PhotoMeta, PhotoPage, ResolvedTarget,
    UserExtra,
};
use crate::ports::TgGateway;

/// Chunk size for file downloads. Must be a multiple of 4 KiB.
const DOWNLOAD_CHUNK: i32 = 512 * 1024;

/// Telegram gateway adapter. Wraps a grammers Client (cloned from the one
/// used for login; same session).
pub struct GrammersTgGateway {
    client: Client,
}

impl GrammersTgGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn input_user(peer: PeerRef) -> Result<tl::enums::InputUser, OsintError> {
        match peer {
            PeerRef::User { id, access_hash } => {
                Ok(tl::enums::InputUser::User(tl::types::InputUser {
                    user_id: id,
                    access_hash,
                }))
            }
            _ => Err(OsintError::Rpc("expected a user peer".into())),
        }
    }

    fn input_channel(peer: PeerRef) -> Result<tl::enums::InputChannel, OsintError> {
        match peer {
            PeerRef::Channel { id, access_hash } => {
                Ok(tl::enums::InputChannel::Channel(tl::types::InputChannel {
                    channel_id: id,
                    access_hash,
                }))
            }
            _ => Err(OsintError::Rpc("expected a channel peer".into())),
        }
    }

    fn input_peer(peer: PeerRef) -> tl::enums::InputPeer {
        match peer {
            PeerRef::User { id, access_hash } => {
                tl::enums::InputPeer::User(tl::types::InputPeerUser {
                    user_id: id,
                    access_hash,
                })
            }
            PeerRef::Channel { id, access_hash } => {
                tl::enums::InputPeer::Channel(tl::types::InputPeerChannel {
                    channel_id: id,
                    access_hash,
                })
            }
            PeerRef::Group { id } => {
                tl::enums::InputPeer::Chat(tl::types::InputPeerChat { chat_id: id })
            }
        }
    }

    /// Fetch raw file bytes chunk by chunk and write them out.
    async fn fetch_file(
        &self,
        location: tl::enums::InputFileLocation,
        dest: &Path,
    ) -> Result<bool, OsintError> {
        let mut bytes: Vec<u8> = Vec::new();
        let mut offset: i64 = 0;
        loop {
            let req = tl::functions::upload::GetFile {
                precise: true,
                cdn_supported: false,
                location: location.clone(),
                offset,
                limit: DOWNLOAD_CHUNK,
            };
            let chunk = match self.client.invoke(&req).await {
                Ok(tl::enums::upload::File::File(f)) => f.bytes,
                Ok(tl::enums::upload::File::CdnRedirect(_)) => {
                    return Err(OsintError::Rpc("unexpected CDN redirect".into()));
                }
                Err(e) => return Err(map_invocation(e)),
            };
            let len = chunk.len();
            bytes.extend_from_slice(&chunk);
            offset += len as i64;
            if len < DOWNLOAD_CHUNK as usize {
                break;
            }
        }
        if bytes.is_empty() {
            return Ok(false);
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| OsintError::Rpc(format!("write {}: {e}", dest.display())))?;
        debug!(path = %dest.display(), size = bytes.len(), "photo downloaded");
        Ok(true)
    }

    /// Profile-photo history for channels and groups: the platform keeps it
    /// in chat-photo service messages, surfaced via a filtered search.
    async fn chat_photo_history(
        &self,
        peer: PeerRef,
        offset: i32,
        limit: i32,
    ) -> Result<PhotoPage, OsintError> {
        let req = tl::functions::messages::Search {
            peer: Self::input_peer(peer),
            q: String::new(),
            from_id: None,
            saved_peer_id: None,
            saved_reaction: None,
            top_msg_id: None,
            filter: tl::enums::MessagesFilter::InputMessagesFilterChatPhotos,
            min_date: 0,
            max_date: 0,
            offset_id: 0,
            add_offset: offset,
            limit,
            max_id: 0,
            min_id: 0,
            hash: 0,
        };
        let raw = self.client.invoke(&req).await.map_err(map_invocation)?;
        let (messages, total) = split_messages(raw);
        let photos = messages
            .iter()
            .filter_map(|m| match m {
                tl::enums::Message::Service(s) => match &s.action {
                    tl::enums::MessageAction::ChatEditPhoto(a) => mapper::photo_meta(&a.photo),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        Ok(PhotoPage { photos, total })
    }
}

#[async_trait::async_trait]
impl TgGateway for GrammersTgGateway {
    async fn resolve_handle(&self, handle: &str) -> Result<ResolvedTarget, OsintError> {
        let req = tl::functions::contacts::ResolveUsername {
            username: handle.to_string(),
            referer: None,
        };
        let tl::enums::contacts::ResolvedPeer::Peer(resolved) =
            self.client.invoke(&req).await.map_err(map_invocation)?;

        match &resolved.peer {
            tl::enums::Peer::User(p) => resolved
                .users
                .iter()
                .find_map(|u| match u {
                    tl::enums::User::User(u) if u.id == p.user_id => {
                        Some(mapper::target_from_user(u))
                    }
                    _ => None,
                })
                .ok_or_else(|| OsintError::NotFound(format!("user behind @{handle}"))),
            tl::enums::Peer::Channel(p) => resolved
                .chats
                .iter()
                .find_map(|c| match c {
                    tl::enums::Chat::Channel(c) if c.id == p.channel_id => {
                        Some(mapper::target_from_channel(c))
                    }
                    _ => None,
                })
                .ok_or_else(|| OsintError::NotFound(format!("channel behind @{handle}"))),
            tl::enums::Peer::Chat(p) => resolved
                .chats
                .iter()
                .find_map(|c| match c {
                    tl::enums::Chat::Chat(c) if c.id == p.chat_id => {
                        Some(mapper::target_from_group(c))
                    }
                    _ => None,
                })
                .ok_or_else(|| OsintError::NotFound(format!("group behind @{handle}"))),
        }
    }

    async fn resolve_id(&self, id: i64) -> Result<ResolvedTarget, OsintError> {
        // Classification chain: user, then channel/supergroup, then basic
        // group. An id the session has never seen can still fail on the
        // access-hash check; that surfaces as not-found.
        let req = tl::functions::users::GetUsers {
            id: vec![tl::enums::InputUser::User(tl::types::InputUser {
                user_id: id,
                access_hash: 0,
            })],
        };
        match self.client.invoke(&req).await {
            Ok(users) => {
                if let Some(tl::enums::User::User(u)) =
                    users.iter().find(|u| matches!(u, tl::enums::User::User(_)))
                {
                    return Ok(mapper::target_from_user(u));
                }
            }
            Err(e) if is_fatal(&e) => return Err(map_invocation(e)),
            Err(e) => debug!(error = %e, id, "not a reachable user id"),
        }

        let req = tl::functions::channels::GetChannels {
            id: vec![tl::enums::InputChannel::Channel(tl::types::InputChannel {
                channel_id: id,
                access_hash: 0,
            })],
        };
        match self.client.invoke(&req).await {
            Ok(raw) => {
                let chats = split_chats(raw);
                for chat in &chats {
                    if let tl::enums::Chat::Channel(c) = chat {
                        if c.id == id {
                            return Ok(mapper::target_from_channel(c));
                        }
                    }
                }
            }
            Err(e) if is_fatal(&e) => return Err(map_invocation(e)),
            Err(e) => debug!(error = %e, id, "not a reachable channel id"),
        }

        let req = tl::functions::messages::GetChats { id: vec![id] };
        match self.client.invoke(&req).await {
            Ok(raw) => {
                let chats = split_chats(raw);
                for chat in &chats {
                    if let tl::enums::Chat::Chat(g) = chat {
                        if g.id == id {
                            return Ok(mapper::target_from_group(g));
                        }
                    }
                }
            }
            Err(e) if is_fatal(&e) => return Err(map_invocation(e)),
            Err(e) => debug!(error = %e, id, "not a reachable group id"),
        }

        Err(OsintError::NotFound(format!("no entity with id {id}")))
    }

    async fn resolve_internal_channel(
        &self,
        internal_id: i64,
    ) -> Result<ResolvedTarget, OsintError> {
        let req = tl::functions::channels::GetChannels {
            id: vec![tl::enums::InputChannel::Channel(tl::types::InputChannel {
                channel_id: internal_id,
                access_hash: 0,
            })],
        };
        let raw = self.client.invoke(&req).await.map_err(map_invocation)?;
        let chats = split_chats(raw);
        chats
            .iter()
            .find_map(|chat| match chat {
                tl::enums::Chat::Channel(c) if c.id == internal_id => {
                    Some(mapper::target_from_channel(c))
                }
                _ => None,
            })
            .ok_or_else(|| OsintError::NotFound(format!("no channel with id {internal_id}")))
    }

    async fn lookup_phone(&self, phone: &str) -> Result<Option<ResolvedTarget>, OsintError> {
        let contact = tl::enums::InputContact::InputPhoneContact(tl::types::InputPhoneContact {
            client_id: 0,
            phone: phone.to_string(),
            first_name: "Temp".to_string(),
            last_name: "Contact".to_string(),
            note: None,
        });
        let req = tl::functions::contacts::ImportContacts {
            contacts: vec![contact],
        };
        let tl::enums::contacts::ImportedContacts::Contacts(imported) =
            self.client.invoke(&req).await.map_err(map_invocation)?;

        let user = imported.users.iter().find_map(|u| match u {
            tl::enums::User::User(u) => Some(u.clone()),
            _ => None,
        });
        let Some(user) = user else {
            return Ok(None);
        };
        let target = mapper::target_from_user(&user);

        // The import succeeded, so from here the contact must go away no
        // matter what: delete before returning, and only log a failure.
        let del = tl::functions::contacts::DeleteContacts {
            id: vec![tl::enums::InputUser::User(tl::types::InputUser {
                user_id: user.id,
                access_hash: user.access_hash.unwrap_or(0),
            })],
        };
        if let Err(e) = self.client.invoke(&del).await {
            warn!(error = %e, user_id = user.id, "failed to delete transient contact");
        } else {
            debug!(user_id = user.id, "transient contact deleted");
        }

        Ok(Some(target))
    }

    async fn full_user(&self, peer: PeerRef) -> Result<UserExtra, OsintError> {
        let req = tl::functions::users::GetFullUser {
            id: Self::input_user(peer)?,
        };
        let tl::enums::users::UserFull::Full(full) =
            self.client.invoke(&req).await.map_err(map_invocation)?;
        let tl::enums::UserFull::Full(f) = full.full_user;
        Ok(UserExtra {
            bio: f.about,
            common_chats_count: Some(f.common_chats_count),
        })
    }

    async fn full_channel(&self, peer: PeerRef) -> Result<ChannelExtra, OsintError> {
        let req = tl::functions::channels::GetFullChannel {
            channel: Self::input_channel(peer)?,
        };
        let tl::enums::messages::ChatFull::Full(full) =
            self.client.invoke(&req).await.map_err(map_invocation)?;
        match full.full_chat {
            tl::enums::ChatFull::ChannelFull(f) => Ok(ChannelExtra {
                about: Some(f.about).filter(|s| !s.is_empty()),
                participants_count: f.participants_count,
                admins_count: f.admins_count,
                kicked_count: f.kicked_count,
                banned_count: f.banned_count,
                online_count: f.online_count,
                slowmode_seconds: f.slowmode_seconds,
                linked_chat_id: f.linked_chat_id,
                stickerset: f.stickerset.map(|s| format!("{s:?}")),
                location: f.location.map(|l| format!("{l:?}")),
                theme_emoticon: f.theme_emoticon,
            }),
            tl::enums::ChatFull::Full(_) => {
                Err(OsintError::Rpc("expected channelFull for a channel".into()))
            }
        }
    }

    async fn profile_photos(
        &self,
        peer: PeerRef,
        offset: i32,
        limit: i32,
    ) -> Result<PhotoPage, OsintError> {
        match peer {
            PeerRef::User { .. } => {
                let req = tl::functions::photos::GetUserPhotos {
                    user_id: Self::input_user(peer)?,
                    offset,
                    max_id: 0,
                    limit,
                };
                let raw = self.client.invoke(&req).await.map_err(map_invocation)?;
                let (photos, total) = match raw {
                    tl::enums::photos::Photos::Photos(p) => (p.photos, None),
                    tl::enums::photos::Photos::Slice(s) => (s.photos, Some(s.count)),
                };
                Ok(PhotoPage {
                    photos: photos.iter().filter_map(mapper::photo_meta).collect(),
                    total,
                })
            }
            PeerRef::Channel { .. } | PeerRef::Group { .. } => {
                self.chat_photo_history(peer, offset, limit).await
            }
        }
    }

    async fn download_profile_photo(
        &self,
        peer: PeerRef,
        photo_id: i64,
        dest: &Path,
    ) -> Result<bool, OsintError> {
        let location = tl::enums::InputFileLocation::InputPeerPhotoFileLocation(
            tl::types::InputPeerPhotoFileLocation {
                big: true,
                peer: Self::input_peer(peer),
                photo_id,
            },
        );
        self.fetch_file(location, dest).await
    }

    async fn download_photo(&self, photo: &PhotoMeta, dest: &Path) -> Result<bool, OsintError> {
        let location = tl::enums::InputFileLocation::InputPhotoFileLocation(
            tl::types::InputPhotoFileLocation {
                id: photo.id,
                access_hash: photo.access_hash,
                file_reference: photo.file_reference.clone(),
                thumb_size: photo.largest_thumb.clone(),
            },
        );
        self.fetch_file(location, dest).await
    }

    async fn fetch_message(&self, peer: PeerRef, msg_id: i32) -> Result<MessageRecord, OsintError> {
        let ids = vec![tl::enums::InputMessage::Id(tl::types::InputMessageId {
            id: msg_id,
        })];
        let raw = match peer {
            PeerRef::Channel { .. } => {
                let req = tl::functions::channels::GetMessages {
                    channel: Self::input_channel(peer)?,
                    id: ids,
                };
                self.client.invoke(&req).await.map_err(map_invocation)?
            }
            _ => {
                let req = tl::functions::messages::GetMessages { id: ids };
                self.client.invoke(&req).await.map_err(map_invocation)?
            }
        };
        let (messages, _) = split_messages(raw);
        messages
            .iter()
            .find_map(|m| match m {
                tl::enums::Message::Message(m) if m.id == msg_id => {
                    Some(mapper::message_record(m))
                }
                _ => None,
            })
            .ok_or_else(|| OsintError::NotFound(format!("message {msg_id}")))
    }
}

/// Flatten the messages.Messages response family into its message list and,
/// when the response is a slice, the total count.
fn split_messages(raw: tl::enums::messages::Messages) -> (Vec<tl::enums::Message>, Option<i32>) {
    use tl::enums::messages::Messages;
    match raw {
        Messages::Messages(m) => (m.messages, None),
        Messages::Slice(m) => {
            let count = m.count;
            (m.messages, Some(count))
        }
        Messages::ChannelMessages(m) => {
            let count = m.count;
            (m.messages, Some(count))
        }
        Messages::NotModified(_) => (Vec::new(), None),
    }
}

fn split_chats(raw: tl::enums::messages::Chats) -> Vec<tl::enums::Chat> {
    match raw {
        tl::enums::messages::Chats::Chats(c) => c.chats,
        tl::enums::messages::Chats::Slice(c) => c.chats,
    }
}

/// Errors that must abort a classification chain instead of moving on to the
/// next candidate kind.
fn is_fatal(err: &InvocationError) -> bool {
    matches!(err, InvocationError::Rpc(rpc) if rpc.code == 420)
}

/// Classify an RPC failure into the domain taxonomy.
fn map_invocation(err: InvocationError) -> OsintError {
    match err {
        InvocationError::Rpc(rpc) => {
            if rpc.code == 420 {
                return OsintError::FloodWait {
                    seconds: u64::from(rpc.value.unwrap_or(60)),
                };
            }
            match rpc.name.as_str() {
                "USERNAME_NOT_OCCUPIED" => OsintError::NotFound("username not occupied".into()),
                "USERNAME_INVALID" => OsintError::InvalidHandle("username rejected".into()),
                "CHANNEL_PRIVATE" => {
                    OsintError::AccessDenied("chat/channel is private or requires membership".into())
                }
                "CHAT_ADMIN_REQUIRED" => {
                    OsintError::AdminRequired("operation needs admin rights".into())
                }
                _ => OsintError::Rpc(format!("{} (code {})", rpc.name, rpc.code)),
            }
        }
        other => OsintError::Rpc(other.to_string()),
    }
}
