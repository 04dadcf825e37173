//! Outbound port. Application calls into infrastructure.
//!
//! Implemented by the grammers adapter; tests implement it with a mock.

use std::path::Path;

use crate::domain::{
    ChannelExtra, MessageRecord, OsintError, PeerRef, PhotoMeta, PhotoPage, ResolvedTarget,
    UserExtra,
};

/// Telegram API gateway. Resolve targets, fetch full metadata, download photos.
#[async_trait::async_trait]
pub trait TgGateway: Send + Sync {
    /// Resolve a public handle (without the leading `@`) to a classified target.
    async fn resolve_handle(&self, handle: &str) -> Result<ResolvedTarget, OsintError>;

    /// Resolve a bare numeric id. Classification is a chain: user, then
    /// channel/supergroup, then basic group.
    async fn resolve_id(&self, id: i64) -> Result<ResolvedTarget, OsintError>;

    /// Resolve the raw channel id embedded in `/c/<id>/<msg>` message URLs.
    async fn resolve_internal_channel(&self, internal_id: i64)
        -> Result<ResolvedTarget, OsintError>;

    /// Discover the user behind a phone number via a transient contact import.
    /// The imported contact is deleted again on every path after the import
    /// succeeds, so the operator's contact list is never polluted.
    /// Returns `None` when no account is attached to the number.
    async fn lookup_phone(&self, phone: &str) -> Result<Option<ResolvedTarget>, OsintError>;

    /// Full-user query: bio and common-chats count.
    async fn full_user(&self, peer: PeerRef) -> Result<UserExtra, OsintError>;

    /// Full-channel query: about text, counters, linked chat, location.
    async fn full_channel(&self, peer: PeerRef) -> Result<ChannelExtra, OsintError>;

    /// One page of the peer's profile-photo history.
    async fn profile_photos(
        &self,
        peer: PeerRef,
        offset: i32,
        limit: i32,
    ) -> Result<PhotoPage, OsintError>;

    /// Download the current profile photo (`photo_id` from the base profile).
    /// Returns false when the peer has no downloadable photo.
    async fn download_profile_photo(
        &self,
        peer: PeerRef,
        photo_id: i64,
        dest: &Path,
    ) -> Result<bool, OsintError>;

    /// Download one historical profile photo.
    async fn download_photo(&self, photo: &PhotoMeta, dest: &Path) -> Result<bool, OsintError>;

    /// Fetch a single message by id from the given peer.
    async fn fetch_message(&self, peer: PeerRef, msg_id: i32) -> Result<MessageRecord, OsintError>;
}
