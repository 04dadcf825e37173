//! End-to-end pipeline tests against a mock gateway: dispatch by runtime
//! kind, entity merging, and photo-failure isolation.

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;

use tg_lens::domain::{
    ChannelExtra, ChannelProfile, CollectedInfo, MessageRecord, OsintError, PeerRef, PhotoMeta,
    PhotoPage, PresenceStatus, ResolvedTarget, RichEntity, TargetProfile, UserExtra, UserProfile,
};
use tg_lens::ports::TgGateway;
use tg_lens::usecases::{CollectOptions, Collector, Dispatcher, TargetSelector};

#[derive(Default)]
struct MockGateway {
    target: Option<ResolvedTarget>,
    phone_hit: bool,
    message: Option<MessageRecord>,
    user_extra: UserExtra,
    channel_extra: ChannelExtra,
    photos: Vec<PhotoMeta>,
    fail_photo_downloads: bool,
}

impl MockGateway {
    fn target(&self) -> Result<ResolvedTarget, OsintError> {
        self.target
            .clone()
            .ok_or_else(|| OsintError::NotFound("no mock target".into()))
    }
}

#[async_trait::async_trait]
impl TgGateway for MockGateway {
    async fn resolve_handle(&self, _handle: &str) -> Result<ResolvedTarget, OsintError> {
        self.target()
    }

    async fn resolve_id(&self, _id: i64) -> Result<ResolvedTarget, OsintError> {
        self.target()
    }

    async fn resolve_internal_channel(
        &self,
        _internal_id: i64,
    ) -> Result<ResolvedTarget, OsintError> {
        self.target()
    }

    async fn lookup_phone(&self, _phone: &str) -> Result<Option<ResolvedTarget>, OsintError> {
        if self.phone_hit {
            self.target().map(Some)
        } else {
            Ok(None)
        }
    }

    async fn full_user(&self, _peer: PeerRef) -> Result<UserExtra, OsintError> {
        Ok(self.user_extra.clone())
    }

    async fn full_channel(&self, _peer: PeerRef) -> Result<ChannelExtra, OsintError> {
        Ok(self.channel_extra.clone())
    }

    async fn profile_photos(
        &self,
        _peer: PeerRef,
        offset: i32,
        _limit: i32,
    ) -> Result<PhotoPage, OsintError> {
        // Single page of history; a second request sees the end.
        if offset == 0 {
            Ok(PhotoPage {
                photos: self.photos.clone(),
                total: Some(self.photos.len() as i32),
            })
        } else {
            Ok(PhotoPage::default())
        }
    }

    async fn download_profile_photo(
        &self,
        _peer: PeerRef,
        _photo_id: i64,
        _dest: &Path,
    ) -> Result<bool, OsintError> {
        if self.fail_photo_downloads {
            return Err(OsintError::FloodWait { seconds: 30 });
        }
        Ok(true)
    }

    async fn download_photo(&self, _photo: &PhotoMeta, _dest: &Path) -> Result<bool, OsintError> {
        if self.fail_photo_downloads {
            return Err(OsintError::FloodWait { seconds: 30 });
        }
        Ok(true)
    }

    async fn fetch_message(
        &self,
        _peer: PeerRef,
        _msg_id: i32,
    ) -> Result<MessageRecord, OsintError> {
        self.message
            .clone()
            .ok_or_else(|| OsintError::NotFound("no mock message".into()))
    }
}

fn paris() -> Tz {
    "Europe/Paris".parse().unwrap()
}

fn options(photos: bool) -> CollectOptions {
    CollectOptions {
        tz: paris(),
        photos,
        limit_photos: 10,
        photo_scan_cap: 1_000_000,
    }
}

fn dispatcher_with(mock: MockGateway, photos: bool) -> Dispatcher {
    let tg: Arc<dyn TgGateway> = Arc::new(mock);
    let collector = Collector::new(Arc::clone(&tg), options(photos));
    Dispatcher::new(tg, collector)
}

fn user_target() -> ResolvedTarget {
    ResolvedTarget {
        peer: PeerRef::User {
            id: 777,
            access_hash: 1,
        },
        profile: TargetProfile::User(UserProfile {
            id: 777,
            first_name: Some("Ada".to_string()),
            username: Some("ada_l".to_string()),
            status: PresenceStatus::Recently,
            premium: true,
            photo_id: Some(900),
            ..Default::default()
        }),
    }
}

fn channel_target(megagroup: bool) -> ResolvedTarget {
    ResolvedTarget {
        peer: PeerRef::Channel {
            id: 100200300,
            access_hash: 2,
        },
        profile: TargetProfile::Channel(ChannelProfile {
            id: 100200300,
            title: Some("News".to_string()),
            username: Some("mychannel".to_string()),
            megagroup,
            broadcast: !megagroup,
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn id_selector_dispatches_on_runtime_kind() {
    // An --id that resolves to a channel must yield a channel record.
    let mock = MockGateway {
        target: Some(channel_target(false)),
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, false);
    let info = dispatcher
        .run(&TargetSelector::Id(100200300))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::Channel(c) => {
            assert_eq!(c.kind, "channel");
            assert_eq!(c.id, 100200300);
        }
        other => panic!("expected channel record, got {other:?}"),
    }
}

#[tokio::test]
async fn megagroup_is_reported_as_supergroup() {
    let mock = MockGateway {
        target: Some(channel_target(true)),
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, false);
    let info = dispatcher
        .run(&TargetSelector::Handle("@mychannel".to_string()))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::Channel(c) => assert_eq!(c.kind, "supergroup"),
        other => panic!("expected channel record, got {other:?}"),
    }
}

#[tokio::test]
async fn user_bio_entities_are_extracted() {
    let mock = MockGateway {
        target: Some(user_target()),
        user_extra: UserExtra {
            bio: Some("reach me at https://ada.example or @ada_backup #lovelace".to_string()),
            common_chats_count: Some(2),
        },
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, false);
    let info = dispatcher
        .run(&TargetSelector::Handle("ada_l".to_string()))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::User(u) => {
            assert_eq!(u.kind, "user");
            assert_eq!(u.last_seen, "recently");
            assert_eq!(u.bio_urls, vec!["https://ada.example"]);
            assert_eq!(u.bio_mentions, vec!["ada_backup"]);
            assert_eq!(u.bio_hashtags, vec!["lovelace"]);
            assert_eq!(u.profile_photos_count, Some(0));
            assert!(u.download_error.is_none());
        }
        other => panic!("expected user record, got {other:?}"),
    }
}

#[tokio::test]
async fn photo_failure_never_aborts_collection() {
    let mock = MockGateway {
        target: Some(user_target()),
        fail_photo_downloads: true,
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, true);
    let info = dispatcher
        .run(&TargetSelector::Handle("ada_l".to_string()))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::User(u) => {
            // The record is still fully populated.
            assert_eq!(u.id, 777);
            assert_eq!(u.first_name.as_deref(), Some("Ada"));
            assert!(u.downloaded_photos.is_empty());
            let err = u.download_error.expect("download error recorded");
            assert!(err.contains("30s"), "unexpected error text: {err}");
        }
        other => panic!("expected user record, got {other:?}"),
    }
}

#[tokio::test]
async fn downloaded_photos_use_deterministic_names() {
    let dated = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let mock = MockGateway {
        target: Some(user_target()),
        photos: vec![
            PhotoMeta {
                id: 1,
                access_hash: 0,
                file_reference: vec![],
                date: Some(dated),
                largest_thumb: "x".to_string(),
            },
            PhotoMeta {
                id: 2,
                access_hash: 0,
                file_reference: vec![],
                date: None,
                largest_thumb: "x".to_string(),
            },
        ],
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, true);
    let info = dispatcher
        .run(&TargetSelector::Handle("ada_l".to_string()))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::User(u) => {
            // Current photo by owner id, history by timestamp or ordinal.
            assert_eq!(
                u.downloaded_photos,
                vec!["777.jpg", "20240115_103000.jpg", "photo_1.jpg"]
            );
            assert_eq!(u.profile_photos_count, Some(2));
        }
        other => panic!("expected user record, got {other:?}"),
    }
}

#[tokio::test]
async fn photo_downloads_stop_at_the_limit() {
    // 15 historical photos, limit 10: the current photo plus exactly 10
    // from the history, never more.
    let photos: Vec<PhotoMeta> = (0..15)
        .map(|i| PhotoMeta {
            id: i,
            access_hash: 0,
            file_reference: vec![],
            date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, i as u32, 0).unwrap()),
            largest_thumb: "x".to_string(),
        })
        .collect();
    let mock = MockGateway {
        target: Some(user_target()),
        photos,
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, true);
    let info = dispatcher
        .run(&TargetSelector::Handle("ada_l".to_string()))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::User(u) => {
            assert_eq!(u.downloaded_photos.len(), 11);
            assert_eq!(u.downloaded_photos[0], "777.jpg");
            assert_eq!(u.downloaded_photos[10], "20240301_120900.jpg");
            // The count still reflects the full history.
            assert_eq!(u.profile_photos_count, Some(15));
        }
        other => panic!("expected user record, got {other:?}"),
    }
}

#[tokio::test]
async fn phone_soft_miss_is_not_an_error() {
    let mock = MockGateway::default();
    let dispatcher = dispatcher_with(mock, false);
    let result = dispatcher
        .run(&TargetSelector::Phone("+33123456789".to_string()))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn phone_hit_collects_the_user() {
    let mock = MockGateway {
        target: Some(user_target()),
        phone_hit: true,
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, false);
    let info = dispatcher
        .run(&TargetSelector::Phone("+33123456789".to_string()))
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(info, CollectedInfo::User(_)));
}

#[tokio::test]
async fn message_entities_are_merged_deduped_and_sorted() {
    let text = "go @alpha_team now #news https://z.example https://a.example".to_string();
    let mock = MockGateway {
        target: Some(channel_target(false)),
        message: Some(MessageRecord {
            id: 42,
            date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()),
            text,
            views: Some(100),
            rich_entities: vec![
                // All three duplicate what pattern matching already finds.
                RichEntity::TextUrl {
                    url: "https://a.example".to_string(),
                },
                RichEntity::Mention {
                    offset: 3,
                    length: 11,
                },
                RichEntity::Hashtag {
                    offset: 19,
                    length: 5,
                },
            ],
            raw: "raw".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    };
    let dispatcher = dispatcher_with(mock, false);
    let info = dispatcher
        .run(&TargetSelector::MessageUrl(
            "https://t.me/mychannel/42".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    match info {
        CollectedInfo::Message(m) => {
            assert_eq!(m.channel, "mychannel");
            assert_eq!(m.id, 42);
            assert_eq!(m.date.as_deref(), Some("2024-01-15 11:30:00 CET"));
            assert_eq!(
                m.entities_found.urls,
                vec!["https://a.example", "https://z.example"]
            );
            assert_eq!(m.entities_found.mentions, vec!["alpha_team"]);
            assert_eq!(m.entities_found.hashtags, vec!["news"]);
        }
        other => panic!("expected message record, got {other:?}"),
    }
}

#[tokio::test]
async fn bad_message_url_fails_before_any_network_call() {
    let mock = MockGateway::default(); // would error on any gateway call
    let dispatcher = dispatcher_with(mock, false);
    let err = dispatcher
        .run(&TargetSelector::MessageUrl(
            "https://t.me/onlyone".to_string(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, OsintError::BadUrl(_)));
    assert_eq!(err.exit_code(), 2);
}
