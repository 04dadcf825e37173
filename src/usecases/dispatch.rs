//! Dispatcher: one CLI-specified target -> resolution -> collector -> record.
//!
//! The collector is chosen by the resolved entity's runtime kind, never by
//! the selector flag that named the target.

use std::sync::Arc;

use tracing::info;

use crate::domain::{CollectedInfo, OsintError};
use crate::ports::TgGateway;
use crate::usecases::collect::Collector;

/// Exactly one of four mutually exclusive ways to name a target.
#[derive(Debug, Clone)]
pub enum TargetSelector {
    Handle(String),
    Id(i64),
    Phone(String),
    MessageUrl(String),
}

pub struct Dispatcher {
    tg: Arc<dyn TgGateway>,
    collector: Collector,
}

impl Dispatcher {
    pub fn new(tg: Arc<dyn TgGateway>, collector: Collector) -> Self {
        Self { tg, collector }
    }

    /// Resolve, collect and return the record. `Ok(None)` means a phone
    /// lookup found no account behind the number (a soft miss, not an error).
    pub async fn run(&self, selector: &TargetSelector) -> Result<Option<CollectedInfo>, OsintError> {
        match selector {
            TargetSelector::Handle(handle) => {
                let handle = handle.trim_start_matches('@');
                info!(handle, "resolving by handle");
                let target = self.tg.resolve_handle(handle).await?;
                self.collector.collect_resolved(&target).await.map(Some)
            }
            TargetSelector::Id(id) => {
                info!(id, "resolving by numeric id");
                let target = self.tg.resolve_id(*id).await?;
                self.collector.collect_resolved(&target).await.map(Some)
            }
            TargetSelector::Phone(phone) => {
                info!("resolving by phone number");
                match self.tg.lookup_phone(phone).await? {
                    Some(target) => self.collector.collect_resolved(&target).await.map(Some),
                    None => Ok(None),
                }
            }
            TargetSelector::MessageUrl(url) => {
                info!(url, "collecting message");
                self.collector
                    .message(url)
                    .await
                    .map(|m| Some(CollectedInfo::Message(m)))
            }
        }
    }
}
