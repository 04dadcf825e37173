//! Use cases: the extraction/formatting pipeline and the dispatcher.

pub mod collect;
pub mod dispatch;
pub mod extract;
pub mod presence;
pub mod timefmt;

pub use collect::{CollectOptions, Collector};
pub use dispatch::{Dispatcher, TargetSelector};
