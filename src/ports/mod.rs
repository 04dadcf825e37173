//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: the application calls into the Telegram infrastructure
//! through `TgGateway`; a one-shot CLI needs no inbound port.

pub mod outbound;

pub use outbound::TgGateway;
