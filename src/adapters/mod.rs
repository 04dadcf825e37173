//! Adapters: infrastructure implementations of the ports, plus presenters.

pub mod telegram;
pub mod ui;
