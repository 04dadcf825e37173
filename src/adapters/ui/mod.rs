pub mod human;
pub mod json;

pub use human::{HumanPresenter, Styles};
