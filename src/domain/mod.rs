//! Domain layer: pure data structures and errors.

pub mod entities;
pub mod errors;
pub mod report;

pub use entities::*;
pub use errors::OsintError;
pub use report::*;
