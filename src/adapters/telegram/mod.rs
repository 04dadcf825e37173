pub mod auth;
pub mod client;
pub mod mapper;
pub mod session;
