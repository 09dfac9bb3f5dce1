pub mod auth;
pub mod classified;
pub mod user;
