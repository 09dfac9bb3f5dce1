pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;
pub mod version;
