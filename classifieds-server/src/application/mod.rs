pub mod auth_service;
pub mod classified_service;
