pub mod classified_repository;
#[cfg(test)]
pub mod memory;
pub mod user_repository;
