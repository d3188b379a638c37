pub mod database_store;
pub mod story_service;
