pub mod anthropic;
pub mod config;
