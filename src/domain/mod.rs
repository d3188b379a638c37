//! Domain types and pure story logic.

pub mod story;
