pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod database;
    pub mod generate;
    pub mod health;
    pub mod index;
}

pub use router::{create_router, ApiDoc};
pub use types::{AppState, HttpSettings};
