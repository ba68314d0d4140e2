//! HTTP service around the layout extractor and the script generator.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod session;
pub mod state;
pub mod upload;

pub use config::ServerConfig;
pub use router::build_app_router;
pub use state::AppState;
