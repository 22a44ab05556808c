//! HTTP API handlers for qsync-qm

pub mod health;
pub mod quotes;
pub mod session;
pub mod sync;

pub use health::health_routes;
pub use quotes::quote_routes;
pub use session::session_routes;
pub use sync::sync_routes;
