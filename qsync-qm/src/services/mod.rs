//! Service layer for qsync-qm

pub mod conflict_detector;
pub mod import_export;
pub mod quote_mapper;
pub mod quote_merger;
pub mod remote_client;

pub use conflict_detector::{ConflictDetector, QuoteConflict};
pub use import_export::{export_json, parse_import, ImportMode};
pub use quote_mapper::{map_remote_posts, REMOTE_CATEGORY};
pub use quote_merger::{merge_remote_wins, new_remote_quotes};
pub use remote_client::{RemoteError, RemotePost, RemoteQuoteClient};
