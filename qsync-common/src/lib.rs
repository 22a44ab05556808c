//! # QSync Common Library
//!
//! Shared code for the QSync quote manager including:
//! - Quote model and default collection
//! - StateStore trait plus sqlite and in-memory backends
//! - Configuration loading
//! - Common error types
//! - Utility functions

pub mod config;
pub mod db;
pub mod error;
pub mod quote;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use quote::Quote;
pub use store::StateStore;
