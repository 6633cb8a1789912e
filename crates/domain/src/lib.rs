//! # HMIS Domain
//!
//! Business domain types for the hospital-management client core.
//!
//! This crate contains:
//! - The opaque [`Entity`] record and its normalizer
//! - List query parameters and endpoint descriptors
//! - The endpoint registry and client configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - Depends only on `hmis-common` (validation primitives)
//! - No I/O, no async, no HTTP
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
