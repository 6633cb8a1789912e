//! # HMIS Infrastructure
//!
//! Concrete implementations of the `hmis-core` ports.
//!
//! This crate contains:
//! - The shared HTTP client with retry and backoff ([`http`])
//! - The REST transport and token providers ([`api`])
//! - Configuration loading from environment and files ([`config`])
//! - Tracing subscriber setup ([`observability`])
//!
//! ## Architecture
//! - Implements traits defined in `hmis-core`
//! - Contains all I/O; the core crates stay pure

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

pub use api::{AccessTokenProvider, RestTransport, StaticTokenProvider};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
