//! REST implementation of the CRUD transport port

pub mod auth;
pub mod client;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use client::RestTransport;
