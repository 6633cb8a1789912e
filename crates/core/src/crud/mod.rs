//! Generic CRUD binding
//!
//! [`api`] issues requests, [`validation`] checks UI-supplied arguments,
//! [`hook`] ties both to a per-consumer [`state`].

pub mod api;
pub mod hook;
pub mod payload;
pub mod state;
pub mod validation;
