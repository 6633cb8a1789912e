//! Shared test helpers for `hmis-core` integration tests.

#![allow(dead_code)]

pub mod transport;
