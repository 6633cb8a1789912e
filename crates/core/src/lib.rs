//! # HMIS Core
//!
//! The generic CRUD binding pattern, free of any HTTP implementation.
//!
//! This crate contains:
//! - The transport port the shared HTTP client implements ([`ports`])
//! - The endpoint-bound CRUD API factory ([`crud::api`])
//! - Request validation rules ([`crud::validation`])
//! - The stateful CRUD hook consumed by UI ([`crud::hook`])
//! - Typed per-resource APIs with their extra actions ([`resources`])
//!
//! ## Architecture Principles
//! - Depends on `hmis-domain` and `hmis-common` only
//! - No network code; the transport is injected as `Arc<dyn HttpTransport>`
//! - No caching, retry, or batching at this layer

pub mod crud;
pub mod ports;
pub mod resources;

pub use crud::api::{CrudApi, CrudResource};
pub use crud::hook::CrudHook;
pub use crud::payload::{ListPayload, PaginationMeta};
pub use crud::state::{CrudState, OperationKind, OperationState, RequestStatus};
pub use crud::validation::{parse_id, parse_list_params, parse_payload};
pub use ports::{ApiRequest, HttpTransport};
pub use resources::ResourceSet;
