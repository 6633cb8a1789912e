//! Domain types and models
//!
//! - [`entity`]: the opaque record handed to UI state and its normalizer
//! - [`params`]: list query parameters with passthrough of unknown keys
//! - [`endpoint`]: per-resource URL templates and operation names

pub mod endpoint;
pub mod entity;
pub mod params;

pub use endpoint::{expand_template, ActionRoute, CrudOperation, EndpointDescriptor, HttpMethod};
pub use entity::{normalize_entity, normalize_entity_list, Entity, Fields, ResourceId};
pub use params::{ListParams, SortOrder};
