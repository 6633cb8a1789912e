//! Infrastructure-side error plumbing

mod conversions;

pub use conversions::InfraError;
