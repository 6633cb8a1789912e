//! Client configuration structures
//!
//! Built once at process start (see `hmis-infra::config::loader`) and handed
//! to whatever needs it. Nothing here reads the environment.

use std::collections::BTreeMap;
use std::time::Duration;

use hmis_common::validation::{UrlValidator, Validator};
use serde::{Deserialize, Serialize};

use crate::constants::{actions, resources, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use crate::errors::{HmisError, Result};
use crate::types::EndpointDescriptor;

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    /// Resource descriptors; file entries are layered over the built-ins
    #[serde(default)]
    pub endpoints: EndpointRegistry,
}

impl Config {
    /// Configuration using the built-in endpoint registry
    pub fn new(api: ApiConfig) -> Self {
        Self { api, endpoints: EndpointRegistry::builtin() }
    }

    /// Validate every section, collecting all problems
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.endpoints.validate()
    }
}

/// Connection settings for the backend REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://his.example.org/api/v1`
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts made by the shared HTTP client (initial try + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Static bearer token, if the deployment uses one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            token: None,
            user_agent: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject unusable settings before any client is built
    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        validator.validate_nested("api", |api| {
            api.validate_field("base_url", self.base_url.as_str(), &UrlValidator::new());
            api.validate_min("timeout_secs", self.timeout_secs, 1);
            api.validate_min("max_attempts", self.max_attempts, 1);
        });
        validator.finalize().map_err(|err| HmisError::Config(err.to_string()))
    }
}

/// Static mapping from resource name to endpoint descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointRegistry {
    resources: BTreeMap<String, EndpointDescriptor>,
}

impl EndpointRegistry {
    /// Registry with no resources
    pub fn empty() -> Self {
        Self::default()
    }

    /// The resources every deployment of the client knows about
    pub fn builtin() -> Self {
        Self::empty()
            .with(resources::USERS, EndpointDescriptor::new("/users"))
            .with(resources::PATIENTS, EndpointDescriptor::new("/patients"))
            .with(resources::APPOINTMENTS, EndpointDescriptor::new("/appointments"))
            .with(
                resources::ADMISSIONS,
                EndpointDescriptor::new("/admissions").with_action(actions::DISCHARGE),
            )
            .with(
                resources::CLINICAL_ALERTS,
                EndpointDescriptor::new("/clinical-alerts")
                    .with_action(actions::ACKNOWLEDGE)
                    .with_action(actions::RESOLVE),
            )
            .with(resources::LAB_ORDERS, EndpointDescriptor::new("/lab-orders"))
            .with(
                resources::INVOICES,
                EndpointDescriptor::new("/invoices").with_action(actions::RECONCILE),
            )
            .with(
                resources::ANNOUNCEMENTS,
                EndpointDescriptor::new("/announcements").with_action(actions::PUBLISH),
            )
            .with(
                resources::WEBHOOK_DELIVERIES,
                EndpointDescriptor::new("/webhook-deliveries").with_action(actions::REPLAY),
            )
    }

    /// Add or replace a descriptor (builder form)
    pub fn with(mut self, name: impl Into<String>, descriptor: EndpointDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Add or replace a descriptor
    pub fn insert(&mut self, name: impl Into<String>, descriptor: EndpointDescriptor) {
        self.resources.insert(name.into(), descriptor);
    }

    /// Descriptor for `name`
    pub fn get(&self, name: &str) -> Result<&EndpointDescriptor> {
        self.resources
            .get(name)
            .ok_or_else(|| HmisError::Config(format!("unknown resource '{name}'")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Resource names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Layer `overrides` on top of `self`; a resource present in both is
    /// replaced wholesale by the override.
    pub fn merged(mut self, overrides: EndpointRegistry) -> Self {
        self.resources.extend(overrides.resources);
        self
    }

    /// Validate every descriptor
    pub fn validate(&self) -> Result<()> {
        for (name, descriptor) in &self.resources {
            descriptor.validate(name)?;
        }
        Ok(())
    }
}
