//! Endpoint descriptors
//!
//! A descriptor maps each operation of one resource to a URL template.
//! Templates are paths relative to the API base URL; item and action
//! templates carry an `{id}` placeholder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::ID_PLACEHOLDER;
use crate::errors::{HmisError, Result};
use crate::impl_wire_name_conversions;

/// HTTP verbs used by the CRUD layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Patch => "PATCH",
    Delete => "DELETE",
});

/// The five operations every resource exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperation {
    List,
    Get,
    Create,
    Update,
    Remove,
}

impl_wire_name_conversions!(CrudOperation {
    List => "list",
    Get => "get",
    Create => "create",
    Update => "update",
    Remove => "remove",
});

impl CrudOperation {
    /// Verb issued for this operation
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::List | Self::Get => HttpMethod::Get,
            Self::Create => HttpMethod::Post,
            Self::Update => HttpMethod::Put,
            Self::Remove => HttpMethod::Delete,
        }
    }

    /// Whether the operation addresses a single record
    pub const fn targets_item(&self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Remove)
    }
}

/// Sub-path for a resource-specific action such as `discharge`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRoute {
    /// Template containing `{id}`, e.g. `/admissions/{id}/discharge`
    pub path: String,
    #[serde(default)]
    pub method: HttpMethod,
}

impl ActionRoute {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), method: HttpMethod::Post }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }
}

/// URL templates for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Collection path used by `list` and `create`
    pub collection: String,
    /// Item template used by `get`, `update` and `remove`
    pub item: String,
    /// Extra actions keyed by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionRoute>,
}

impl EndpointDescriptor {
    /// Descriptor with the conventional `{collection}/{id}` item template
    pub fn new(collection: impl Into<String>) -> Self {
        let collection = collection.into();
        let item = format!("{}/{}", collection.trim_end_matches('/'), ID_PLACEHOLDER);
        Self { collection, item, actions: BTreeMap::new() }
    }

    /// Override the item template
    pub fn with_item(mut self, template: impl Into<String>) -> Self {
        self.item = template.into();
        self
    }

    /// Attach a POST action at `{item}/{name}`
    pub fn with_action(self, name: &str) -> Self {
        let path = format!("{}/{}", self.item.trim_end_matches('/'), name);
        self.with_action_route(name, ActionRoute::new(path))
    }

    /// Attach an action with an explicit route
    pub fn with_action_route(mut self, name: impl Into<String>, route: ActionRoute) -> Self {
        self.actions.insert(name.into(), route);
        self
    }

    /// Template for one of the five base operations
    pub fn template(&self, operation: CrudOperation) -> &str {
        if operation.targets_item() {
            &self.item
        } else {
            &self.collection
        }
    }

    /// Route for an extra action
    pub fn action(&self, name: &str) -> Result<&ActionRoute> {
        self.actions.get(name).ok_or_else(|| {
            HmisError::Config(format!(
                "no '{}' action configured for {}",
                name, self.collection
            ))
        })
    }

    /// Check that templates are usable.
    ///
    /// `name` is only used in error messages.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(HmisError::Config(format!("{name}: collection path is empty")));
        }
        if !self.item.contains(ID_PLACEHOLDER) {
            return Err(HmisError::Config(format!(
                "{name}: item template '{}' has no {ID_PLACEHOLDER} placeholder",
                self.item
            )));
        }
        for (action, route) in &self.actions {
            if !route.path.contains(ID_PLACEHOLDER) {
                return Err(HmisError::Config(format!(
                    "{name}: action '{action}' path '{}' has no {ID_PLACEHOLDER} placeholder",
                    route.path
                )));
            }
        }
        Ok(())
    }
}

/// Substitute an already-encoded identifier into a template
pub fn expand_template(template: &str, encoded_id: &str) -> String {
    template.replace(ID_PLACEHOLDER, encoded_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_item_template() {
        let descriptor = EndpointDescriptor::new("/patients");
        assert_eq!(descriptor.item, "/patients/{id}");
        assert_eq!(descriptor.template(CrudOperation::List), "/patients");
        assert_eq!(descriptor.template(CrudOperation::Create), "/patients");
        assert_eq!(descriptor.template(CrudOperation::Get), "/patients/{id}");
        assert_eq!(descriptor.template(CrudOperation::Remove), "/patients/{id}");
    }

    #[test]
    fn actions_hang_off_the_item() {
        let descriptor = EndpointDescriptor::new("/admissions").with_action("discharge");
        let route = descriptor.action("discharge").unwrap();
        assert_eq!(route.path, "/admissions/{id}/discharge");
        assert_eq!(route.method, HttpMethod::Post);
        assert!(matches!(descriptor.action("transfer"), Err(HmisError::Config(_))));
    }

    #[test]
    fn operation_methods() {
        assert_eq!(CrudOperation::List.method(), HttpMethod::Get);
        assert_eq!(CrudOperation::Create.method(), HttpMethod::Post);
        assert_eq!(CrudOperation::Update.method(), HttpMethod::Put);
        assert_eq!(CrudOperation::Remove.method(), HttpMethod::Delete);
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn validate_rejects_missing_placeholders() {
        assert!(EndpointDescriptor::new("/users").validate("users").is_ok());
        assert!(EndpointDescriptor::new("").validate("x").is_err());
        let fixed_item = EndpointDescriptor::new("/users").with_item("/users/me");
        assert!(fixed_item.validate("users").is_err());

        let bad_action = EndpointDescriptor::new("/alerts")
            .with_action_route("ack", ActionRoute::new("/alerts/ack"));
        let err = bad_action.validate("alerts").unwrap_err();
        assert!(err.to_string().contains("action 'ack'"));
    }

    #[test]
    fn expand_substitutes_every_placeholder() {
        assert_eq!(expand_template("/a/{id}/b/{id}", "7"), "/a/7/b/7");
    }

    #[test]
    fn action_method_defaults_to_post_when_deserialized() {
        let route: ActionRoute =
            serde_json::from_str(r#"{"path": "/invoices/{id}/reconcile"}"#).unwrap();
        assert_eq!(route.method, HttpMethod::Post);

        let route: ActionRoute =
            serde_json::from_str(r#"{"path": "/x/{id}/y", "method": "PATCH"}"#).unwrap();
        assert_eq!(route.method, HttpMethod::Patch);
    }
}
