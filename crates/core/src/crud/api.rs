//! Endpoint-bound CRUD API factory
//!
//! [`CrudApi`] binds one [`EndpointDescriptor`] to the shared transport and
//! exposes the five base operations plus a generic action call. Every method
//! issues exactly one request and returns the raw, un-normalized response.

use std::fmt;
use std::sync::Arc;

use hmis_domain::{
    expand_template, CrudOperation, EndpointDescriptor, EndpointRegistry, Fields, HmisError,
    ListParams, ResourceId, Result,
};
use serde_json::Value;
use tracing::{debug, instrument};
use urlencoding::encode;

use crate::ports::{ApiRequest, HttpTransport};

/// Anything that exposes a bound [`CrudApi`].
///
/// Implemented by `CrudApi` itself and by every typed resource API, so a
/// [`CrudHook`](crate::CrudHook) can wrap either.
pub trait CrudResource: Send + Sync {
    fn crud(&self) -> &CrudApi;
}

/// CRUD operations for one resource
#[derive(Clone)]
pub struct CrudApi {
    resource: Arc<str>,
    endpoint: Arc<EndpointDescriptor>,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for CrudApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudApi")
            .field("resource", &self.resource)
            .field("endpoint", &self.endpoint)
            .field("transport", &"<dyn HttpTransport>")
            .finish()
    }
}

impl CrudApi {
    /// Bind `endpoint` to `transport`
    ///
    /// `resource` names the resource in logs and error messages.
    pub fn new(
        resource: impl Into<String>,
        endpoint: EndpointDescriptor,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let resource: String = resource.into();
        Self { resource: Arc::from(resource), endpoint: Arc::new(endpoint), transport }
    }

    /// Bind the registry's descriptor for `resource`
    ///
    /// # Errors
    /// `HmisError::Config` if the registry has no such resource.
    pub fn from_registry(
        registry: &EndpointRegistry,
        resource: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let endpoint = registry.get(resource)?.clone();
        Ok(Self::new(resource, endpoint, transport))
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn endpoint(&self) -> &EndpointDescriptor {
        &self.endpoint
    }

    /// Read the collection; `params` become query parameters
    #[instrument(skip(self, params), fields(resource = %self.resource, operation = "list"))]
    pub async fn list(&self, params: Option<ListParams>) -> Result<Value> {
        let params = params.unwrap_or_default();
        let request = ApiRequest::new(
            CrudOperation::List.method(),
            self.endpoint.template(CrudOperation::List),
        )
        .with_query(params.to_query_pairs());

        self.send(request).await
    }

    /// Read one record
    ///
    /// # Errors
    /// `HmisError::InvalidArgument` for an empty string id or a `.`/`..`
    /// segment; nothing is sent.
    #[instrument(skip(self), fields(resource = %self.resource, operation = "get", id = %id))]
    pub async fn get(&self, id: &ResourceId) -> Result<Value> {
        let path = self.item_path(self.endpoint.template(CrudOperation::Get), id)?;
        self.send(ApiRequest::new(CrudOperation::Get.method(), path)).await
    }

    /// Create a record; the payload defaults to `{}`
    #[instrument(skip(self, payload), fields(resource = %self.resource, operation = "create"))]
    pub async fn create(&self, payload: Option<Fields>) -> Result<Value> {
        let request = ApiRequest::new(
            CrudOperation::Create.method(),
            self.endpoint.template(CrudOperation::Create),
        )
        .with_body(Value::Object(payload.unwrap_or_default()));

        self.send(request).await
    }

    /// Replace a record; the payload defaults to `{}`
    #[instrument(
        skip(self, payload),
        fields(resource = %self.resource, operation = "update", id = %id)
    )]
    pub async fn update(&self, id: &ResourceId, payload: Option<Fields>) -> Result<Value> {
        let path = self.item_path(self.endpoint.template(CrudOperation::Update), id)?;
        let request = ApiRequest::new(CrudOperation::Update.method(), path)
            .with_body(Value::Object(payload.unwrap_or_default()));

        self.send(request).await
    }

    /// Delete a record; returns the raw acknowledgement
    #[instrument(skip(self), fields(resource = %self.resource, operation = "remove", id = %id))]
    pub async fn remove(&self, id: &ResourceId) -> Result<Value> {
        let path = self.item_path(self.endpoint.template(CrudOperation::Remove), id)?;
        self.send(ApiRequest::new(CrudOperation::Remove.method(), path)).await
    }

    /// Invoke a resource-specific action such as `discharge`
    ///
    /// The body is sent only when a payload is given.
    ///
    /// # Errors
    /// `HmisError::Config` if the descriptor has no such action,
    /// `HmisError::InvalidArgument` for an empty, `.` or `..` string id.
    #[instrument(
        skip(self, payload),
        fields(resource = %self.resource, operation = %action, id = %id)
    )]
    pub async fn action(
        &self,
        action: &str,
        id: &ResourceId,
        payload: Option<Fields>,
    ) -> Result<Value> {
        let route = self.endpoint.action(action)?;
        let path = self.item_path(&route.path, id)?;
        let mut request = ApiRequest::new(route.method, path);
        if let Some(payload) = payload {
            request = request.with_body(Value::Object(payload));
        }

        self.send(request).await
    }

    fn item_path(&self, template: &str, id: &ResourceId) -> Result<String> {
        let segment = match id {
            ResourceId::Str(s) if s.is_empty() => {
                return Err(HmisError::InvalidArgument(format!(
                    "{}: id must be a non-empty string or non-negative integer",
                    self.resource
                )));
            }
            // URL parsers collapse these segments, even percent-encoded
            ResourceId::Str(s) if s == "." || s == ".." => {
                return Err(HmisError::InvalidArgument(format!(
                    "{}: id '{s}' is not a valid path segment",
                    self.resource
                )));
            }
            ResourceId::Str(s) => encode(s).into_owned(),
            ResourceId::Int(n) => n.to_string(),
        };
        Ok(expand_template(template, &segment))
    }

    async fn send(&self, request: ApiRequest) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "dispatching CRUD request");
        self.transport.execute(request).await
    }
}

impl CrudResource for CrudApi {
    fn crud(&self) -> &CrudApi {
        self
    }
}
