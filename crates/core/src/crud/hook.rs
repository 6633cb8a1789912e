//! Stateful CRUD hook
//!
//! [`CrudHook`] is what UI code holds on to. Each call validates its loose
//! JSON arguments, issues one request through the wrapped resource API,
//! normalizes the response and folds it into the hook's [`CrudState`].
//!
//! ## State rules
//!
//! - success stores the result and clears that operation kind's error
//! - failure stores the error and leaves earlier results in place
//! - validation failures are recorded the same way and never reach the
//!   network
//! - concurrent calls are not de-duplicated; whichever resolves last wins

use std::future::Future;
use std::sync::Arc;

use hmis_common::validation::ValidationResult;
use hmis_domain::{normalize_entity, CrudOperation, Entity, HmisError, Result};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::api::CrudResource;
use super::payload::ListPayload;
use super::state::{CrudState, OperationKind};
use super::validation::{parse_id, parse_list_params, parse_payload};

/// CRUD operations bound to a private [`CrudState`]
///
/// Clones share the same state and resource API.
pub struct CrudHook<R> {
    api: Arc<R>,
    state: Arc<Mutex<CrudState>>,
}

impl<R> Clone for CrudHook<R> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api), state: Arc::clone(&self.state) }
    }
}

impl<R: CrudResource> CrudHook<R> {
    pub fn new(api: R) -> Self {
        Self::from_shared(Arc::new(api))
    }

    /// Wrap an API that is also used elsewhere; the state is still private
    pub fn from_shared(api: Arc<R>) -> Self {
        Self { api, state: Arc::new(Mutex::new(CrudState::new())) }
    }

    pub fn api(&self) -> &R {
        &self.api
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CrudState {
        self.state.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading()
    }

    /// Forget all results and errors
    pub fn reset(&self) {
        *self.state.lock() = CrudState::new();
    }

    /// Load the collection into `items` and `pagination`
    #[instrument(skip_all, fields(resource = %self.api.crud().resource()))]
    pub async fn list(&self, params: Option<&Value>) -> Result<ListPayload> {
        let kind = OperationKind::from(CrudOperation::List);
        let params = self.validated(&kind, parse_list_params(params))?;

        let raw = self.track(kind, self.api.crud().list(Some(params))).await?;
        let payload = ListPayload::from_raw(&raw);
        let dropped = payload.dropped_from(&raw);
        if dropped > 0 {
            debug!(dropped, "discarded list entries that are not objects");
        }

        self.state.lock().apply_list(payload.clone());
        Ok(payload)
    }

    /// Load one record into `current`
    #[instrument(skip_all, fields(resource = %self.api.crud().resource()))]
    pub async fn get(&self, id: &Value) -> Result<Option<Entity>> {
        let kind = OperationKind::from(CrudOperation::Get);
        let id = self.validated(&kind, parse_id(id))?;

        let raw = self.track(kind, self.api.crud().get(&id)).await?;
        Ok(self.store_current(&raw))
    }

    #[instrument(skip_all, fields(resource = %self.api.crud().resource()))]
    pub async fn create(&self, payload: Option<&Value>) -> Result<Option<Entity>> {
        let kind = OperationKind::from(CrudOperation::Create);
        let payload = self.validated(&kind, parse_payload(payload))?;

        let raw = self.track(kind, self.api.crud().create(Some(payload))).await?;
        Ok(self.store_current(&raw))
    }

    #[instrument(skip_all, fields(resource = %self.api.crud().resource()))]
    pub async fn update(&self, id: &Value, payload: Option<&Value>) -> Result<Option<Entity>> {
        let kind = OperationKind::from(CrudOperation::Update);
        let id = self.validated(&kind, parse_id(id))?;
        let payload = self.validated(&kind, parse_payload(payload))?;

        let raw = self.track(kind, self.api.crud().update(&id, Some(payload))).await?;
        Ok(self.store_current(&raw))
    }

    /// Delete a record and drop it from local state
    ///
    /// Returns the server's raw acknowledgement.
    #[instrument(skip_all, fields(resource = %self.api.crud().resource()))]
    pub async fn remove(&self, id: &Value) -> Result<Value> {
        let kind = OperationKind::from(CrudOperation::Remove);
        let id = self.validated(&kind, parse_id(id))?;

        let raw = self.track(kind, self.api.crud().remove(&id)).await?;
        self.state.lock().apply_removal(&id);
        Ok(raw)
    }

    /// Invoke a named action and store the returned record as `current`
    ///
    /// Typed resource hooks expose one method per action on top of this.
    #[instrument(skip_all, fields(resource = %self.api.crud().resource(), action = %action))]
    pub async fn invoke_action(
        &self,
        action: &str,
        id: &Value,
        payload: Option<&Value>,
    ) -> Result<Option<Entity>> {
        let kind = OperationKind::action(action);
        let id = self.validated(&kind, parse_id(id))?;
        let payload = match payload {
            Some(raw) => Some(self.validated(&kind, parse_payload(Some(raw)))?),
            None => None,
        };

        let raw = self.track(kind, self.api.crud().action(action, &id, payload)).await?;
        Ok(self.store_current(&raw))
    }

    fn validated<T>(&self, kind: &OperationKind, result: ValidationResult<T>) -> Result<T> {
        result.map_err(|err| {
            let error = HmisError::from(err);
            debug!(operation = %kind, error = %error, "rejected invalid arguments");
            self.state.lock().reject(kind.clone(), error.clone());
            error
        })
    }

    /// Mark `kind` pending, await `call`, then record its outcome
    ///
    /// The lock is never held across the await. If the returned future is
    /// dropped first, the pending mark is undone.
    async fn track<F>(&self, kind: OperationKind, call: F) -> Result<Value>
    where
        F: Future<Output = Result<Value>>,
    {
        self.state.lock().begin(kind.clone());
        let pending = PendingCall { state: &self.state, kind, resolved: false };

        let outcome = call.await;
        let kind = pending.settle();

        match outcome {
            Ok(raw) => {
                self.state.lock().succeed(kind);
                Ok(raw)
            }
            Err(error) => {
                warn!(
                    operation = %kind,
                    error_type = error.label(),
                    status = ?error.status(),
                    error = %error,
                    "CRUD operation failed"
                );
                self.state.lock().fail(kind, error.clone());
                Err(error)
            }
        }
    }

    fn store_current(&self, raw: &Value) -> Option<Entity> {
        let entity = normalize_entity(raw);
        self.state.lock().apply_entity(entity.clone());
        entity
    }
}

/// Undoes a `begin` when its call is dropped unresolved
struct PendingCall<'a> {
    state: &'a Mutex<CrudState>,
    kind: OperationKind,
    resolved: bool,
}

impl PendingCall<'_> {
    /// The call resolved; its outcome is recorded by the caller
    fn settle(mut self) -> OperationKind {
        self.resolved = true;
        self.kind.clone()
    }
}

impl Drop for PendingCall<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            debug!(operation = %self.kind, "CRUD call dropped before completion");
            self.state.lock().abandon(&self.kind);
        }
    }
}
