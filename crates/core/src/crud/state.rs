//! Per-hook CRUD state
//!
//! One [`CrudState`] belongs to exactly one [`CrudHook`](crate::CrudHook).
//! Every operation kind tracks its own status and last error so that a failed
//! `update` does not hide a successful `list`.

use std::collections::BTreeMap;
use std::fmt;

use hmis_domain::{impl_wire_name_conversions, CrudOperation, Entity, HmisError, ResourceId};
use serde::{Deserialize, Serialize};

use super::payload::{ListPayload, PaginationMeta};

/// Lifecycle of one operation kind: `idle -> pending -> success | failure`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failure,
}

impl_wire_name_conversions!(RequestStatus {
    Idle => "idle",
    Pending => "pending",
    Success => "success",
    Failure => "failure",
});

/// Key under which status and errors are tracked
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum OperationKind {
    Crud(CrudOperation),
    /// Resource-specific action, by name
    Action(String),
}

impl OperationKind {
    pub fn action(name: impl Into<String>) -> Self {
        Self::Action(name.into())
    }
}

impl From<CrudOperation> for OperationKind {
    fn from(operation: CrudOperation) -> Self {
        Self::Crud(operation)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crud(operation) => f.write_str(operation.as_str()),
            Self::Action(name) => f.write_str(name),
        }
    }
}

/// Status of one operation kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationState {
    pub status: RequestStatus,
    /// Error from the most recent failed call; cleared on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<HmisError>,
    /// Calls issued but not yet resolved
    pub in_flight: usize,
    /// Status of the last call that resolved; restored when pending calls
    /// are dropped unresolved
    #[serde(skip)]
    settled: RequestStatus,
}

/// Everything a UI needs to render one resource
///
/// Snapshots are plain clones; serde_json values deep-copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrudState {
    /// Result of the latest successful `list`
    pub items: Vec<Entity>,
    /// Result of the latest successful `get`/`create`/`update`/action
    pub current: Option<Entity>,
    pub pagination: Option<PaginationMeta>,
    operations: BTreeMap<OperationKind, OperationState>,
}

impl CrudState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any call is unresolved
    pub fn is_loading(&self) -> bool {
        self.operations.values().any(|op| op.in_flight > 0)
    }

    /// State of `kind`; operations never invoked report `Idle`
    pub fn operation(&self, kind: &OperationKind) -> OperationState {
        self.operations.get(kind).cloned().unwrap_or_default()
    }

    pub fn status(&self, kind: &OperationKind) -> RequestStatus {
        self.operations.get(kind).map_or(RequestStatus::Idle, |op| op.status)
    }

    pub fn error(&self, kind: &OperationKind) -> Option<&HmisError> {
        self.operations.get(kind).and_then(|op| op.error.as_ref())
    }

    /// Most recent errors across all kinds, in key order
    pub fn errors(&self) -> impl Iterator<Item = (&OperationKind, &HmisError)> {
        self.operations.iter().filter_map(|(kind, op)| op.error.as_ref().map(|err| (kind, err)))
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub(crate) fn begin(&mut self, kind: OperationKind) {
        let op = self.operations.entry(kind).or_default();
        op.status = RequestStatus::Pending;
        op.in_flight += 1;
    }

    pub(crate) fn succeed(&mut self, kind: OperationKind) {
        let op = self.operations.entry(kind).or_default();
        op.in_flight = op.in_flight.saturating_sub(1);
        op.status = RequestStatus::Success;
        op.settled = RequestStatus::Success;
        op.error = None;
    }

    pub(crate) fn fail(&mut self, kind: OperationKind, error: HmisError) {
        let op = self.operations.entry(kind).or_default();
        op.in_flight = op.in_flight.saturating_sub(1);
        op.status = RequestStatus::Failure;
        op.settled = RequestStatus::Failure;
        op.error = Some(error);
    }

    /// Record a failure that never reached the network
    pub(crate) fn reject(&mut self, kind: OperationKind, error: HmisError) {
        let op = self.operations.entry(kind).or_default();
        op.status = RequestStatus::Failure;
        op.settled = RequestStatus::Failure;
        op.error = Some(error);
    }

    /// Forget a call whose future was dropped before it resolved
    ///
    /// Once nothing of `kind` is in flight, the status falls back to the
    /// last resolved one (`Idle` if none).
    pub(crate) fn abandon(&mut self, kind: &OperationKind) {
        if let Some(op) = self.operations.get_mut(kind) {
            op.in_flight = op.in_flight.saturating_sub(1);
            if op.in_flight == 0 && op.status == RequestStatus::Pending {
                op.status = op.settled;
            }
        }
    }

    pub(crate) fn apply_list(&mut self, payload: ListPayload) {
        self.items = payload.items;
        self.pagination = payload.pagination;
    }

    /// Store a single record as current and refresh its copy in `items`
    pub(crate) fn apply_entity(&mut self, entity: Option<Entity>) {
        if let Some(entity) = &entity {
            if let Some(id) = entity.id() {
                for item in self.items.iter_mut().filter(|item| item.has_id(&id)) {
                    *item = entity.clone();
                }
            }
        }
        self.current = entity;
    }

    pub(crate) fn apply_removal(&mut self, id: &ResourceId) {
        if self.current.as_ref().is_some_and(|current| current.has_id(id)) {
            self.current = None;
        }
        self.items.retain(|item| !item.has_id(id));
    }
}
