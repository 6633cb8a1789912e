//! Domain constants
//!
//! Resource names used by the built-in endpoint registry, plus the URL
//! template placeholder shared by every descriptor.

/// Placeholder substituted with the (percent-encoded) identifier.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Field that identifies an entity.
pub const ID_FIELD: &str = "id";

/// Request timeout used when configuration does not provide one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Total attempts (initial try + retries) for the shared HTTP client.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Resource names known to the built-in registry.
pub mod resources {
    pub const USERS: &str = "users";
    pub const PATIENTS: &str = "patients";
    pub const APPOINTMENTS: &str = "appointments";
    pub const ADMISSIONS: &str = "admissions";
    pub const CLINICAL_ALERTS: &str = "clinical-alerts";
    pub const LAB_ORDERS: &str = "lab-orders";
    pub const INVOICES: &str = "invoices";
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const WEBHOOK_DELIVERIES: &str = "webhook-deliveries";
}

/// Extra action names attached to built-in resources.
pub mod actions {
    pub const DISCHARGE: &str = "discharge";
    pub const ACKNOWLEDGE: &str = "acknowledge";
    pub const RESOLVE: &str = "resolve";
    pub const PUBLISH: &str = "publish";
    pub const REPLAY: &str = "replay";
    pub const RECONCILE: &str = "reconcile";
}
