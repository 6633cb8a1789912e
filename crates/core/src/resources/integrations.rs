//! Outbound integration bookkeeping

use hmis_domain::constants::{actions, resources};

define_resource! {
    /// Delivery attempts of outbound webhooks; `replay` re-sends one
    WebhookDeliveries => resources::WEBHOOK_DELIVERIES,
    actions: [replay => actions::REPLAY],
}
