use hmis_domain::constants::{actions, resources};

define_resource! {
    /// Patient invoices; `reconcile` matches recorded payments against the balance
    Invoices => resources::INVOICES,
    actions: [reconcile => actions::RECONCILE],
}
