//! Staff accounts and hospital-wide communication

use hmis_domain::constants::{actions, resources};

define_resource! {
    /// Staff and patient-portal accounts
    Users => resources::USERS,
    actions: [],
}

define_resource! {
    /// Notices shown to staff; drafts become visible once published
    Announcements => resources::ANNOUNCEMENTS,
    actions: [publish => actions::PUBLISH],
}
