//! Patient-facing clinical resources

use hmis_domain::constants::{actions, resources};

define_resource! {
    /// Patient registry
    Patients => resources::PATIENTS,
    actions: [],
}

define_resource! {
    /// Outpatient appointments
    Appointments => resources::APPOINTMENTS,
    actions: [],
}

define_resource! {
    /// Inpatient stays; `discharge` closes the stay
    Admissions => resources::ADMISSIONS,
    actions: [discharge => actions::DISCHARGE],
}

define_resource! {
    /// Alerts raised against a patient (allergies, critical results, fall risk)
    ClinicalAlerts => resources::CLINICAL_ALERTS,
    actions: [
        acknowledge => actions::ACKNOWLEDGE,
        resolve => actions::RESOLVE,
    ],
}

define_resource! {
    LabOrders => resources::LAB_ORDERS,
    actions: [],
}
