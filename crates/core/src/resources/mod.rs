//! Typed resource APIs
//!
//! Each resource wraps a [`CrudApi`](crate::CrudApi) bound to its registry
//! descriptor. Resources with extra actions (`discharge`, `acknowledge`, ...)
//! get one method per action on the API type and on its
//! [`CrudHook`](crate::CrudHook), generated by `define_resource!`.

use std::sync::Arc;

use hmis_domain::{EndpointRegistry, Result};

use crate::ports::HttpTransport;

/// Declares a typed resource API.
///
/// ```ignore
/// define_resource! {
///     /// Inpatient stays
///     Admissions => resources::ADMISSIONS,
///     actions: [discharge => actions::DISCHARGE],
/// }
/// ```
///
/// generates `Admissions` with the five CRUD methods plus
/// `Admissions::discharge(&ResourceId, Option<Fields>)`, and
/// `CrudHook<Admissions>::discharge(&Value, Option<&Value>)`.
macro_rules! define_resource {
    (
        $(#[$meta:meta])*
        $name:ident => $resource:expr,
        actions: [$($action:ident => $action_name:expr),* $(,)?] $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            api: $crate::crud::api::CrudApi,
        }

        impl $name {
            /// Registry key of this resource
            pub const RESOURCE: &'static str = $resource;

            /// Bind an explicit descriptor
            pub fn new(
                endpoint: ::hmis_domain::EndpointDescriptor,
                transport: ::std::sync::Arc<dyn $crate::ports::HttpTransport>,
            ) -> Self {
                Self { api: $crate::crud::api::CrudApi::new(Self::RESOURCE, endpoint, transport) }
            }

            /// Bind the registry's descriptor for this resource
            pub fn from_registry(
                registry: &::hmis_domain::EndpointRegistry,
                transport: ::std::sync::Arc<dyn $crate::ports::HttpTransport>,
            ) -> ::hmis_domain::Result<Self> {
                let api = $crate::crud::api::CrudApi::from_registry(
                    registry,
                    Self::RESOURCE,
                    transport,
                )?;
                Ok(Self { api })
            }

            pub async fn list(
                &self,
                params: Option<::hmis_domain::ListParams>,
            ) -> ::hmis_domain::Result<::serde_json::Value> {
                self.api.list(params).await
            }

            pub async fn get(
                &self,
                id: &::hmis_domain::ResourceId,
            ) -> ::hmis_domain::Result<::serde_json::Value> {
                self.api.get(id).await
            }

            pub async fn create(
                &self,
                payload: Option<::hmis_domain::Fields>,
            ) -> ::hmis_domain::Result<::serde_json::Value> {
                self.api.create(payload).await
            }

            pub async fn update(
                &self,
                id: &::hmis_domain::ResourceId,
                payload: Option<::hmis_domain::Fields>,
            ) -> ::hmis_domain::Result<::serde_json::Value> {
                self.api.update(id, payload).await
            }

            pub async fn remove(
                &self,
                id: &::hmis_domain::ResourceId,
            ) -> ::hmis_domain::Result<::serde_json::Value> {
                self.api.remove(id).await
            }

            $(
                #[doc = concat!("Invoke the `", stringify!($action), "` action")]
                pub async fn $action(
                    &self,
                    id: &::hmis_domain::ResourceId,
                    payload: Option<::hmis_domain::Fields>,
                ) -> ::hmis_domain::Result<::serde_json::Value> {
                    self.api.action($action_name, id, payload).await
                }
            )*
        }

        impl $crate::crud::api::CrudResource for $name {
            fn crud(&self) -> &$crate::crud::api::CrudApi {
                &self.api
            }
        }

        impl $crate::crud::hook::CrudHook<$name> {
            $(
                #[doc = concat!("Invoke `", stringify!($action), "` and store the returned record")]
                pub async fn $action(
                    &self,
                    id: &::serde_json::Value,
                    payload: Option<&::serde_json::Value>,
                ) -> ::hmis_domain::Result<Option<::hmis_domain::Entity>> {
                    self.invoke_action($action_name, id, payload).await
                }
            )*
        }
    };
}

mod administration;
mod billing;
mod clinical;
mod integrations;

pub use administration::{Announcements, Users};
pub use billing::Invoices;
pub use clinical::{Admissions, Appointments, ClinicalAlerts, LabOrders, Patients};
pub use integrations::WebhookDeliveries;

/// Every built-in resource bound to one shared transport
#[derive(Debug, Clone)]
pub struct ResourceSet {
    pub users: Users,
    pub patients: Patients,
    pub appointments: Appointments,
    pub admissions: Admissions,
    pub clinical_alerts: ClinicalAlerts,
    pub lab_orders: LabOrders,
    pub invoices: Invoices,
    pub announcements: Announcements,
    pub webhook_deliveries: WebhookDeliveries,
}

impl ResourceSet {
    /// Bind every built-in resource from `registry`
    ///
    /// # Errors
    /// `HmisError::Config` naming the first resource the registry lacks.
    pub fn from_registry(
        registry: &EndpointRegistry,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Ok(Self {
            users: Users::from_registry(registry, Arc::clone(&transport))?,
            patients: Patients::from_registry(registry, Arc::clone(&transport))?,
            appointments: Appointments::from_registry(registry, Arc::clone(&transport))?,
            admissions: Admissions::from_registry(registry, Arc::clone(&transport))?,
            clinical_alerts: ClinicalAlerts::from_registry(registry, Arc::clone(&transport))?,
            lab_orders: LabOrders::from_registry(registry, Arc::clone(&transport))?,
            invoices: Invoices::from_registry(registry, Arc::clone(&transport))?,
            announcements: Announcements::from_registry(registry, Arc::clone(&transport))?,
            webhook_deliveries: WebhookDeliveries::from_registry(registry, transport)?,
        })
    }
}
