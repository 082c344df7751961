//! Service source trait
//!
//! Abstracts the cluster API: the engine only ever needs to list services
//! carrying the management label.

use async_trait::async_trait;

use crate::model::ServiceRecord;

/// Trait for cluster service listing
#[async_trait]
pub trait ServiceSource: Send + Sync {
    /// List services matching `selector`
    ///
    /// # Parameters
    ///
    /// - `namespace`: Namespace to list from, `None` for all namespaces
    /// - `selector`: Kubernetes label selector (e.g. `dns=route53`)
    async fn list_services(
        &self,
        namespace: Option<&str>,
        selector: &str,
    ) -> Result<Vec<ServiceRecord>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
