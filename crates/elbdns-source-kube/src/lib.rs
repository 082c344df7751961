//! Kubernetes service source
//!
//! Lists `v1/Service` objects by label selector and converts them into
//! [`ServiceRecord`]s. Uses in-cluster configuration when running in a pod,
//! falling back to the local kubeconfig.

use async_trait::async_trait;
use elbdns_core::model::{IngressEndpoint, ServiceRecord};
use elbdns_core::traits::ServiceSource;
use elbdns_core::{Error, Result};
use k8s_openapi::api::core::v1::Service;
use kube::api::ListParams;
use kube::{Api, Client};

const SOURCE_NAME: &str = "kubernetes";

/// Service source backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeServiceSource {
    client: Client,
}

impl std::fmt::Debug for KubeServiceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeServiceSource")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl KubeServiceSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect with the inferred configuration (in-cluster or kubeconfig)
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| Error::cluster(SOURCE_NAME, format!("Failed to create client: {}", e)))?;
        Ok(Self::new(client))
    }
}

/// Convert a Kubernetes service into the core model
///
/// Missing metadata becomes empty strings; ingress order is preserved.
pub fn service_record(service: &Service) -> ServiceRecord {
    let ingress = service
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .map(|ingress| {
            ingress
                .iter()
                .map(|endpoint| IngressEndpoint {
                    hostname: endpoint.hostname.clone().filter(|h| !h.is_empty()),
                    ip: endpoint.ip.clone().filter(|ip| !ip.is_empty()),
                })
                .collect()
        })
        .unwrap_or_default();

    ServiceRecord {
        name: service.metadata.name.clone().unwrap_or_default(),
        namespace: service.metadata.namespace.clone().unwrap_or_default(),
        annotations: service.metadata.annotations.clone().unwrap_or_default(),
        ingress,
    }
}

#[async_trait]
impl ServiceSource for KubeServiceSource {
    async fn list_services(
        &self,
        namespace: Option<&str>,
        selector: &str,
    ) -> Result<Vec<ServiceRecord>> {
        let api: Api<Service> = match namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        };

        let lp = ListParams::default().labels(selector);
        let services = api
            .list(&lp)
            .await
            .map_err(|e| Error::cluster(SOURCE_NAME, e.to_string()))?;

        tracing::debug!(
            "Listed {} service(s) in {} with selector {:?}",
            services.items.len(),
            namespace.unwrap_or("all namespaces"),
            selector
        );

        Ok(services.items.iter().map(service_record).collect())
    }

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{LoadBalancerIngress, LoadBalancerStatus, ServiceStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn ingress(hostname: Option<&str>, ip: Option<&str>) -> LoadBalancerIngress {
        LoadBalancerIngress {
            hostname: hostname.map(str::to_string),
            ip: ip.map(str::to_string),
            ..Default::default()
        }
    }

    fn service(ingress: Option<Vec<LoadBalancerIngress>>) -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some("web".to_string()),
                namespace: Some("production".to_string()),
                annotations: Some(BTreeMap::from([(
                    "domainNames".to_string(),
                    "app.example.com, www.example.com".to_string(),
                )])),
                ..Default::default()
            },
            status: Some(ServiceStatus {
                load_balancer: Some(LoadBalancerStatus { ingress }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn converts_metadata_and_ingress() {
        let record = service_record(&service(Some(vec![
            ingress(Some("myelb-1.eu-west-1.elb.amazonaws.com"), None),
            ingress(None, Some("203.0.113.10")),
        ])));

        assert_eq!(record.name, "web");
        assert_eq!(record.namespace, "production");
        assert_eq!(
            record.annotations.get("domainNames").map(String::as_str),
            Some("app.example.com, www.example.com")
        );
        assert_eq!(
            record.ingress,
            vec![
                IngressEndpoint::hostname("myelb-1.eu-west-1.elb.amazonaws.com"),
                IngressEndpoint {
                    hostname: None,
                    ip: Some("203.0.113.10".to_string()),
                },
            ]
        );
    }

    #[test]
    fn pending_load_balancer_has_no_ingress() {
        assert!(service_record(&service(None)).ingress.is_empty());
        assert!(service_record(&Service::default()).ingress.is_empty());
    }

    #[test]
    fn empty_hostname_treated_as_absent() {
        let record = service_record(&service(Some(vec![ingress(Some(""), Some("10.0.0.1"))])));
        assert_eq!(record.ingress[0].hostname, None);
    }

    #[test]
    fn record_feeds_core_helpers() {
        let record = service_record(&service(Some(vec![ingress(
            Some("myelb-1.eu-west-1.elb.amazonaws.com"),
            None,
        )])));

        assert_eq!(
            elbdns_core::service::ingress_hostname(&record).unwrap(),
            "myelb-1.eu-west-1.elb.amazonaws.com"
        );
        assert_eq!(
            elbdns_core::service::domain_names(&record).unwrap(),
            vec!["app.example.com", "www.example.com"]
        );
    }
}
