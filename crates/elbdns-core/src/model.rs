//! Data model shared between the engine, the DNS provider and the service source
//!
//! None of these values are cached by the core. Every pass rebuilds them from
//! the cluster and the DNS provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Comment attached to every change batch sent to the provider
pub const CHANGE_COMMENT: &str = "Kubernetes Update to Service";

/// Prefix marking a dual-stack (IPv4 + IPv6) load balancer alias target
pub const DUALSTACK_PREFIX: &str = "dualstack.";

/// A load-balanced service as seen by the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Service name
    pub name: String,
    /// Service namespace
    pub namespace: String,
    /// Service annotations
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Load balancer ingress endpoints, in the order the cluster reports them
    #[serde(default)]
    pub ingress: Vec<IngressEndpoint>,
}

impl ServiceRecord {
    /// Create a service with no annotations and no ingress
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Add an ingress endpoint with a hostname
    pub fn with_ingress_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.ingress.push(IngressEndpoint::hostname(hostname));
        self
    }
}

/// An externally reachable address assigned to a service's load balancer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressEndpoint {
    /// DNS hostname (set for AWS ELBs)
    pub hostname: Option<String>,
    /// IP address (set for IP-based load balancers)
    pub ip: Option<String>,
}

impl IngressEndpoint {
    /// Endpoint identified by hostname only
    pub fn hostname(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ip: None,
        }
    }
}

/// A DNS provider hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Opaque, path-like identifier (e.g. `/hostedzone/Z1D633PJN98FT9`)
    pub id: String,
    /// Dot-terminated zone name (e.g. `example.com.`)
    pub name: String,
}

impl HostedZone {
    /// Create a zone from its path-like id and dot-terminated name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The final path segment of the zone identifier
    pub fn short_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

/// A load balancer as described by the cloud provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerDescription {
    /// Load balancer name
    pub name: String,
    /// Hosted zone that owns the load balancer's DNS name
    pub canonical_hosted_zone_id: String,
}

/// Record change action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create the record or replace it if present
    Upsert,
}

impl ChangeAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record (alias)
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

/// Alias target of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Load balancer DNS name, dual-stack prefixed
    pub dns_name: String,
    /// Load balancer canonical hosted zone
    pub hosted_zone_id: String,
    /// Always false: the record does not follow load balancer health
    pub evaluate_target_health: bool,
}

/// One record-set change, built fresh per domain per pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Change action
    pub action: ChangeAction,
    /// Destination hosted zone (short id)
    pub hosted_zone_id: String,
    /// Record name, leading dots stripped
    pub record_name: String,
    /// Record type
    pub record_type: RecordType,
    /// Alias target
    pub alias_target: AliasTarget,
    /// Human-readable change comment
    pub comment: String,
}

impl ChangeRequest {
    /// Build an alias upsert pointing `domain_name` at a load balancer
    pub fn upsert_alias(
        lb_hostname: &str,
        lb_zone_id: &str,
        domain_name: &str,
        domain_zone_id: &str,
    ) -> Self {
        Self {
            action: ChangeAction::Upsert,
            hosted_zone_id: domain_zone_id.to_string(),
            record_name: domain_name.trim_start_matches('.').to_string(),
            record_type: RecordType::A,
            alias_target: AliasTarget {
                dns_name: format!("{}{}", DUALSTACK_PREFIX, lb_hostname),
                hosted_zone_id: lb_zone_id.to_string(),
                evaluate_target_health: false,
            },
            comment: CHANGE_COMMENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_takes_last_path_segment() {
        let zone = HostedZone::new("/hostedzone/Z1D633PJN98FT9", "example.com.");
        assert_eq!(zone.short_id(), "Z1D633PJN98FT9");

        let bare = HostedZone::new("Z1D633PJN98FT9", "example.com.");
        assert_eq!(bare.short_id(), "Z1D633PJN98FT9");
    }

    #[test]
    fn upsert_alias_shape() {
        let change = ChangeRequest::upsert_alias(
            "myelb-1234.eu-west-1.elb.amazonaws.com",
            "Z32O12XQLNTSW2",
            "..app.example.com",
            "ZONE123",
        );

        assert_eq!(change.action.as_str(), "UPSERT");
        assert_eq!(change.record_type.as_str(), "A");
        assert_eq!(change.record_name, "app.example.com");
        assert_eq!(change.hosted_zone_id, "ZONE123");
        assert_eq!(
            change.alias_target.dns_name,
            "dualstack.myelb-1234.eu-west-1.elb.amazonaws.com"
        );
        assert_eq!(change.alias_target.hosted_zone_id, "Z32O12XQLNTSW2");
        assert!(!change.alias_target.evaluate_target_health);
        assert_eq!(change.comment, CHANGE_COMMENT);
    }

    #[test]
    fn change_request_serializes_upsert_action() {
        let change = ChangeRequest::upsert_alias("lb-1.elb.amazonaws.com", "Z1", "a.b.com", "Z2");
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["action"], "UPSERT");
        assert_eq!(json["record_type"], "A");
    }
}
