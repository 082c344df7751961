// # Route 53 DNS Provider
//
// This crate provides the AWS implementation of `elbdns_core::DnsProvider`:
// hosted zones and record changes through Route 53, load balancer lookups
// through the Classic Elastic Load Balancing API.
//
// ## Trust Level: Untrusted (DNS Provider)
//
// **Allowed Capabilities**:
// - ✅ Perform AWS API calls
// - ✅ Translate SDK types into the core model
//
// **Forbidden Capabilities** (enforced by code review):
// - ❌ Spawn tasks or threads
// - ❌ Implement retry logic (a failed item is retried on the next pass)
// - ❌ Decide on dry-run (owned by `DnsGateway`)
// - ❌ Cache zones or load balancers
//
// ## Credentials & Region
//
// Resolved by the standard AWS chain: environment, shared profile, then the
// EC2 instance metadata service. Credentials never appear in logs.
//
// ## API Reference
//
// - ListHostedZonesByName: first page only
// - DescribeLoadBalancers (Classic ELB)
// - ChangeResourceRecordSets: one UPSERT per call

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, ResourceRecordSet, RrType,
};
use elbdns_core::model::{self, ChangeRequest, HostedZone, LoadBalancerDescription};
use elbdns_core::traits::DnsProvider;
use elbdns_core::{Error, Result};

const PROVIDER_NAME: &str = "route53";

/// Route 53 + Classic ELB provider
pub struct Route53Provider {
    /// Route 53 client (zones, record sets)
    route53: aws_sdk_route53::Client,

    /// Classic ELB client (load balancer descriptions)
    elb: aws_sdk_elasticloadbalancing::Client,
}

// Custom Debug implementation that hides SDK configuration
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("region", &self.route53.config().region().map(|r| r.to_string()))
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl Route53Provider {
    /// Create a provider from the default AWS configuration chain
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_sdk_config(&config)
    }

    /// Create a provider from an already loaded AWS configuration
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            route53: aws_sdk_route53::Client::new(config),
            elb: aws_sdk_elasticloadbalancing::Client::new(config),
        }
    }

    /// Whether a region was resolved; the ELB API cannot be reached without one
    pub fn has_region(&self) -> bool {
        self.elb.config().region().is_some()
    }
}

/// Translate a core change into a Route 53 change batch
pub fn change_batch(change: &ChangeRequest) -> Result<ChangeBatch> {
    let action = match change.action {
        model::ChangeAction::Upsert => ChangeAction::Upsert,
    };
    let record_type = match change.record_type {
        model::RecordType::A => RrType::A,
    };

    let alias_target = AliasTarget::builder()
        .dns_name(&change.alias_target.dns_name)
        .hosted_zone_id(&change.alias_target.hosted_zone_id)
        .evaluate_target_health(change.alias_target.evaluate_target_health)
        .build()
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("Invalid alias target: {}", e)))?;

    let record_set = ResourceRecordSet::builder()
        .name(&change.record_name)
        .r#type(record_type)
        .alias_target(alias_target)
        .build()
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("Invalid record set: {}", e)))?;

    let change = Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("Invalid change: {}", e)))?;

    ChangeBatch::builder()
        .changes(change)
        .comment(model::CHANGE_COMMENT)
        .build()
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("Invalid change batch: {}", e)))
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_zones_by_name(&self, name: &str) -> Result<Vec<HostedZone>> {
        tracing::debug!("Listing hosted zones by name: {}", name);

        let output = self
            .route53
            .list_hosted_zones_by_name()
            .dns_name(name)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, DisplayErrorContext(&e).to_string()))?;

        if output.is_truncated() {
            // TODO: follow next_dns_name/next_hosted_zone_id for accounts with more than one page of zones
            tracing::debug!("Hosted zone listing for {} is truncated, using first page", name);
        }

        Ok(output
            .hosted_zones()
            .iter()
            .map(|zone| HostedZone::new(zone.id(), zone.name()))
            .collect())
    }

    async fn describe_load_balancer(&self, name: &str) -> Result<Vec<LoadBalancerDescription>> {
        tracing::debug!("Describing load balancer: {}", name);

        let output = self
            .elb
            .describe_load_balancers()
            .load_balancer_names(name)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, DisplayErrorContext(&e).to_string()))?;

        output
            .load_balancer_descriptions()
            .iter()
            .map(|desc| {
                let lb_name = desc.load_balancer_name().unwrap_or(name).to_string();
                let zone = desc.canonical_hosted_zone_name_id().ok_or_else(|| {
                    Error::provider(
                        PROVIDER_NAME,
                        format!("Load balancer {} has no canonical hosted zone", lb_name),
                    )
                })?;
                Ok(LoadBalancerDescription {
                    name: lb_name,
                    canonical_hosted_zone_id: zone.to_string(),
                })
            })
            .collect()
    }

    async fn upsert_alias_record(&self, change: &ChangeRequest) -> Result<()> {
        tracing::info!(
            "Upserting Route 53 record: {} -> {} (zone {})",
            change.record_name,
            change.alias_target.dns_name,
            change.hosted_zone_id
        );

        let batch = change_batch(change)?;

        self.route53
            .change_resource_record_sets()
            .hosted_zone_id(&change.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
