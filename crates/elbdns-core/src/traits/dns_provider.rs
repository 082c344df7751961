// # DNS Provider Trait
//
// Defines the interface to the cloud DNS and load balancer APIs.
//
// ## Implementations
//
// - Route 53 + Classic ELB: `elbdns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use elbdns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let zones = provider.list_zones_by_name("example.com").await?;
//     for zone in zones {
//         println!("{} -> {}", zone.name, zone.short_id());
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{ChangeRequest, HostedZone, LoadBalancerDescription};

/// Trait for DNS provider implementations
///
/// Implementations wrap exactly three remote calls. Everything built on top
/// of them (zone matching, hostname parsing, change composition, dry-run) is
/// owned by [`DnsGateway`](crate::gateway::DnsGateway).
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform API calls to their endpoints only
/// - ✅ Translate provider responses into the core model
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Spawn tasks or threads (the scheduler owns the only worker)
/// - ❌ Retry or back off (a failed item is retried on the next pass)
/// - ❌ Cache zones or load balancers between calls
/// - ❌ Decide whether a change should be sent (dry-run is owned by the gateway)
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List hosted zones starting at `name`
    ///
    /// Only the first page of results is returned. Accounts with more zones
    /// than one page may see spurious `NoMatch` errors.
    async fn list_zones_by_name(&self, name: &str) -> Result<Vec<HostedZone>, crate::Error>;

    /// Describe the load balancer(s) with the given name
    async fn describe_load_balancer(
        &self,
        name: &str,
    ) -> Result<Vec<LoadBalancerDescription>, crate::Error>;

    /// Submit a single alias record upsert
    async fn upsert_alias_record(&self, change: &ChangeRequest) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
