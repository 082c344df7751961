//! DNS provider gateway
//!
//! Builds the zone/load-balancer resolution and the record upsert on top of
//! the three raw [`DnsProvider`] calls. Dry-run lives here rather than in the
//! provider, so every provider gets the same behavior.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hostname::{load_balancer_identifier, top_zone_candidate};
use crate::model::ChangeRequest;
use crate::traits::DnsProvider;
use crate::zone::select_most_specific_zone;

/// Result of a DNS update, carrying the change that was built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The change was submitted to the provider
    Applied(ChangeRequest),
    /// Dry-run: the change was logged, not sent
    DryRun(ChangeRequest),
}

impl UpdateOutcome {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun(_))
    }

    /// The change that was sent, or would have been
    pub fn change(&self) -> &ChangeRequest {
        match self {
            Self::Applied(change) | Self::DryRun(change) => change,
        }
    }
}

/// Core operations over a [`DnsProvider`]
pub struct DnsGateway {
    provider: Box<dyn DnsProvider>,
    dry_run: bool,
}

impl std::fmt::Debug for DnsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsGateway")
            .field("provider", &self.provider.provider_name())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DnsGateway {
    pub fn new(provider: Box<dyn DnsProvider>, dry_run: bool) -> Self {
        Self { provider, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Resolve the short id of the hosted zone owning `domain`
    pub async fn resolve_hosted_zone_id(&self, domain: &str) -> Result<String> {
        let candidate = top_zone_candidate(domain)?;
        debug!(domain, candidate = %candidate, "Listing hosted zones");

        let zones = self
            .provider
            .list_zones_by_name(&candidate)
            .await
            .map_err(|e| Error::zone_lookup(&candidate, e))?;

        let zone = select_most_specific_zone(domain, &zones)?;
        debug!(domain, zone = %zone.name, id = %zone.id, "Matched hosted zone");

        Ok(zone.short_id().to_string())
    }

    /// Resolve the canonical hosted zone of the load balancer behind `hostname`
    pub async fn resolve_load_balancer_zone_id(&self, hostname: &str) -> Result<String> {
        let name = load_balancer_identifier(hostname).map_err(Error::hostname_parse)?;

        let mut descriptions = self
            .provider
            .describe_load_balancer(&name)
            .await
            .map_err(|e| Error::describe(&name, e))?;

        match descriptions.len() {
            0 => Err(Error::LoadBalancerNotFound(name)),
            1 => Ok(descriptions.remove(0).canonical_hosted_zone_id),
            count => Err(Error::AmbiguousLoadBalancer { name, count }),
        }
    }

    /// Build the alias upsert for `domain_name`
    ///
    /// Shared by live and dry-run updates, so both see the same payload.
    pub fn build_change_request(
        &self,
        lb_hostname: &str,
        lb_zone_id: &str,
        domain_name: &str,
        domain_zone_id: &str,
    ) -> ChangeRequest {
        ChangeRequest::upsert_alias(lb_hostname, lb_zone_id, domain_name, domain_zone_id)
    }

    /// Upsert an alias record pointing `domain_name` at the load balancer
    pub async fn apply_dns_update(
        &self,
        lb_hostname: &str,
        lb_zone_id: &str,
        domain_name: &str,
        domain_zone_id: &str,
    ) -> Result<UpdateOutcome> {
        let change = self.build_change_request(lb_hostname, lb_zone_id, domain_name, domain_zone_id);

        if self.dry_run {
            info!(
                "[DRY-RUN] Would have updated {} to point to {} ({}), payload: {}",
                domain_zone_id,
                lb_zone_id,
                lb_hostname,
                serde_json::to_string(&change)?
            );
            return Ok(UpdateOutcome::DryRun(change));
        }

        self.provider.upsert_alias_record(&change).await?;
        Ok(UpdateOutcome::Applied(change))
    }
}
