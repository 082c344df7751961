//! Core synchronization engine
//!
//! The SyncEngine is responsible for one reconciliation pass:
//! - Listing managed services via ServiceSource
//! - Reading each service's ingress hostname and target domains
//! - Resolving load balancer and domain hosted zones via DnsGateway
//! - Upserting one alias record per domain
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ ServiceSource │─── Vec<ServiceRecord> ───┐
//! └───────────────┘                          │
//!                                            ▼
//!                                   ┌──────────────┐
//!                                   │  SyncEngine  │
//!                                   └──────────────┘
//!                                            │
//!         ┌──────────────────────────────────┼──────────────────────────┐
//!         │                                  │                          │
//!         ▼                                  ▼                          ▼
//! ┌─────────────────┐              ┌──────────────────┐         ┌─────────────┐
//! │ hostname / zone │              │    DnsGateway    │         │   Events    │
//! │ (pure parsing)  │              │ (lookup, upsert) │         │  (notify)   │
//! └─────────────────┘              └──────────────────┘         └─────────────┘
//! ```
//!
//! ## Failure isolation
//!
//! Only a failed service listing aborts a pass. A failing service is skipped
//! as a whole; a failing domain is skipped on its own. There is no retry: the
//! next pass starts from scratch.

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::gateway::{DnsGateway, UpdateOutcome};
use crate::model::ServiceRecord;
use crate::service::{domain_names, ingress_hostname};
use crate::traits::{DnsProvider, ServiceSource};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Events emitted by the SyncEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Pass started, services listed
    PassStarted {
        services_count: usize,
    },

    /// Service skipped as a whole
    ServiceSkipped {
        service: String,
        namespace: String,
        error: String,
    },

    /// One domain of a service skipped
    DomainSkipped {
        service: String,
        domain: String,
        error: String,
    },

    /// Alias record upserted (or logged, in dry-run)
    RecordUpserted {
        service: String,
        domain: String,
        hosted_zone_id: String,
        dry_run: bool,
    },

    /// Pass finished
    PassCompleted {
        summary: PassSummary,
    },

    /// Pass aborted before any service was processed
    PassFailed {
        error: String,
    },

    /// Scheduler stopped
    Stopped {
        reason: String,
    },
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Services returned by the listing
    pub services_seen: usize,
    /// Records upserted (or logged in dry-run)
    pub records_upserted: usize,
    pub services_skipped: usize,
    pub domains_skipped: usize,
}

impl PassSummary {
    fn started(services_seen: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            services_seen,
            records_upserted: 0,
            services_skipped: 0,
            domains_skipped: 0,
        }
    }
}

/// Core synchronization engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Run passes with [`SyncEngine::reconcile()`], usually through a
///    [`Scheduler`](crate::scheduler::Scheduler)
/// 3. Drop to cleanup
pub struct SyncEngine {
    /// Cluster service listing
    source: Box<dyn ServiceSource>,

    /// DNS lookups and updates
    gateway: DnsGateway,

    /// Namespace to list from, `None` for all
    namespace: Option<String>,

    /// Label selector for managed services
    selector: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        source: Box<dyn ServiceSource>,
        provider: Box<dyn DnsProvider>,
        config: SyncConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            source,
            gateway: DnsGateway::new(provider, config.dry_run),
            namespace: config.namespace,
            selector: config.selector,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(PassSummary)`: Services were listed; per-item failures are only logged
    /// - `Err(Error::ListServices)`: The listing itself failed
    pub async fn reconcile(&self) -> Result<PassSummary> {
        let started_at = Utc::now();

        let services = match self
            .source
            .list_services(self.namespace.as_deref(), &self.selector)
            .await
        {
            Ok(services) => services,
            Err(e) => {
                let error = Error::list_services(e);
                self.emit_event(EngineEvent::PassFailed {
                    error: error.to_string(),
                });
                return Err(error);
            }
        };

        info!(
            source = self.source.source_name(),
            "Found {} DNS services with selector {:?}",
            services.len(),
            self.selector
        );
        self.emit_event(EngineEvent::PassStarted {
            services_count: services.len(),
        });

        let mut summary = PassSummary::started(services.len(), started_at);

        for service in &services {
            if let Err(e) = self.sync_service(service, &mut summary).await {
                warn!(
                    service = %service.name,
                    namespace = %service.namespace,
                    "Skipping service: {}",
                    e
                );
                summary.services_skipped += 1;
                self.emit_event(EngineEvent::ServiceSkipped {
                    service: service.name.clone(),
                    namespace: service.namespace.clone(),
                    error: e.to_string(),
                });
            }
        }

        summary.finished_at = Utc::now();
        info!(
            "Pass complete: {} record(s) upserted, {} service(s) skipped, {} domain(s) skipped",
            summary.records_upserted, summary.services_skipped, summary.domains_skipped
        );
        self.emit_event(EngineEvent::PassCompleted {
            summary: summary.clone(),
        });

        Ok(summary)
    }

    /// Sync every domain of one service
    ///
    /// Returns an error only for failures shared by all of the service's
    /// domains. Domain-level failures are absorbed here.
    async fn sync_service(&self, service: &ServiceRecord, summary: &mut PassSummary) -> Result<()> {
        let lb_hostname = ingress_hostname(service)?;
        let domains = domain_names(service)?;
        let lb_zone_id = self.gateway.resolve_load_balancer_zone_id(lb_hostname).await?;

        debug!(
            service = %service.name,
            lb = lb_hostname,
            lb_zone_id = %lb_zone_id,
            "Resolved load balancer zone"
        );

        for domain in &domains {
            info!(
                "Creating DNS for {} service ({}): {} -> {}",
                service.name, service.namespace, lb_hostname, domain
            );

            match self.sync_domain(lb_hostname, &lb_zone_id, domain).await {
                Ok((zone_id, outcome)) => {
                    info!(
                        "Created DNS record set: domainName={}, hostedZoneID={}",
                        domain, zone_id
                    );
                    summary.records_upserted += 1;
                    self.emit_event(EngineEvent::RecordUpserted {
                        service: service.name.clone(),
                        domain: domain.clone(),
                        hosted_zone_id: zone_id,
                        dry_run: outcome.is_dry_run(),
                    });
                }
                Err(e) => {
                    warn!(service = %service.name, domain = %domain, "Skipping domain: {}", e);
                    summary.domains_skipped += 1;
                    self.emit_event(EngineEvent::DomainSkipped {
                        service: service.name.clone(),
                        domain: domain.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    async fn sync_domain(
        &self,
        lb_hostname: &str,
        lb_zone_id: &str,
        domain: &str,
    ) -> Result<(String, UpdateOutcome)> {
        let zone_id = self.gateway.resolve_hosted_zone_id(domain).await?;
        let outcome = self
            .gateway
            .apply_dns_update(lb_hostname, lb_zone_id, domain, &zone_id)
            .await?;
        Ok((zone_id, outcome))
    }

    /// Whether record changes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.gateway.is_dry_run()
    }

    /// Emit an engine event
    pub(crate) fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                // Event processing is slower than event generation; drop rather than grow
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // Nobody is listening
            }
        }
    }
}
