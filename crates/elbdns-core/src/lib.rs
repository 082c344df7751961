// # elbdns-core
//
// Core library keeping Route 53 alias records in sync with the load
// balancers of Kubernetes services.
//
// ## Architecture Overview
//
// - **hostname**: ELB hostname and domain string parsing
// - **zone**: Longest-suffix hosted zone matching
// - **DnsProvider**: Trait for the cloud DNS / load balancer APIs
// - **DnsGateway**: Zone and load balancer resolution, record upserts, dry-run
// - **ServiceSource**: Trait for listing managed services from the cluster
// - **SyncEngine**: One reconciliation pass with per-item failure isolation
// - **Scheduler**: Fixed-interval passes on a single cancellable worker
//
// ## Design Principles
//
// 1. **Stateless passes**: Every pass recomputes everything from the cluster and the provider
// 2. **Isolation**: One bad service or domain never blocks the others
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: Upserts make repeated passes safe

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod hostname;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::{SyncConfig, MANAGED_SELECTOR};
pub use engine::{EngineEvent, PassSummary, SyncEngine};
pub use error::{Error, Result};
pub use gateway::{DnsGateway, UpdateOutcome};
pub use model::{ChangeRequest, HostedZone, IngressEndpoint, LoadBalancerDescription, ServiceRecord};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use service::DOMAIN_NAMES_ANNOTATION;
pub use traits::{DnsProvider, ServiceSource};
