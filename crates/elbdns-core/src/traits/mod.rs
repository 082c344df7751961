//! Core traits for the elbdns system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Hosted zones, load balancers and record changes
//! - [`ServiceSource`]: Load-balanced services from the cluster

pub mod dns_provider;
pub mod service_source;

pub use dns_provider::DnsProvider;
pub use service_source::ServiceSource;
