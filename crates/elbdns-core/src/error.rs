//! Error types for the elbdns system
//!
//! This module defines all error types used throughout the crate.
//!
//! Errors fall into three groups:
//! - transport/API failures from the cluster or the DNS provider
//! - validation failures (malformed hostname or domain, missing annotation, ingress shape)
//! - not-found/ambiguous lookups (no matching zone, no or several load balancers)
//!
//! Only [`Error::ListServices`] aborts a reconciliation pass; everything else
//! is logged by the engine and the affected item is skipped.

use thiserror::Error;

/// Result type alias for elbdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the elbdns system
#[derive(Error, Debug)]
pub enum Error {
    /// Load balancer hostname does not follow the `<name>-<id>.<region>.elb.amazonaws.com` shape
    #[error("{0} is not a valid ELB hostname")]
    InvalidHostname(String),

    /// Domain has fewer than three labels
    #[error(
        "Domain {0} is invalid - it should be a fully qualified domain name and subdomain (i.e. subdomain.example.com)"
    )]
    InvalidDomain(String),

    /// The provider returned no hosted zones at all
    #[error("No zone found for {domain}")]
    NoZones {
        /// Domain (trailing-dot form) that was being matched
        domain: String,
    },

    /// None of the returned hosted zones is a suffix of the domain
    #[error("No zone matches domain {domain}")]
    NoMatch {
        /// Domain (trailing-dot form) that was being matched
        domain: String,
    },

    /// Listing hosted zones by name failed
    #[error("No zone found for {name}: {source}")]
    ZoneLookup {
        /// Zone name that was queried
        name: String,
        /// Underlying provider failure
        source: Box<Error>,
    },

    /// The load balancer identifier could not be derived from its hostname
    #[error("Could not parse ELB hostname: {source}")]
    HostnameParse {
        /// Underlying parse failure
        source: Box<Error>,
    },

    /// Describing the load balancer failed
    #[error("Could not describe load balancer {name}: {source}")]
    Describe {
        /// Load balancer name that was queried
        name: String,
        /// Underlying provider failure
        source: Box<Error>,
    },

    /// No load balancer matches the identifier
    #[error("No load balancer found for {0}")]
    LoadBalancerNotFound(String),

    /// Several load balancers match the identifier
    #[error("Multiple load balancers found for {name} ({count})")]
    AmbiguousLoadBalancer {
        /// Load balancer name that was queried
        name: String,
        /// Number of descriptions returned
        count: usize,
    },

    /// The service has no load balancer ingress yet
    #[error("No ingress defined for ELB of service {0}")]
    NoIngress(String),

    /// The service exposes more than one ingress point
    #[error("Multiple ingress points ({count}) found for ELB of service {service}, not supported")]
    MultipleIngress {
        /// Service name
        service: String,
        /// Number of ingress endpoints
        count: usize,
    },

    /// The single ingress endpoint carries an IP but no hostname
    #[error("Ingress of service {0} has no hostname")]
    IngressWithoutHostname(String),

    /// Required annotation is absent
    #[error("Annotation '{annotation}' not set for {service}")]
    MissingAnnotation {
        /// Service name
        service: String,
        /// Annotation key
        annotation: String,
    },

    /// Listing services from the cluster failed
    #[error("Failed to list services: {source}")]
    ListServices {
        /// Underlying cluster failure
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Cluster API error
    #[error("Cluster error ({source_name}): {message}")]
    Cluster {
        /// Service source name
        source_name: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a cluster API error
    pub fn cluster(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cluster {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Wrap a failed hosted zone listing
    pub fn zone_lookup(name: impl Into<String>, source: Error) -> Self {
        Self::ZoneLookup {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a failed load balancer description
    pub fn describe(name: impl Into<String>, source: Error) -> Self {
        Self::Describe {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a hostname parse failure
    pub fn hostname_parse(source: Error) -> Self {
        Self::HostnameParse {
            source: Box::new(source),
        }
    }

    /// Wrap a failed service listing
    pub fn list_services(source: Error) -> Self {
        Self::ListServices {
            source: Box::new(source),
        }
    }

    /// Whether this error aborts a whole reconciliation pass
    pub fn is_fatal_to_pass(&self) -> bool {
        matches!(self, Self::ListServices { .. })
    }
}
