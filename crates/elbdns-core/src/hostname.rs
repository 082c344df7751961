//! Hostname and domain string helpers
//!
//! Pure functions, no I/O. Classic ELB hostnames look like
//! `<name>-<id>.<region>.elb.amazonaws.com`, and internal ones are prefixed
//! with `internal-`.

use crate::error::{Error, Result};

const INTERNAL_PREFIX: &str = "internal";

/// Extract the load balancer name from its public hostname
///
/// # Examples
///
/// ```
/// use elbdns_core::hostname::load_balancer_identifier;
///
/// assert_eq!(load_balancer_identifier("foo-123.eu-west-1.elb.amazonaws.com").unwrap(), "foo");
/// assert_eq!(load_balancer_identifier("internal-foo-123.eu-west-1.elb.amazonaws.com").unwrap(), "foo");
/// ```
pub fn load_balancer_identifier(hostname: &str) -> Result<String> {
    let segments: Vec<&str> = hostname.split('-').collect();
    if segments.len() < 2 {
        return Err(Error::InvalidHostname(hostname.to_string()));
    }

    let name = if segments[0] == INTERNAL_PREFIX {
        segments[1]
    } else {
        segments[0]
    };

    Ok(name.to_string())
}

/// Append a trailing `.` unless the domain already ends with one
pub fn with_trailing_dot(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{}.", domain)
    }
}

/// Guess the top-level zone of a domain: its last two labels
///
/// Used as the name to query the provider's zone listing with. Domains with
/// fewer than three labels are rejected since a bare apex cannot be aliased
/// from here.
pub fn top_zone_candidate(domain: &str) -> Result<String> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 3 {
        return Err(Error::InvalidDomain(domain.to_string()));
    }

    Ok(labels[labels.len() - 2..].join("."))
}
