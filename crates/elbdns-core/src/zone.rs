//! Hosted zone matching
//!
//! An account may hold both `example.com.` and `sub.example.com.` as
//! separately delegated zones. Records must land in the most specific zone
//! owning the domain, so matching is longest-suffix.

use crate::error::{Error, Result};
use crate::hostname::with_trailing_dot;
use crate::model::HostedZone;

/// Select the most specific zone whose name is a suffix of `domain`
///
/// Ties on name length keep the first zone encountered.
pub fn select_most_specific_zone<'a>(domain: &str, zones: &'a [HostedZone]) -> Result<&'a HostedZone> {
    let domain = with_trailing_dot(domain);
    if zones.is_empty() {
        return Err(Error::NoZones { domain });
    }

    let mut most_specific: Option<&HostedZone> = None;
    let mut longest = 0;

    for zone in zones {
        if domain.ends_with(zone.name.as_str()) && zone.name.len() > longest {
            longest = zone.name.len();
            most_specific = Some(zone);
        }
    }

    most_specific.ok_or(Error::NoMatch { domain })
}
