//! Helpers reading DNS intent out of a [`ServiceRecord`]

use crate::error::{Error, Result};
use crate::model::ServiceRecord;

/// Annotation holding the comma-separated domains to point at the load balancer
pub const DOMAIN_NAMES_ANNOTATION: &str = "domainNames";

/// The hostname of the service's single load balancer ingress
pub fn ingress_hostname(service: &ServiceRecord) -> Result<&str> {
    match service.ingress.as_slice() {
        [] => Err(Error::NoIngress(service.name.clone())),
        [endpoint] => endpoint
            .hostname
            .as_deref()
            .ok_or_else(|| Error::IngressWithoutHostname(service.name.clone())),
        many => Err(Error::MultipleIngress {
            service: service.name.clone(),
            count: many.len(),
        }),
    }
}

/// The domains listed in the `domainNames` annotation
///
/// Entries are trimmed. Order and duplicates are preserved.
pub fn domain_names(service: &ServiceRecord) -> Result<Vec<String>> {
    let annotation = service
        .annotations
        .get(DOMAIN_NAMES_ANNOTATION)
        .ok_or_else(|| Error::MissingAnnotation {
            service: service.name.clone(),
            annotation: DOMAIN_NAMES_ANNOTATION.to_string(),
        })?;

    Ok(annotation
        .split(',')
        .map(|name| name.trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IngressEndpoint;

    #[test]
    fn no_ingress() {
        let service = ServiceRecord::new("web", "default");
        assert!(matches!(ingress_hostname(&service), Err(Error::NoIngress(ref s)) if s == "web"));
    }

    #[test]
    fn multiple_ingress() {
        let service = ServiceRecord::new("web", "default")
            .with_ingress_hostname("a-1.elb.amazonaws.com")
            .with_ingress_hostname("b-2.elb.amazonaws.com");
        assert!(matches!(
            ingress_hostname(&service),
            Err(Error::MultipleIngress { count: 2, .. })
        ));
    }

    #[test]
    fn single_ingress_hostname_unchanged() {
        let service =
            ServiceRecord::new("web", "default").with_ingress_hostname("elb.hostname.amazonaws.com");
        assert_eq!(ingress_hostname(&service).unwrap(), "elb.hostname.amazonaws.com");
    }

    #[test]
    fn ip_only_ingress() {
        let mut service = ServiceRecord::new("web", "default");
        service.ingress.push(IngressEndpoint {
            hostname: None,
            ip: Some("10.0.0.1".to_string()),
        });
        assert!(matches!(
            ingress_hostname(&service),
            Err(Error::IngressWithoutHostname(_))
        ));
    }

    #[test]
    fn domain_names_are_trimmed() {
        let service = ServiceRecord::new("web", "default")
            .with_annotation(DOMAIN_NAMES_ANNOTATION, "some.domain.com, other.domain.com");
        assert_eq!(
            domain_names(&service).unwrap(),
            vec!["some.domain.com", "other.domain.com"]
        );
    }

    #[test]
    fn domain_names_keep_order_and_duplicates() {
        let service = ServiceRecord::new("web", "default")
            .with_annotation(DOMAIN_NAMES_ANNOTATION, "b.x.com,a.x.com , b.x.com");
        assert_eq!(
            domain_names(&service).unwrap(),
            vec!["b.x.com", "a.x.com", "b.x.com"]
        );
    }

    #[test]
    fn missing_annotation_names_service() {
        let service = ServiceRecord::new("web", "default");
        let err = domain_names(&service).unwrap_err();
        assert!(matches!(err, Error::MissingAnnotation { ref service, .. } if service == "web"));
        assert_eq!(err.to_string(), "Annotation 'domainNames' not set for web");
    }
}
