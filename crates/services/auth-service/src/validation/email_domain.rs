//! Email domain validation.
//!
//! A domain passes when it is on the allow-list and publishes at least one
//! MX record. Lookups use the platform resolver settings, with no retry
//! and no caching.

use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::{email_domain, is_allowed_email_domain};

#[cfg(test)]
use mockall::automock;

/// MX record resolution.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MxLookup: Send + Sync {
    /// Mail exchange host names for `domain`.
    async fn mx_hosts(&self, domain: &str) -> AppResult<Vec<String>>;
}

/// MX lookup through the system DNS resolver.
pub struct DnsMxLookup {
    resolver: TokioAsyncResolver,
}

impl DnsMxLookup {
    /// Resolver configured from `/etc/resolv.conf` (or the platform
    /// equivalent); falls back to the library defaults when that is
    /// unreadable.
    pub fn from_system_conf() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!("System resolver config unavailable ({}), using defaults", e);
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

#[async_trait]
impl MxLookup for DnsMxLookup {
    async fn mx_hosts(&self, domain: &str) -> AppResult<Vec<String>> {
        let lookup = self
            .resolver
            .mx_lookup(domain)
            .await
            .map_err(|e| AppError::service_unavailable(format!("MX lookup for {}: {}", domain, e)))?;

        Ok(lookup.iter().map(|mx| mx.exchange().to_utf8()).collect())
    }
}

/// Decides whether an email address may register.
#[derive(Clone)]
pub struct EmailDomainValidator {
    mx: Arc<dyn MxLookup>,
}

impl EmailDomainValidator {
    pub fn new(mx: Arc<dyn MxLookup>) -> Self {
        Self { mx }
    }

    /// `true` when the domain is allowed and has mail exchangers.
    ///
    /// Never fails: malformed addresses, disallowed domains, resolution
    /// errors and empty answers all yield `false`.
    pub async fn validate(&self, email: &str) -> bool {
        let Some(domain) = email_domain(email) else {
            return false;
        };

        if !is_allowed_email_domain(&domain) {
            debug!(%domain, "Email domain not on allow-list");
            return false;
        }

        match self.mx.mx_hosts(&domain).await {
            Ok(hosts) if !hosts.is_empty() => true,
            Ok(_) => {
                debug!(%domain, "No MX records");
                false
            }
            Err(e) => {
                warn!(%domain, error = %e, "MX lookup failed");
                false
            }
        }
    }
}
