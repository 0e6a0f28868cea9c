//! MX lookups through the system resolver

use anyhow::Result;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use tracing::warn;

use super::BaseMxResolver;

pub struct HickoryMxResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryMxResolver {
    /// Use /etc/resolv.conf, falling back to public resolvers if it can't be read
    pub fn from_system_conf() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!(error = %e, "System DNS config unavailable, using default resolvers");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });

        Self { resolver }
    }
}

#[async_trait]
impl BaseMxResolver for HickoryMxResolver {
    async fn has_mx_records(&self, domain: &str) -> Result<bool> {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => Ok(lookup.iter().next().is_some()),
            // NXDOMAIN / empty answer is a definite "no", not a failure
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
