//! Endpoint resolution: URL + verb → (platform, service, operation).
//!
//! The platform is the upper-cased first dot-separated label of the URL
//! host (`na1.api.riotgames.com` → `NA1`); the service and operation come
//! from matching the path against the route table. The result is computed
//! fresh per call and never stored.

use http::Method;
use url::Url;

use crate::error::RateLimitError;
use crate::routes::RouteTable;

/// A request resolved to the triple the server buckets quotas by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    platform: String,
    service: String,
    operation: String,
}

impl ResolvedEndpoint {
    /// Regional/shard identifier from the request host (e.g. `NA1`).
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Service the operation belongs to (e.g. `SUMMONER`).
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Verb-prefixed operation name (e.g. `GET_BY_ACCESS_TOKEN`).
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Store key for the platform-wide (application) scope.
    pub fn app_key(&self) -> String {
        self.platform.clone()
    }

    /// Store key for the (platform, service, operation) scope.
    pub fn method_key(&self) -> String {
        format!("{}:{}:{}", self.platform, self.service, self.operation)
    }
}

/// Resolve `url` + `method` against `routes`.
///
/// # Errors
/// `MalformedUrl` if the URL cannot be parsed or has no host;
/// `UnknownEndpoint` if no route template matches the verb + path.
pub fn resolve(
    routes: &RouteTable,
    url: &str,
    method: &Method,
) -> Result<ResolvedEndpoint, RateLimitError> {
    let parsed = Url::parse(url).map_err(|err| RateLimitError::MalformedUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| RateLimitError::MalformedUrl {
        url: url.to_string(),
        reason: "no host to derive a platform from".to_string(),
    })?;
    let platform = host.split('.').next().unwrap_or(host).to_uppercase();

    let path = parsed.path();
    let (service, operation) =
        routes.resolve_path(path, method).ok_or_else(|| RateLimitError::UnknownEndpoint {
            method: method.as_str().to_uppercase(),
            path: path.to_string(),
        })?;

    Ok(ResolvedEndpoint {
        platform,
        service: service.to_string(),
        operation: operation.to_string(),
    })
}
