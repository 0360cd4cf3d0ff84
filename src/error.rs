//! Error types for endpoint resolution and header ingestion.
//!
//! Every error is returned synchronously to the immediate caller; nothing is
//! retried or logged internally. Callers decide whether to abort, retry the
//! whole request, or proceed without updated limits.

/// Unified error type for the rate limiter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RateLimitError {
    /// The request URL could not be parsed, or carries no host to derive a
    /// platform from.
    #[error("malformed url {url:?}: {reason}")]
    MalformedUrl {
        /// The URL as supplied by the caller.
        url: String,
        /// What the parser objected to.
        reason: String,
    },
    /// No route template matches the verb + path combination.
    #[error("unknown endpoint: {method} {path}")]
    UnknownEndpoint {
        /// Upper-cased HTTP verb of the request.
        method: String,
        /// Path component that failed to match.
        path: String,
    },
    /// A rate-limit header was present but unusable.
    ///
    /// Raised when a non-empty header value contains no `number:number` pair
    /// at all, when a numeric component does not fit the counter type, or
    /// when the value is not visible ASCII. Malformed pairs inside an
    /// otherwise-valid comma list are skipped, not fatal.
    #[error("invalid {header} header {value:?}: {reason}")]
    HeaderParse {
        /// Name of the offending header.
        header: String,
        /// The raw header value.
        value: String,
        /// What made the value unusable.
        reason: String,
    },
}

impl RateLimitError {
    /// Check if this error is a URL parse failure.
    pub fn is_malformed_url(&self) -> bool {
        matches!(self, Self::MalformedUrl { .. })
    }

    /// Check if this error means no route template matched.
    pub fn is_unknown_endpoint(&self) -> bool {
        matches!(self, Self::UnknownEndpoint { .. })
    }

    /// Check if this error came from an unusable rate-limit header.
    pub fn is_header_parse(&self) -> bool {
        matches!(self, Self::HeaderParse { .. })
    }
}
