#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # riotlimits
//!
//! Client-side rate-limit governor for Riot-style APIs: resolves requests
//! to the (platform, service, operation) triples the servers bucket quotas
//! by, tracks the sliding windows those servers report through response
//! headers, and predicts how long to wait before the next request.
//!
//! ## Features
//!
//! - **Endpoint resolution** from URL + HTTP verb against an
//!   insertion-ordered route table (the full Riot API table is built in)
//! - **Sliding-window tracking** per platform and per operation, refreshed
//!   wholesale from `X-App-Rate-Limit`-family headers
//! - **Reservations** so concurrent requests issued before any server
//!   feedback still count against the budget
//! - **Two pacing strategies**: burst (run free until saturated) and
//!   spread (even pacing across the window)
//! - **Advisory only**: the engine never performs I/O and never blocks;
//!   callers enforce the returned wait
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use riotlimits::{RateLimiter, Strategy};
//!
//! let limiter = RateLimiter::new();
//! let url = "https://na1.api.riotgames.com/lol/summoner/v4/summoners/me";
//!
//! // Before sending: how long should we hold off, and commit the request.
//! let wait = limiter.wait_for(url, &Method::GET, Strategy::Burst)?;
//! assert!(wait.is_zero());
//! limiter.reserve(url, &Method::GET)?;
//!
//! // ... issue the request, then feed the response headers back:
//! // limiter.update_from_headers(url, &Method::GET, response.headers())?;
//! # Ok::<(), riotlimits::RateLimitError>(())
//! ```

pub mod clock;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod limiter;
pub mod routes;
pub mod store;
pub mod window;

// Re-exports
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use endpoint::ResolvedEndpoint;
pub use error::RateLimitError;
pub use headers::RateLimitPair;
pub use limiter::RateLimiter;
pub use routes::{Route, RouteTable};
pub use store::{StateEntry, StateStore};
pub use window::{LimitScope, RateLimitWindow, Strategy};
