//! The rate limiter engine.
//!
//! [`RateLimiter`] ties the resolver, the state store, and the window math
//! together: it ingests server response headers and tracks speculative
//! reservations, then predicts how long a caller should wait before the
//! next request. It never performs I/O and never blocks; the wait it
//! returns is advisory, and enforcement stays with the caller.
//!
//! The expected call pattern around every request:
//!
//! 1. `wait_for` → caller delays by the returned duration;
//! 2. `reserve` → the upcoming request counts against the budget even
//!    though no response has arrived yet;
//! 3. issue the request (outside this crate);
//! 4. `update_from_headers` with the response headers (this replaces the
//!    scope's windows and graduates one reservation into the confirmed
//!    count), or `remove_reservation` if the request was never sent.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::{HeaderMap, Method};

use crate::clock::{Clock, MonotonicClock};
use crate::endpoint::{self, ResolvedEndpoint};
use crate::error::RateLimitError;
use crate::headers::{
    parse_rate_limit_header, parse_retry_after, RateLimitPair, DEFAULT_COUNT_SPEC,
    DEFAULT_LIMIT_SPEC, HEADER_APP_RATE_LIMIT, HEADER_APP_RATE_LIMIT_COUNT,
    HEADER_METHOD_RATE_LIMIT, HEADER_METHOD_RATE_LIMIT_COUNT, HEADER_RETRY_AFTER,
};
use crate::routes::RouteTable;
use crate::store::{StateEntry, StateStore};
use crate::window::{LimitScope, RateLimitWindow, Strategy};

const RESERVATION_SUFFIX: &str = ":reservation";

fn reservation_key(scope: &str) -> String {
    format!("{scope}{RESERVATION_SUFFIX}")
}

/// Client-side rate-limit governor.
///
/// Owns its route table, state store, and clock rather than hiding them in
/// globals, so independent engines (e.g. one per credential) can coexist in
/// a process.
/// All state mutations happen under a per-engine lock, making each public
/// operation atomic with respect to the others; the engine can be shared
/// across threads behind an `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    routes: RouteTable,
    state: Mutex<StateStore>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Create an engine with the built-in Riot route table, an empty state
    /// store, and a monotonic clock.
    pub fn new() -> Self {
        Self::with_routes(RouteTable::riot_api())
    }

    /// Create an engine with a custom route table.
    pub fn with_routes(routes: RouteTable) -> Self {
        Self {
            routes,
            state: Mutex::new(StateStore::new()),
            clock: Arc::new(MonotonicClock::default()),
        }
    }

    /// Replace the state store (useful for seeding state in tests).
    pub fn with_store(self, store: StateStore) -> Self {
        Self { state: Mutex::new(store), ..self }
    }

    /// Override the clock (useful for deterministic tests).
    ///
    /// # Examples
    /// ```
    /// use riotlimits::{ManualClock, RateLimiter};
    ///
    /// let clock = ManualClock::new();
    /// let limiter = RateLimiter::new().with_clock(clock.clone());
    /// clock.advance(1_000);
    /// ```
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The engine's route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Resolve a request to the (platform, service, operation) triple the
    /// server buckets quotas by.
    ///
    /// # Errors
    /// `MalformedUrl` or `UnknownEndpoint`, as for every operation below.
    pub fn resolve(&self, url: &str, method: &Method) -> Result<ResolvedEndpoint, RateLimitError> {
        endpoint::resolve(&self.routes, url, method)
    }

    /// Refresh both scopes' windows from a server response.
    ///
    /// Absent (or empty) headers fall back to the documented defaults:
    /// [`DEFAULT_LIMIT_SPEC`] for limits, [`DEFAULT_COUNT_SPEC`] for
    /// counts, zero for `Retry-After`. All windows built from one response
    /// share one observation timestamp and one retry-after value.
    ///
    /// One reservation per scope graduates into the confirmed count (the
    /// response corresponds to a previously reserved request), then the
    /// stored window lists for both scopes are replaced wholesale. Nothing
    /// is mutated if resolution or parsing fails.
    ///
    /// # Errors
    /// Resolution errors, or `HeaderParse` if a present header value is
    /// wholly unusable.
    pub fn update_from_headers(
        &self,
        url: &str,
        method: &Method,
        headers: &HeaderMap,
    ) -> Result<(), RateLimitError> {
        let endpoint = self.resolve(url, method)?;
        let now = self.clock.now_millis();

        let app_limits = parse_rate_limit_header(
            HEADER_APP_RATE_LIMIT,
            header_or(headers, HEADER_APP_RATE_LIMIT, DEFAULT_LIMIT_SPEC)?,
        )?;
        let app_counts = parse_rate_limit_header(
            HEADER_APP_RATE_LIMIT_COUNT,
            header_or(headers, HEADER_APP_RATE_LIMIT_COUNT, DEFAULT_COUNT_SPEC)?,
        )?;
        let method_limits = parse_rate_limit_header(
            HEADER_METHOD_RATE_LIMIT,
            header_or(headers, HEADER_METHOD_RATE_LIMIT, DEFAULT_LIMIT_SPEC)?,
        )?;
        let method_counts = parse_rate_limit_header(
            HEADER_METHOD_RATE_LIMIT_COUNT,
            header_or(headers, HEADER_METHOD_RATE_LIMIT_COUNT, DEFAULT_COUNT_SPEC)?,
        )?;
        let retry_after = parse_retry_after(header_or(headers, HEADER_RETRY_AFTER, "0")?)?;

        let app_windows = build_windows(&app_limits, &app_counts, retry_after, now);
        let method_windows = build_windows(&method_limits, &method_counts, retry_after, now);

        let app_key = endpoint.app_key();
        let method_key = endpoint.method_key();

        let mut state = self.state.lock().unwrap();
        for key in [app_key.as_str(), method_key.as_str()] {
            let key = reservation_key(key);
            let current = state.reservations(&key);
            if current > 0 {
                state.set(key, StateEntry::Reservations(current - 1));
            }
        }
        tracing::debug!(
            app_scope = app_key.as_str(),
            method_scope = method_key.as_str(),
            app_windows = app_windows.len(),
            method_windows = method_windows.len(),
            "windows replaced from response headers"
        );
        state.set(app_key, StateEntry::Windows(app_windows));
        state.set(method_key, StateEntry::Windows(method_windows));

        Ok(())
    }

    /// Replace one scope's window list programmatically, bypassing header
    /// parsing. No reservation graduates.
    ///
    /// # Errors
    /// Resolution errors.
    pub fn update_rate_limits(
        &self,
        url: &str,
        method: &Method,
        scope: LimitScope,
        windows: Vec<RateLimitWindow>,
    ) -> Result<(), RateLimitError> {
        let endpoint = self.resolve(url, method)?;
        let key = match scope {
            LimitScope::Application => endpoint.app_key(),
            LimitScope::Method => endpoint.method_key(),
        };
        self.state.lock().unwrap().set(key, StateEntry::Windows(windows));
        Ok(())
    }

    /// Commit one upcoming request against both scopes, before any server
    /// feedback exists for it.
    ///
    /// # Errors
    /// Resolution errors.
    pub fn reserve(&self, url: &str, method: &Method) -> Result<(), RateLimitError> {
        let endpoint = self.resolve(url, method)?;
        let mut state = self.state.lock().unwrap();
        for key in [endpoint.app_key(), endpoint.method_key()] {
            let key = reservation_key(&key);
            let current = state.reservations(&key);
            state.set(key, StateEntry::Reservations(current.saturating_add(1)));
        }
        Ok(())
    }

    /// Roll back `n` reservations on both scopes, e.g. for requests that
    /// were never sent. Counters floor at zero however large `n` is.
    ///
    /// # Errors
    /// Resolution errors.
    pub fn remove_reservation(
        &self,
        url: &str,
        method: &Method,
        n: u64,
    ) -> Result<(), RateLimitError> {
        let endpoint = self.resolve(url, method)?;
        let mut state = self.state.lock().unwrap();
        for key in [endpoint.app_key(), endpoint.method_key()] {
            let key = reservation_key(&key);
            let current = state.reservations(&key);
            state.set(key, StateEntry::Reservations(current.saturating_sub(n)));
        }
        Ok(())
    }

    /// Current speculative reservation counters as
    /// (application scope, method scope).
    ///
    /// # Errors
    /// Resolution errors.
    pub fn reservations(&self, url: &str, method: &Method) -> Result<(u64, u64), RateLimitError> {
        let endpoint = self.resolve(url, method)?;
        let state = self.state.lock().unwrap();
        Ok((
            state.reservations(&reservation_key(&endpoint.app_key())),
            state.reservations(&reservation_key(&endpoint.method_key())),
        ))
    }

    /// Advisory wait before the next request to this endpoint.
    ///
    /// Considers the application windows followed by the method windows;
    /// each window's contribution adds the scope's reservation counter to
    /// its confirmed count, and the most restrictive window governs. The
    /// time spent inside this computation is discounted from the result,
    /// saturating at zero, so the duration reflects the remaining wait at
    /// the moment the caller receives it. Never sleeps.
    ///
    /// # Errors
    /// Resolution errors.
    pub fn wait_for(
        &self,
        url: &str,
        method: &Method,
        strategy: Strategy,
    ) -> Result<Duration, RateLimitError> {
        let endpoint = self.resolve(url, method)?;
        let started = self.clock.now_millis();

        let app_key = endpoint.app_key();
        let method_key = endpoint.method_key();

        let mut wait = Duration::ZERO;
        {
            let state = self.state.lock().unwrap();
            let app_reserved = state.reservations(&reservation_key(&app_key));
            let method_reserved = state.reservations(&reservation_key(&method_key));

            for window in state.windows(&app_key) {
                wait = wait.max(window.wait_contribution(app_reserved, started, strategy));
            }
            for window in state.windows(&method_key) {
                wait = wait.max(window.wait_contribution(method_reserved, started, strategy));
            }
        }

        let spent = self.clock.now_millis().saturating_sub(started);
        Ok(wait.saturating_sub(Duration::from_millis(spent)))
    }
}

/// Header value by name, falling back to `default` when the header is
/// absent or empty.
fn header_or<'a>(
    headers: &'a HeaderMap,
    name: &str,
    default: &'a str,
) -> Result<&'a str, RateLimitError> {
    match headers.get(name) {
        None => Ok(default),
        Some(value) => {
            let value = value.to_str().map_err(|_| RateLimitError::HeaderParse {
                header: name.to_string(),
                value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                reason: "not visible ASCII".to_string(),
            })?;
            if value.is_empty() {
                Ok(default)
            } else {
                Ok(value)
            }
        }
    }
}

/// Pair limit-spec[i] with count-spec[i] positionally; counts missing at
/// the tail default to zero. All windows share one timestamp and one
/// retry-after.
fn build_windows(
    limits: &[RateLimitPair],
    counts: &[RateLimitPair],
    retry_after: Duration,
    now: u64,
) -> Vec<RateLimitWindow> {
    limits
        .iter()
        .enumerate()
        .map(|(i, pair)| RateLimitWindow {
            limit: pair.limit,
            count: counts.get(i).map_or(0, |count_pair| count_pair.limit),
            window: Duration::from_secs(pair.window_secs),
            retry_after,
            last_at: now,
        })
        .collect()
}
