//! Sliding rate-limit windows and pacing strategies.
//!
//! A scope can carry several windows at once (servers quote multiple
//! granularities, e.g. "100 per 2 minutes" and "20 per 1 second"); the
//! limiter takes the maximum contribution across all of them, so the most
//! restrictive window governs. Each strategy is a small pure function of one
//! window plus the scope's speculative reservation count.

use std::time::Duration;

/// Scope of a rate-limit update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    /// Platform-wide budget shared by every operation.
    Application,
    /// Budget for one (platform, service, operation) triple.
    Method,
}

/// Pacing policy applied when computing an advisory wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Fire requests back-to-back until a window saturates, then wait out
    /// the remainder of that window.
    Burst,
    /// Distribute the remaining permitted requests evenly across the
    /// remainder of the window, even before saturation.
    Spread,
}

/// One sliding quota window observed from server headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// Maximum requests permitted inside the window.
    pub limit: u64,
    /// Server-confirmed requests observed so far in the current window.
    pub count: u64,
    /// Window length.
    pub window: Duration,
    /// Server-mandated minimum delay, usually zero. Carried as advisory
    /// data for callers; the wait computation does not consume it.
    pub retry_after: Duration,
    /// Clock milliseconds when this window was observed or reset.
    pub last_at: u64,
}

impl RateLimitWindow {
    /// How long this window asks the caller to wait under `strategy`.
    ///
    /// `reserved` is the scope's speculative reservation count; it is added
    /// to the server-confirmed `count` before comparing against `limit`, so
    /// in-flight requests that have produced no response yet still consume
    /// budget. A window whose length has fully elapsed (or is zero)
    /// contributes nothing.
    pub fn wait_contribution(&self, reserved: u64, now_millis: u64, strategy: Strategy) -> Duration {
        let elapsed = Duration::from_millis(now_millis.saturating_sub(self.last_at));
        if elapsed >= self.window {
            return Duration::ZERO;
        }
        let remaining_time = self.window - elapsed;

        let effective = self.count.saturating_add(reserved);
        if effective >= self.limit {
            // Saturated: wait out the rest of the window.
            return remaining_time;
        }

        match strategy {
            Strategy::Burst => Duration::ZERO,
            Strategy::Spread => {
                let remaining_requests = u32::try_from(self.limit - effective).unwrap_or(u32::MAX);
                remaining_time / remaining_requests
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(limit: u64, count: u64, secs: u64, last_at: u64) -> RateLimitWindow {
        RateLimitWindow {
            limit,
            count,
            window: Duration::from_secs(secs),
            retry_after: Duration::ZERO,
            last_at,
        }
    }

    #[test]
    fn burst_saturated_waits_out_the_window() {
        let w = window(1, 1, 60, 0);
        assert_eq!(w.wait_contribution(0, 0, Strategy::Burst), Duration::from_secs(60));
        assert_eq!(w.wait_contribution(0, 45_000, Strategy::Burst), Duration::from_secs(15));
    }

    #[test]
    fn burst_under_limit_contributes_nothing() {
        let w = window(10, 3, 60, 0);
        assert_eq!(w.wait_contribution(0, 1_000, Strategy::Burst), Duration::ZERO);
    }

    #[test]
    fn expired_window_contributes_nothing() {
        let w = window(1, 1, 60, 0);
        assert_eq!(w.wait_contribution(0, 60_000, Strategy::Burst), Duration::ZERO);
        assert_eq!(w.wait_contribution(0, 61_000, Strategy::Spread), Duration::ZERO);
    }

    #[test]
    fn spread_paces_evenly_across_the_window() {
        // 10 requests over 100s => one every 10s.
        let w = window(10, 0, 100, 0);
        assert_eq!(w.wait_contribution(0, 0, Strategy::Spread), Duration::from_secs(10));
        // Halfway through with 5 spent the pace is unchanged.
        let w = window(10, 5, 100, 0);
        assert_eq!(w.wait_contribution(0, 50_000, Strategy::Spread), Duration::from_secs(10));
    }

    #[test]
    fn spread_saturated_matches_burst() {
        let w = window(2, 2, 30, 0);
        assert_eq!(
            w.wait_contribution(0, 10_000, Strategy::Spread),
            w.wait_contribution(0, 10_000, Strategy::Burst),
        );
    }

    #[test]
    fn reservations_count_toward_saturation() {
        let w = window(2, 1, 60, 0);
        // One confirmed plus one reserved fills the window.
        assert_eq!(w.wait_contribution(1, 0, Strategy::Burst), Duration::from_secs(60));
        assert_eq!(w.wait_contribution(0, 0, Strategy::Burst), Duration::ZERO);
    }

    #[test]
    fn zero_limit_window_always_saturated() {
        let w = window(0, 0, 10, 0);
        assert_eq!(w.wait_contribution(0, 0, Strategy::Burst), Duration::from_secs(10));
        assert_eq!(w.wait_contribution(0, 0, Strategy::Spread), Duration::from_secs(10));
    }

    #[test]
    fn zero_length_window_never_contributes() {
        let w = window(1, 5, 0, 0);
        assert_eq!(w.wait_contribution(0, 0, Strategy::Burst), Duration::ZERO);
        assert_eq!(w.wait_contribution(0, 0, Strategy::Spread), Duration::ZERO);
    }
}
