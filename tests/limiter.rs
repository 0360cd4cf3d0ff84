//! End-to-end pacing and reservation accounting on a hand-advanced clock.

use http::{HeaderMap, HeaderValue, Method};
use riotlimits::{ManualClock, RateLimiter, Strategy};
use std::time::Duration;

const SUMMONER_URL: &str = "https://na1.api.riotgames.com/lol/summoner/v4/summoners/me";
const ACCOUNT_URL: &str =
    "https://europe.api.riotgames.com/riot/account/v1/accounts/by-puuid/some-puuid";

fn limiter_with_clock() -> (RateLimiter, ManualClock) {
    let clock = ManualClock::new();
    (RateLimiter::new().with_clock(clock.clone()), clock)
}

fn headers_from(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(*name, HeaderValue::from_static(value));
    }
    headers
}

#[test]
fn burst_wait_counts_down_as_the_window_elapses() {
    let (limiter, clock) = limiter_with_clock();

    // One request per 60s, already spent.
    let headers = headers_from(&[
        ("x-method-rate-limit", "1:60"),
        ("x-method-rate-limit-count", "1:60"),
        ("x-app-rate-limit", "1000:60"),
        ("x-app-rate-limit-count", "1:60"),
    ]);
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &headers).unwrap();

    let mut previous = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(previous, Duration::from_secs(60));

    for _ in 0..5 {
        clock.advance(10_000);
        let wait = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
        assert!(wait < previous, "wait should decrease as time passes");
        previous = wait;
    }

    clock.advance(10_000);
    let wait = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(wait, Duration::ZERO, "window fully elapsed");
}

#[test]
fn spread_paces_requests_evenly() {
    let (limiter, _clock) = limiter_with_clock();

    // 10 requests per 100s, none spent: burst says go, spread says ~10s.
    let headers = headers_from(&[
        ("x-method-rate-limit", "10:100"),
        ("x-method-rate-limit-count", "0:100"),
        ("x-app-rate-limit", "1000:100"),
        ("x-app-rate-limit-count", "0:100"),
    ]);
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &headers).unwrap();

    let burst = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(burst, Duration::ZERO);

    let spread = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Spread).unwrap();
    assert_eq!(spread, Duration::from_secs(10));
}

#[test]
fn the_most_restrictive_window_governs() {
    let (limiter, _clock) = limiter_with_clock();

    // Per-second window exhausted, two-minute window wide open.
    let headers = headers_from(&[
        ("x-app-rate-limit", "100:120,20:1"),
        ("x-app-rate-limit-count", "5:120,20:1"),
        ("x-method-rate-limit", "1000:60"),
        ("x-method-rate-limit-count", "0:60"),
    ]);
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &headers).unwrap();

    let wait = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(wait, Duration::from_secs(1));
}

#[test]
fn reservations_graduate_one_per_header_update() {
    let (limiter, _clock) = limiter_with_clock();

    limiter.reserve(SUMMONER_URL, &Method::GET).unwrap();
    limiter.reserve(SUMMONER_URL, &Method::GET).unwrap();
    assert_eq!(limiter.reservations(SUMMONER_URL, &Method::GET).unwrap(), (2, 2));

    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &HeaderMap::new()).unwrap();
    assert_eq!(limiter.reservations(SUMMONER_URL, &Method::GET).unwrap(), (1, 1));

    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &HeaderMap::new()).unwrap();
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &HeaderMap::new()).unwrap();
    assert_eq!(
        limiter.reservations(SUMMONER_URL, &Method::GET).unwrap(),
        (0, 0),
        "counter floors at zero once every reservation graduated"
    );
}

#[test]
fn remove_reservation_never_goes_negative() {
    let (limiter, _clock) = limiter_with_clock();

    limiter.reserve(SUMMONER_URL, &Method::GET).unwrap();
    limiter.remove_reservation(SUMMONER_URL, &Method::GET, 1_000_000).unwrap();
    assert_eq!(limiter.reservations(SUMMONER_URL, &Method::GET).unwrap(), (0, 0));
}

#[test]
fn reservations_make_concurrent_senders_wait() {
    let (limiter, _clock) = limiter_with_clock();

    // Budget of 3 per 30s, none confirmed yet.
    let headers = headers_from(&[
        ("x-app-rate-limit", "1000:30"),
        ("x-app-rate-limit-count", "0:30"),
        ("x-method-rate-limit", "3:30"),
        ("x-method-rate-limit-count", "0:30"),
    ]);
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &headers).unwrap();

    // Three callers commit before any response arrives.
    for _ in 0..3 {
        assert_eq!(
            limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap(),
            Duration::ZERO
        );
        limiter.reserve(SUMMONER_URL, &Method::GET).unwrap();
    }

    // A fourth sees the scope as saturated even with zero confirmed counts.
    let wait = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(wait, Duration::from_secs(30));
}

#[test]
fn scopes_are_independent_across_platforms() {
    let (limiter, _clock) = limiter_with_clock();

    // Saturate NA1's application scope.
    let headers = headers_from(&[
        ("x-app-rate-limit", "1:60"),
        ("x-app-rate-limit-count", "1:60"),
    ]);
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &headers).unwrap();

    let wait = limiter.wait_for(SUMMONER_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(wait, Duration::from_secs(60));

    // EUROPE has no state; its wait stays zero.
    let wait = limiter.wait_for(ACCOUNT_URL, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(wait, Duration::ZERO);
}

#[test]
fn app_scope_is_shared_across_operations_on_one_platform() {
    let (limiter, _clock) = limiter_with_clock();
    let match_url = "https://na1.api.riotgames.com/lol/match/v5/matches/NA1_99";

    // Exhaust the platform budget via the summoner endpoint.
    let headers = headers_from(&[
        ("x-app-rate-limit", "1:60"),
        ("x-app-rate-limit-count", "1:60"),
        ("x-method-rate-limit", "1000:60"),
        ("x-method-rate-limit-count", "0:60"),
    ]);
    limiter.update_from_headers(SUMMONER_URL, &Method::GET, &headers).unwrap();

    // A different operation on the same platform inherits the app wait.
    let wait = limiter.wait_for(match_url, &Method::GET, Strategy::Burst).unwrap();
    assert_eq!(wait, Duration::from_secs(60));
}

#[test]
fn engines_are_independent() {
    let (a, _clock_a) = limiter_with_clock();
    let (b, _clock_b) = limiter_with_clock();

    a.reserve(SUMMONER_URL, &Method::GET).unwrap();
    assert_eq!(a.reservations(SUMMONER_URL, &Method::GET).unwrap(), (1, 1));
    assert_eq!(b.reservations(SUMMONER_URL, &Method::GET).unwrap(), (0, 0));
}

#[test]
fn engine_is_usable_across_threads() {
    use std::sync::Arc;

    let limiter = Arc::new(RateLimiter::new().with_clock(ManualClock::new()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            std::thread::spawn(move || {
                limiter.reserve(SUMMONER_URL, &Method::GET).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(limiter.reservations(SUMMONER_URL, &Method::GET).unwrap(), (8, 8));
}
