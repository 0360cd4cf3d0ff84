//! Rate-limit header vocabulary and parsing.
//!
//! The server reports budgets through four headers, each a comma-separated
//! list of `limit:windowSeconds` pairs (e.g. `"100:120,20:1"`), plus a
//! `Retry-After` value in fractional seconds. Limit headers and their count
//! counterparts are positionally aligned: pair `i` of the count header
//! belongs to pair `i` of the limit header.
//!
//! Parsing is deliberately lenient about junk *between* valid pairs (a
//! malformed pair inside an otherwise-valid list is dropped), but a
//! non-empty value with no valid pair at all is an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::error::RateLimitError;

/// Application-scope limit header.
pub const HEADER_APP_RATE_LIMIT: &str = "x-app-rate-limit";
/// Application-scope observed-count header.
pub const HEADER_APP_RATE_LIMIT_COUNT: &str = "x-app-rate-limit-count";
/// Method-scope limit header.
pub const HEADER_METHOD_RATE_LIMIT: &str = "x-method-rate-limit";
/// Method-scope observed-count header.
pub const HEADER_METHOD_RATE_LIMIT_COUNT: &str = "x-method-rate-limit-count";
/// Server-mandated minimum delay, in seconds.
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Limit spec assumed when a limit header is absent.
pub const DEFAULT_LIMIT_SPEC: &str = "100:120,20:1";
/// Count spec assumed when a count header is absent.
pub const DEFAULT_COUNT_SPEC: &str = "1:120,1:1";

static PAIR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+):(\d+)").unwrap());

/// One `limit:windowSeconds` pair from a rate-limit header.
///
/// For count headers the first component is the observed request count
/// rather than a limit; the field name follows the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPair {
    /// First component: maximum (limit headers) or observed (count headers)
    /// request count.
    pub limit: u64,
    /// Second component: window length in seconds.
    pub window_secs: u64,
}

/// Parse a comma-separated `limit:windowSeconds` header value.
///
/// An empty value parses to an empty list. A non-empty value must contain at
/// least one valid pair; pairs are returned in the order they appear, and
/// malformed fragments between valid pairs are skipped.
///
/// # Errors
/// `HeaderParse` if no valid pair is found or a numeric component does not
/// fit `u64`.
pub fn parse_rate_limit_header(
    header: &str,
    value: &str,
) -> Result<Vec<RateLimitPair>, RateLimitError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let parse_err = |reason: &str| RateLimitError::HeaderParse {
        header: header.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut pairs = Vec::new();
    for captures in PAIR_PATTERN.captures_iter(value) {
        let limit = captures[1]
            .parse::<u64>()
            .map_err(|_| parse_err("limit/count component out of range"))?;
        let window_secs = captures[2]
            .parse::<u64>()
            .map_err(|_| parse_err("window component out of range"))?;
        pairs.push(RateLimitPair { limit, window_secs });
    }

    if pairs.is_empty() {
        return Err(parse_err("no limit:window pairs"));
    }

    Ok(pairs)
}

/// Parse a `Retry-After` value: a single non-negative floating-point number
/// of seconds.
///
/// # Errors
/// `HeaderParse` if the value is not a finite, non-negative number.
pub fn parse_retry_after(value: &str) -> Result<Duration, RateLimitError> {
    let parse_err = |reason: &str| RateLimitError::HeaderParse {
        header: HEADER_RETRY_AFTER.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let seconds =
        value.trim().parse::<f64>().map_err(|_| parse_err("not a number of seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(parse_err("must be a finite, non-negative number of seconds"));
    }

    Ok(Duration::from_secs_f64(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_single_pair() {
        let pairs = parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "100:120").unwrap();
        assert_eq!(pairs, vec![RateLimitPair { limit: 100, window_secs: 120 }]);
    }

    #[test]
    fn valid_multiple_pairs_preserve_order() {
        let pairs = parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "100:120,20:1").unwrap();
        assert_eq!(
            pairs,
            vec![
                RateLimitPair { limit: 100, window_secs: 120 },
                RateLimitPair { limit: 20, window_secs: 1 },
            ]
        );
    }

    #[test]
    fn empty_value_parses_to_empty_list() {
        let pairs = parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "").unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn wholly_invalid_value_errors() {
        let err = parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "invalid").unwrap_err();
        assert!(err.is_header_parse());
    }

    #[test]
    fn mixed_valid_and_invalid_skips_the_junk() {
        let pairs =
            parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "100:120,invalid,20:1").unwrap();
        assert_eq!(
            pairs,
            vec![
                RateLimitPair { limit: 100, window_secs: 120 },
                RateLimitPair { limit: 20, window_secs: 1 },
            ]
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let once = parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "100:120,20:1").unwrap();
        let twice = parse_rate_limit_header(HEADER_APP_RATE_LIMIT, "100:120,20:1").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn numeric_overflow_is_an_error() {
        let err = parse_rate_limit_header(
            HEADER_METHOD_RATE_LIMIT,
            "99999999999999999999999:1",
        )
        .unwrap_err();
        assert!(err.is_header_parse());
    }

    #[test]
    fn retry_after_accepts_integers_and_fractions() {
        assert_eq!(parse_retry_after("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_retry_after("7").unwrap(), Duration::from_secs(7));
        assert_eq!(parse_retry_after("1.5").unwrap(), Duration::from_millis(1_500));
    }

    #[test]
    fn retry_after_rejects_garbage() {
        assert!(parse_retry_after("soon").unwrap_err().is_header_parse());
        assert!(parse_retry_after("-3").unwrap_err().is_header_parse());
        assert!(parse_retry_after("inf").unwrap_err().is_header_parse());
        assert!(parse_retry_after("NaN").unwrap_err().is_header_parse());
    }
}
