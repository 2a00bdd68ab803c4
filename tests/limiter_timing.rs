//! Wall-clock spacing checks for the rate limiter.

use std::time::{Duration, Instant};

use verdant::gateway::RateLimiter;

#[test]
fn thirty_per_minute_spaces_calls_by_two_seconds() {
    let limiter = RateLimiter::per_minute(30);

    limiter.acquire();
    let start = Instant::now();
    limiter.acquire();

    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[test]
fn limiters_are_independent_per_operation() {
    let first = RateLimiter::per_minute(30);
    let second = RateLimiter::per_minute(30);

    first.acquire();
    let start = Instant::now();
    // A different operation's limiter has no shared state to wait on.
    second.acquire();

    assert!(start.elapsed() < Duration::from_millis(500));
}

#[test]
fn elapsed_time_counts_toward_the_interval() {
    let limiter = RateLimiter::per_minute(120);

    limiter.acquire();
    std::thread::sleep(Duration::from_millis(600));
    let start = Instant::now();
    limiter.acquire();

    // Interval is 500ms and more than that already passed.
    assert!(start.elapsed() < Duration::from_millis(100));
}
