//! Wall-clock measurement of single runs.
//!
//! Elapsed times are reported in seconds rounded to [`ELAPSED_DIGITS`]
//! decimal places, measured with a monotonic clock.

use std::time::{Duration, Instant};

/// Decimal places kept in reported elapsed times.
pub const ELAPSED_DIGITS: i32 = 7;

/// Rounds a duration to seconds with [`ELAPSED_DIGITS`] decimals.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use sampler_core::timer::round_seconds;
///
/// assert_eq!(round_seconds(Duration::from_nanos(1_234_567_890)), 1.2345679);
/// ```
pub fn round_seconds(elapsed: Duration) -> f64 {
    let scale = 10f64.powi(ELAPSED_DIGITS);
    (elapsed.as_secs_f64() * scale).round() / scale
}

/// Runs `f` once and returns its output with the elapsed seconds.
pub fn measure<T, F>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let output = f();
    (output, round_seconds(start.elapsed()))
}

/// Runs a fallible `f` once, timing it only when it succeeds.
///
/// Errors are propagated unchanged and no time is reported for them.
pub fn try_measure<T, E, F>(f: F) -> Result<(T, f64), E>
where
    F: FnOnce() -> Result<T, E>,
{
    let start = Instant::now();
    let output = f()?;
    Ok((output, round_seconds(start.elapsed())))
}
