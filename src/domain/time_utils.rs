//! Index ordering checks and elapsed-time formatting.

use chrono::NaiveDateTime;
use std::time::Duration;

/// True when timestamps never go backwards.
pub fn is_datetime_ordered(index: &[NaiveDateTime]) -> bool {
    index.windows(2).all(|w| w[0] <= w[1])
}

/// "12.345 ms (0.012 s)"
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    format!("{:.3} ms ({:.3} s)", secs * 1000.0, secs)
}
