use std::sync::Arc;

use chrono::Utc;

/// Source of "now" in unix seconds, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        now_unix()
    }
}

#[cfg(test)]
struct FixedClock(i64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[cfg(test)]
pub fn fixed_clock(now: i64) -> Arc<dyn Clock> {
    Arc::new(FixedClock(now))
}

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

pub fn format_relative(then: i64, now: i64) -> String {
    let diff = now.saturating_sub(then).max(0);
    match diff {
        0..60 => "just now".to_string(),
        60..3_600 => format!("{}m ago", diff / 60),
        3_600..86_400 => format!("{}h ago", diff / 3_600),
        86_400..2_592_000 => format!("{}d ago", diff / 86_400),
        2_592_000..31_536_000 => format!("{}mo ago", diff / 2_592_000),
        _ => format!("{}y ago", diff / 31_536_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_buckets() {
        let now = 1_700_092_800;
        assert_eq!(format_relative(now - 5, now), "just now");
        assert_eq!(format_relative(now - 125, now), "2m ago");
        assert_eq!(format_relative(now - 7_200, now), "2h ago");
        assert_eq!(format_relative(now - 86_400, now), "1d ago");
        assert_eq!(format_relative(now - 5_184_000, now), "2mo ago");
        assert_eq!(format_relative(now - 63_072_000, now), "2y ago");
    }

    #[test]
    fn future_times_read_as_now() {
        assert_eq!(format_relative(200, 100), "just now");
    }

    #[test]
    fn fixed_clock_is_fixed() {
        assert_eq!(fixed_clock(42).now(), 42);
    }
}
