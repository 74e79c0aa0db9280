use std::time::Duration;

/// Inter-chunk pacing strategy for the paginated aggregators.
///
/// Strategies return the duration to wait between date-range chunks; the
/// aggregator performs the actual sleep. Keeping the trait synchronous means
/// a strategy never does I/O of its own and stays trivial to test.
pub trait Pacer: Send + Sync {
    fn pause(&self) -> Duration;
}

/// Fixed delay between chunks. The production default is two seconds, a
/// crude but predictable way to stay under the remote rate limit.
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn default_rate() -> Self {
        FixedDelay(Duration::from_secs(2))
    }
}

impl Pacer for FixedDelay {
    fn pause(&self) -> Duration {
        self.0
    }
}

/// No pacing. Used by tests and dry runs against mock servers.
pub struct Unthrottled;

impl Pacer for Unthrottled {
    fn pause(&self) -> Duration {
        Duration::ZERO
    }
}
