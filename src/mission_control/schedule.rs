use std::time::Duration;
use tokio::time::Instant;

/// Fixed-rate deadlines on the monotonic clock.
///
/// Each deadline is the previous one plus the interval, so time spent in a
/// tick never accumulates as drift.
#[derive(Debug, Clone, Copy)]
pub struct TickSchedule {
    next: Instant,
    interval: Duration,
}

impl TickSchedule {
    pub fn starting_at(start: Instant, interval: Duration) -> Self {
        Self { next: start + interval, interval }
    }

    pub fn starting_now(interval: Duration) -> Self { Self::starting_at(Instant::now(), interval) }

    /// The upcoming deadline.
    pub fn next_deadline(&self) -> Instant { self.next }

    /// Returns the current deadline and moves on to the following one.
    pub fn advance(&mut self) -> Instant {
        let deadline = self.next;
        self.next += self.interval;
        deadline
    }

    /// Sleeps until the current deadline, then advances.
    pub async fn wait(&mut self) {
        let deadline = self.advance();
        tokio::time::sleep_until(deadline).await;
    }
}
