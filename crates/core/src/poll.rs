//! Bounded polling with backoff.
//!
//! Every wait on page state goes through a [`Poller`]: check, then
//! [`Poller::wait`] until it reports the deadline has passed. Time comes from
//! `tokio::time`, so tests drive it with the paused clock.

use std::time::Duration;

use tokio::time::Instant;

/// Stand-in for "never" when a deadline would overflow the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + wait`, saturating to a far-future instant instead of panicking.
pub fn deadline_after(start: Instant, wait: Duration) -> Instant {
	start.checked_add(wait).unwrap_or_else(|| start + FAR_FUTURE)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
	/// Total time allowed for the condition to hold.
	pub timeout: Duration,
	/// Delay before the second check.
	pub interval: Duration,
	/// Upper bound for the delay after backoff.
	pub max_interval: Duration,
	/// Factor applied to the delay after each check.
	pub backoff: f64,
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs(10),
			interval: Duration::from_millis(500),
			max_interval: Duration::from_secs(2),
			backoff: 1.5,
		}
	}
}

impl PollPolicy {
	/// Same policy with a different timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Starts the clock.
	pub fn start(&self) -> Poller {
		let started = Instant::now();
		Poller {
			started,
			deadline: deadline_after(started, self.timeout),
			next: self.interval,
			policy: *self,
		}
	}
}

#[derive(Debug)]
pub struct Poller {
	started: Instant,
	deadline: Instant,
	next: Duration,
	policy: PollPolicy,
}

impl Poller {
	/// Sleeps until the next check.
	///
	/// Returns false once the deadline has passed; the last sleep is clipped
	/// so one final check happens at the deadline.
	pub async fn wait(&mut self) -> bool {
		let now = Instant::now();
		if now >= self.deadline {
			return false;
		}
		let delay = self.next.min(self.deadline - now);
		tokio::time::sleep(delay).await;
		self.next = self.next.mul_f64(self.policy.backoff.max(1.0)).min(self.policy.max_interval);
		true
	}

	pub fn elapsed(&self) -> Duration {
		self.started.elapsed()
	}

	pub fn elapsed_ms(&self) -> u64 {
		self.elapsed().as_millis() as u64
	}
}
