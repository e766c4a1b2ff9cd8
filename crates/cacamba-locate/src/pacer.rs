//! Minimum spacing between requests to one external service.

use std::time::Duration;

use tokio::{sync::Mutex, time::Instant};

/// Serialises callers and guarantees at least `interval` between the
/// moments they are let through.
#[derive(Debug)]
pub struct Pacer {
  interval: Duration,
  last:     Mutex<Option<Instant>>,
}

impl Pacer {
  pub fn new(interval: Duration) -> Self {
    Self { interval, last: Mutex::new(None) }
  }

  pub fn interval(&self) -> Duration { self.interval }

  /// Wait until `interval` has passed since the previous caller went
  /// through. The first call never waits.
  pub async fn wait(&self) {
    let mut last = self.last.lock().await;
    if let Some(previous) = *last {
      let elapsed = previous.elapsed();
      if elapsed < self.interval {
        tokio::time::sleep(self.interval - elapsed).await;
      }
    }
    *last = Some(Instant::now());
  }
}
