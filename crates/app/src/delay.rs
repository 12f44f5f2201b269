//! Wall-clock [`Delay`] backed by `tokio::time::sleep`.

use std::future::Future;
use std::time::Duration;

use crate::ports::Delay;

/// Production delay: really waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn should_wait_requested_duration() {
        let start = tokio::time::Instant::now();
        TokioDelay.sleep(Duration::from_secs(7)).await;
        assert!(start.elapsed() >= Duration::from_secs(7));
    }
}
