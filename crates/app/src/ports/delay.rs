//! Delay port — blocking pauses, injected so the timing contract can be
//! checked without waiting on a real clock.

use std::future::Future;
use std::time::Duration;

pub trait Delay: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}
