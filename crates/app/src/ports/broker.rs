//! Broker port — the three operations the executor needs from a message
//! broker.

use std::future::Future;
use std::time::Duration;

use wbcmd_domain::error::WbcmdError;

/// A publish-only client for one broker connection.
///
/// The executor calls [`connect`](Self::connect) once, then any number of
/// [`publish`](Self::publish) calls, then [`disconnect`](Self::disconnect),
/// strictly in that order and never concurrently.
pub trait BrokerClient: Send {
    /// Open a connection to `endpoint` and wait until the broker accepts it.
    fn connect(&mut self, endpoint: &str) -> impl Future<Output = Result<(), WbcmdError>> + Send;

    /// Publish `payload` to `topic` and wait for the broker acknowledgment
    /// (or the client's own timeout).
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), WbcmdError>> + Send;

    /// Close the connection, giving in-flight traffic up to `grace` to drain.
    ///
    /// Never fails: a broken connection is simply dropped.
    fn disconnect(&mut self, grace: Duration) -> impl Future<Output = ()> + Send;
}
