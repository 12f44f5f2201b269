//! Action executor — turns a validated device and action into broker
//! publishes.

use std::time::Duration;

use wbcmd_domain::action::{Action, Step, UnknownActionError};
use wbcmd_domain::device::Device;
use wbcmd_domain::error::{ExecutionError, WbcmdError};

use crate::ports::{BrokerClient, Delay};

/// Pauses the executor must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait after every successful publish.
    pub settle: Duration,
    /// Wait between the off and on publishes of a restart.
    pub restart_pause: Duration,
    /// Grace period handed to the broker on disconnect.
    pub disconnect_grace: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            restart_pause: Duration::from_secs(7),
            disconnect_grace: Duration::from_millis(250),
        }
    }
}

/// Executes one action per invocation over a single broker connection.
pub struct ActionExecutor<B, D> {
    broker: B,
    delay: D,
    timing: Timing,
}

impl<B: BrokerClient, D: Delay> ActionExecutor<B, D> {
    /// Create an executor with the default [`Timing`].
    pub fn new(broker: B, delay: D) -> Self {
        Self {
            broker,
            delay,
            timing: Timing::default(),
        }
    }

    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Connect to the device's broker, run every step of `action`, then
    /// disconnect.
    ///
    /// The connection is released before any publish error is returned.
    /// Nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::UnknownAction`] if `action` is not a known action;
    ///   no connection is attempted.
    /// - [`ExecutionError::Connection`] if the broker can't be reached.
    /// - [`ExecutionError::Publish`] if any publish fails.
    #[tracing::instrument(skip(self, device), fields(device = %device.name, target = %device.target))]
    pub async fn execute(&mut self, device: &Device, action: &str) -> Result<(), WbcmdError> {
        let action: Action = action
            .parse()
            .map_err(|UnknownActionError(action)| ExecutionError::UnknownAction(action))?;

        self.broker
            .connect(&device.host)
            .await
            .map_err(|source| {
                tracing::error!(endpoint = %device.host, "broker connection failed");
                ExecutionError::Connection {
                    endpoint: device.host.clone(),
                    source: Box::new(source),
                }
            })?;

        let result = self.run(&device.channel, action).await;
        self.broker.disconnect(self.timing.disconnect_grace).await;
        result
    }

    async fn run(&mut self, channel: &str, action: Action) -> Result<(), WbcmdError> {
        for step in action.steps() {
            match *step {
                Step::Publish(payload) => self.publish(channel, payload).await?,
                Step::Pause => {
                    tracing::debug!(pause = ?self.timing.restart_pause, "waiting before power on");
                    self.delay.sleep(self.timing.restart_pause).await;
                }
            }
        }
        Ok(())
    }

    async fn publish(&mut self, channel: &str, payload: &'static str) -> Result<(), WbcmdError> {
        tracing::info!(channel, payload, "publish");
        self.broker
            .publish(channel, payload)
            .await
            .map_err(|source| {
                tracing::error!(channel, payload, "publish failed");
                ExecutionError::Publish {
                    channel: channel.to_string(),
                    payload,
                    source: Box::new(source),
                }
            })?;
        self.delay.sleep(self.timing.settle).await;
        Ok(())
    }
}
