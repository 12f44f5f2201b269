//! MQTT adapter error types.

use std::time::Duration;

use wbcmd_domain::error::WbcmdError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// A publish or disconnect was attempted before `connect`.
    #[error("MQTT client not connected")]
    NotConnected,

    /// rumqttc refuses empty client ids and ids starting with a space.
    #[error("invalid MQTT client id '{0}'")]
    InvalidClientId(String),

    /// The device's broker address can't be used as an endpoint.
    #[error("invalid broker address '{endpoint}': {reason}")]
    InvalidEndpoint {
        endpoint: String,
        reason: &'static str,
    },

    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),

    /// The connection failed or dropped.
    #[error("MQTT connection error")]
    Connection(#[from] rumqttc::ConnectionError),

    /// The broker didn't answer in time.
    #[error("no {operation} from broker after {after:?}")]
    Timeout {
        /// What we were waiting for (`CONNACK`, `PUBACK`).
        operation: &'static str,
        after: Duration,
    },
}

impl MqttError {
    /// Convert into a [`WbcmdError::Broker`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> WbcmdError {
        WbcmdError::Broker(Box::new(self))
    }
}

impl From<MqttError> for WbcmdError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
