//! MQTT client configuration.

use serde::Deserialize;

/// Configuration for the MQTT broker client.
///
/// The broker address itself comes from each device record, not from here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT client identifier.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// How long to wait for the broker to accept the connection, in seconds.
    pub connect_timeout_secs: u16,
    /// How long to wait for a publish acknowledgment, in seconds.
    pub publish_timeout_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            client_id: "wbcmd".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 10,
            publish_timeout_secs: 10,
        }
    }
}
