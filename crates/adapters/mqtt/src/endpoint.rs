//! Broker endpoint parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::MqttError;

/// Port used when the endpoint doesn't name one.
pub const DEFAULT_PORT: u16 = 1883;

const SCHEMES: [&str; 2] = ["tcp://", "mqtt://"];

/// Host and port of an MQTT broker.
///
/// Accepts `host`, `host:port`, and either form prefixed with `tcp://` or
/// `mqtt://`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl FromStr for BrokerEndpoint {
    type Err = MqttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| MqttError::InvalidEndpoint {
            endpoint: s.to_string(),
            reason,
        };

        let rest = SCHEMES
            .iter()
            .find_map(|scheme| s.strip_prefix(scheme))
            .unwrap_or(s)
            .trim_end_matches('/');

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| invalid("port must be a number between 1 and 65535"))?,
            ),
            None => (rest, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(invalid("host is empty"));
        }
        if host.contains('/') {
            return Err(invalid("unsupported scheme"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
