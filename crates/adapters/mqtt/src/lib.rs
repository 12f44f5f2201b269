//! # wbcmd-adapter-mqtt
//!
//! MQTT adapter — implements the `BrokerClient` port on top of `rumqttc`.
//!
//! ## How it works
//!
//! Each invocation opens one connection to the broker named in the device
//! record, publishes with QoS 1 and waits for every `PUBACK`, then sends
//! `DISCONNECT`. The `rumqttc` event loop is driven inline by whichever
//! operation is waiting, so no background task is spawned.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `wbcmd-app` and `wbcmd-domain`.

mod config;
mod endpoint;
mod error;

pub use config::MqttConfig;
pub use endpoint::{BrokerEndpoint, DEFAULT_PORT};
pub use error::MqttError;

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};

use wbcmd_app::ports::BrokerClient;
use wbcmd_domain::error::WbcmdError;

/// Capacity of the request channel between client and event loop.
const REQUEST_CAPACITY: usize = 10;

/// Broker client for a single connection at a time.
pub struct MqttBroker {
    config: MqttConfig,
    session: Option<Session>,
}

struct Session {
    client: AsyncClient,
    eventloop: EventLoop,
}

impl MqttBroker {
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Whether a connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    async fn open(&mut self, endpoint: &str) -> Result<(), MqttError> {
        let endpoint: BrokerEndpoint = endpoint.parse()?;
        let client_id = &self.config.client_id;
        if client_id.is_empty() || client_id.starts_with(' ') {
            return Err(MqttError::InvalidClientId(client_id.clone()));
        }

        let mut options = MqttOptions::new(client_id, &endpoint.host, endpoint.port);
        options.set_keep_alive(secs(self.config.keep_alive_secs));
        options.set_clean_session(true);
        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        let limit = secs(self.config.connect_timeout_secs);
        tokio::time::timeout(limit, wait_for_connack(&mut eventloop))
            .await
            .map_err(|_| MqttError::Timeout {
                operation: "CONNACK",
                after: limit,
            })??;

        tracing::info!(%endpoint, "connected");
        self.session = Some(Session { client, eventloop });
        Ok(())
    }

    async fn send(&mut self, topic: &str, payload: &str) -> Result<(), MqttError> {
        let session = self.session.as_mut().ok_or(MqttError::NotConnected)?;

        session
            .client
            .publish(topic, QoS::AtLeastOnce, false, payload.as_bytes().to_vec())
            .await?;

        let limit = secs(self.config.publish_timeout_secs);
        tokio::time::timeout(limit, wait_for_puback(&mut session.eventloop))
            .await
            .map_err(|_| MqttError::Timeout {
                operation: "PUBACK",
                after: limit,
            })??;

        tracing::debug!(topic, payload, "acknowledged");
        Ok(())
    }

    async fn close(&mut self, grace: Duration) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        if let Err(err) = session.client.disconnect().await {
            tracing::debug!(error = %err, "disconnect request dropped");
            return;
        }

        let flushed = tokio::time::timeout(grace, async {
            loop {
                match session.eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        })
        .await;

        if flushed.is_err() {
            tracing::debug!(?grace, "disconnect not flushed within grace period");
        }
        tracing::info!("disconnected");
    }
}

impl BrokerClient for MqttBroker {
    async fn connect(&mut self, endpoint: &str) -> Result<(), WbcmdError> {
        self.open(endpoint).await.map_err(MqttError::into_domain)
    }

    async fn publish(&mut self, topic: &str, payload: &str) -> Result<(), WbcmdError> {
        self.send(topic, payload)
            .await
            .map_err(MqttError::into_domain)
    }

    async fn disconnect(&mut self, grace: Duration) {
        self.close(grace).await;
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), MqttError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(()),
            Ok(_) => {}
            Err(err) => return Err(err.into()),
        }
    }
}

async fn wait_for_puback(eventloop: &mut EventLoop) -> Result<(), MqttError> {
    let mut pkid = None;
    loop {
        match eventloop.poll().await {
            Ok(Event::Outgoing(Outgoing::Publish(id))) => pkid = Some(id),
            Ok(Event::Incoming(Packet::PubAck(ack))) if Some(ack.pkid) == pkid => return Ok(()),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "connection lost");
                return Err(err.into());
            }
        }
    }
}

fn secs(value: u16) -> Duration {
    Duration::from_secs(u64::from(value))
}
