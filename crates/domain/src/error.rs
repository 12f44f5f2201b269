//! Common error types used across the workspace.
//!
//! Command and execution failures convert into [`WbcmdError`] via
//! `#[from]`. [`ValidationError`] stays separate because it only arises
//! while the stand configuration loads, before any command runs. Adapters box their foreign errors into
//! [`WbcmdError::Broker`].

/// Top-level error for the whole tool.
#[derive(Debug, thiserror::Error)]
pub enum WbcmdError {
    /// The user's command could not be resolved or is not allowed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A valid command failed while talking to the broker.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// An adapter-level broker failure (connection refused, timeout, …).
    #[error("broker error")]
    Broker(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WbcmdError {
    /// Process exit status for this error.
    ///
    /// `1` when the command is unusable,
    /// `2` when a valid command failed against the broker.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Command(_) => 1,
            Self::Execution(_) | Self::Broker(_) => 2,
        }
    }
}

/// Domain invariant violations detected when the device table is built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A device record has an empty (or missing) field.
    #[error("incorrect device #{index}: field '{field}' is empty")]
    EmptyField {
        /// Position of the record in the table.
        index: usize,
        /// Configuration key of the empty field.
        field: &'static str,
    },
}

/// Resolution and validation failures for a user command.
///
/// All of these are detected before any network IO happens.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    /// No record in the table has this device name.
    #[error("Device '{device}' is not defined")]
    DeviceNotFound { device: String },

    /// The device exists but not for the requested target.
    #[error("no applicable device: '{device}' has no target '{target}'")]
    NoApplicableDevice { device: String, target: String },

    /// The action is not legal for the target.
    #[error("Action '{action}' is not supported for target '{target}'")]
    UnsupportedAction { action: String, target: String },

    /// Wrong argument count or malformed invocation.
    #[error("expects 3 arguments, got {given}")]
    Usage { given: usize },
}

/// Failures while executing a validated command.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The broker connection could not be established.
    #[error("can't connect to broker '{endpoint}'")]
    Connection {
        endpoint: String,
        #[source]
        source: Box<WbcmdError>,
    },

    /// A publish failed or was not acknowledged.
    #[error("can't publish '{payload}' to channel '{channel}'")]
    Publish {
        channel: String,
        payload: &'static str,
        #[source]
        source: Box<WbcmdError>,
    },

    /// An action reached the executor that validation should have rejected.
    #[error("Action '{0}' is unknown")]
    UnknownAction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_command_errors_to_exit_code_one() {
        let err: WbcmdError = CommandError::DeviceNotFound {
            device: "d3".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn should_map_execution_errors_to_exit_code_two() {
        let err: WbcmdError = ExecutionError::UnknownAction("skip".to_string()).into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn should_name_offending_device_in_message() {
        let err = CommandError::DeviceNotFound {
            device: "d3".to_string(),
        };
        assert_eq!(err.to_string(), "Device 'd3' is not defined");
    }

    #[test]
    fn should_name_action_and_target_in_unsupported_message() {
        let err = CommandError::UnsupportedAction {
            action: "restart".to_string(),
            target: "boot_mode".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Action 'restart' is not supported for target 'boot_mode'"
        );
    }

    #[test]
    fn should_keep_broker_failure_as_source_of_publish_error() {
        let inner = WbcmdError::Broker("timed out".into());
        let err = ExecutionError::Publish {
            channel: "/c/K1".to_string(),
            payload: "1",
            source: Box::new(inner),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "broker error");
    }
}
