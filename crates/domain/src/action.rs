//! Action — what to do with a relay, the per-target policy that decides
//! which actions are legal, and the publish steps each action expands to.

use std::fmt;
use std::str::FromStr;

/// Payload that closes the relay.
pub const PAYLOAD_ON: &str = "1";
/// Payload that opens the relay.
pub const PAYLOAD_OFF: &str = "0";

/// The only target that also accepts [`Action::Restart`].
pub const POWER_TARGET: &str = "power";

/// A relay action requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    /// Power-cycle: off, pause, on.
    Restart,
}

impl Action {
    /// Lower-case command-line spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Restart => "restart",
        }
    }

    /// The publish sequence this action expands to.
    #[must_use]
    pub fn steps(self) -> &'static [Step] {
        match self {
            Self::Up => &[Step::Publish(PAYLOAD_ON)],
            Self::Down => &[Step::Publish(PAYLOAD_OFF)],
            Self::Restart => &[
                Step::Publish(PAYLOAD_OFF),
                Step::Pause,
                Step::Publish(PAYLOAD_ON),
            ],
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownActionError(pub String);

impl FromStr for Action {
    type Err = UnknownActionError;

    /// Parses an already lower-cased action.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "restart" => Ok(Self::Restart),
            other => Err(UnknownActionError(other.to_string())),
        }
    }
}

/// One step of an action's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Publish this payload to the device channel.
    Publish(&'static str),
    /// Wait the restart pause before the next step.
    Pause,
}

/// Which actions a target accepts.
///
/// Closed two-tier policy: every target gets `up`/`down`, the literal
/// `power` target also gets `restart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPolicy {
    Default,
    Power,
}

impl ActionPolicy {
    /// Pick the policy for an already lower-cased target.
    #[must_use]
    pub fn for_target(target: &str) -> Self {
        if target == POWER_TARGET {
            Self::Power
        } else {
            Self::Default
        }
    }

    /// Legal actions under this policy.
    #[must_use]
    pub fn allowed(self) -> &'static [Action] {
        match self {
            Self::Default => &[Action::Up, Action::Down],
            Self::Power => &[Action::Up, Action::Down, Action::Restart],
        }
    }

    /// Look up `action` (lower-cased) among the legal actions.
    #[must_use]
    pub fn allows(self, action: &str) -> Option<Action> {
        self.allowed()
            .iter()
            .copied()
            .find(|allowed| allowed.as_str() == action)
    }
}
