//! Command-line parsing: `wbcmd <target> <action> <device>` or a help token.

use wbcmd_domain::command::Command;
use wbcmd_domain::error::CommandError;
use wbcmd_domain::help::is_help_request;

/// What the user asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Print the help page and exit successfully.
    Help,
    /// Resolve and execute a command.
    Run(Command),
}

impl Invocation {
    /// Parse the arguments that follow the program name.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Usage`] unless exactly three arguments (or a
    /// single help token) are given.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CommandError> {
        match args {
            [arg] if is_help_request(arg.as_ref()) => Ok(Self::Help),
            [target, action, device] => Ok(Self::Run(Command::new(
                target.as_ref(),
                action.as_ref(),
                device.as_ref(),
            ))),
            _ => Err(CommandError::Usage { given: args.len() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_help_tokens() {
        for token in ["-h", "--help", "?", "--Help", "-H"] {
            assert_eq!(Invocation::parse(&[token]), Ok(Invocation::Help));
        }
    }

    #[test]
    fn should_parse_three_arguments_into_lowercased_command() {
        let invocation = Invocation::parse(&["POWER", "Restart", "Device1"]).unwrap();
        assert_eq!(
            invocation,
            Invocation::Run(Command::new("power", "restart", "device1"))
        );
    }

    #[test]
    fn should_reject_wrong_argument_count() {
        let none: [&str; 0] = [];
        assert_eq!(
            Invocation::parse(&none),
            Err(CommandError::Usage { given: 0 })
        );
        assert_eq!(
            Invocation::parse(&["power", "up"]),
            Err(CommandError::Usage { given: 2 })
        );
        assert_eq!(
            Invocation::parse(&["power", "up", "d1", "extra"]),
            Err(CommandError::Usage { given: 4 })
        );
    }

    #[test]
    fn should_reject_single_non_help_argument() {
        assert_eq!(
            Invocation::parse(&["power"]),
            Err(CommandError::Usage { given: 1 })
        );
    }

    #[test]
    fn should_treat_help_token_among_three_arguments_as_command() {
        let invocation = Invocation::parse(&["?", "up", "d1"]).unwrap();
        assert!(matches!(invocation, Invocation::Run(_)));
    }
}
