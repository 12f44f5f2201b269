//! Help page rendered from the device table.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::action::{Action, ActionPolicy, POWER_TARGET};
use crate::device::DeviceTable;

/// Arguments that request the help page instead of a command.
pub const HELP_TOKENS: [&str; 3] = ["-h", "--help", "?"];

/// Whether a single CLI argument asks for help (case-insensitive).
#[must_use]
pub fn is_help_request(arg: &str) -> bool {
    let arg = arg.to_lowercase();
    HELP_TOKENS.contains(&arg.as_str())
}

/// Render the usage page listing every target, action and device the
/// table knows about.
///
/// Every list is sorted, so the output does not depend on table order.
#[must_use]
pub fn format_help(table: &DeviceTable) -> String {
    let targets: BTreeSet<&str> = table.devices().iter().map(|d| d.target.as_str()).collect();
    let devices: BTreeSet<&str> = table.devices().iter().map(|d| d.name.as_str()).collect();

    let policy = if targets.contains(POWER_TARGET) {
        ActionPolicy::Power
    } else {
        ActionPolicy::Default
    };
    let actions: BTreeSet<&str> = policy.allowed().iter().map(|a| a.as_str()).collect();

    let mut page = String::from("\nUsage:\n\twbcmd <target> <action> <device>\n\nOptions:\n");
    let _ = writeln!(
        page,
        "\t<target>\t\t\tWhat you want switch. Allowed values: {}",
        quoted(&targets)
    );
    let _ = write!(
        page,
        "\t<action>\t\t\tWhat action you want to do. Allowed values: {}",
        quoted(&actions)
    );
    if actions.contains(Action::Restart.as_str()) {
        let _ = write!(
            page,
            " ('{}' may be applicable for '{POWER_TARGET}' only)",
            Action::Restart
        );
    }
    page.push('\n');
    let _ = writeln!(
        page,
        "\t<device>\t\t\tDevice name. Allowed values: {}",
        quoted(&devices)
    );
    page
}

fn quoted(values: &BTreeSet<&str>) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
