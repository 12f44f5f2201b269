//! Command — the `<target> <action> <device>` triple and its resolution
//! against the device table.

use crate::action::{Action, ActionPolicy};
use crate::device::{Device, DeviceTable};
use crate::error::CommandError;

/// A case-folded command for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub target: String,
    pub action: String,
    pub device: String,
}

impl Command {
    /// Build a command from raw user input, lower-casing every field.
    pub fn new(target: &str, action: &str, device: &str) -> Self {
        Self {
            target: target.to_lowercase(),
            action: action.to_lowercase(),
            device: device.to_lowercase(),
        }
    }

    /// Resolve the device and check the action in one go.
    ///
    /// Checks run in a fixed order: device name, then target, then action,
    /// so an unknown device is always reported before an illegal action.
    ///
    /// # Errors
    ///
    /// [`CommandError::DeviceNotFound`], [`CommandError::NoApplicableDevice`]
    /// or [`CommandError::UnsupportedAction`].
    pub fn check<'t>(&self, table: &'t DeviceTable) -> Result<(&'t Device, Action), CommandError> {
        let device = resolve(table, &self.target, &self.device)?;
        let action = validate(&self.target, &self.action)?;
        Ok((device, action))
    }
}

/// Find the device for `(target, device)`.
///
/// Inputs are compared case-insensitively. When the pair is configured more
/// than once the first record in table order wins.
///
/// # Errors
///
/// [`CommandError::DeviceNotFound`] when no record has that name,
/// [`CommandError::NoApplicableDevice`] when none of them has that target.
pub fn resolve<'t>(
    table: &'t DeviceTable,
    target: &str,
    device: &str,
) -> Result<&'t Device, CommandError> {
    let target = target.to_lowercase();
    let name = device.to_lowercase();

    if table.by_name(&name).next().is_none() {
        return Err(CommandError::DeviceNotFound { device: name });
    }

    let found = table.by_name(&name).find(|d| d.target == target);
    found.ok_or(CommandError::NoApplicableDevice {
        device: name,
        target,
    })
}

/// Check that `action` is legal for `target`.
///
/// # Errors
///
/// [`CommandError::UnsupportedAction`] naming both values.
pub fn validate(target: &str, action: &str) -> Result<Action, CommandError> {
    let target = target.to_lowercase();
    let action = action.to_lowercase();
    ActionPolicy::for_target(&target)
        .allows(&action)
        .ok_or(CommandError::UnsupportedAction { action, target })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stand() -> DeviceTable {
        DeviceTable::new(vec![
            Device::new("host", "d1", "power", "K1"),
            Device::new("host", "d2", "boot_mode", "K2"),
        ])
        .unwrap()
    }

    #[test]
    fn should_lowercase_raw_input() {
        let command = Command::new("POWER", "Up", "Device1");
        assert_eq!(command.target, "power");
        assert_eq!(command.action, "up");
        assert_eq!(command.device, "device1");
    }

    #[test]
    fn should_resolve_mixed_case_input_against_upper_case_config() {
        let table = DeviceTable::new(vec![Device::new("h", "DEVICE1", "POWER", "/c/K1")]).unwrap();

        let device = resolve(&table, "Power", "deVice1").unwrap();
        assert_eq!(device, &Device::new("h", "device1", "power", "/c/K1"));
    }

    #[test]
    fn should_accept_every_legal_command() {
        let table = stand();
        for (target, action, device) in [
            ("power", "up", "d1"),
            ("power", "down", "d1"),
            ("power", "restart", "d1"),
            ("boot_mode", "up", "d2"),
            ("boot_mode", "down", "d2"),
        ] {
            let command = Command::new(target, action, device);
            assert!(command.check(&table).is_ok(), "{command:?} should be valid");
        }
    }

    #[test]
    fn should_return_device_not_found_for_unknown_name() {
        let table = stand();
        let err = Command::new("boot_mode", "down", "d3")
            .check(&table)
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::DeviceNotFound {
                device: "d3".to_string()
            }
        );
    }

    #[test]
    fn should_return_no_applicable_device_for_wrong_target() {
        let table = stand();
        let err = Command::new("boot_mode", "down", "d1")
            .check(&table)
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::NoApplicableDevice {
                device: "d1".to_string(),
                target: "boot_mode".to_string()
            }
        );
    }

    #[test]
    fn should_reject_unknown_action() {
        let table = stand();
        let err = Command::new("power", "skip", "d1")
            .check(&table)
            .unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedAction { action, .. } if action == "skip"));
    }

    #[test]
    fn should_reject_restart_outside_power() {
        let table = stand();
        let err = Command::new("boot_mode", "restart", "d2")
            .check(&table)
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::UnsupportedAction {
                action: "restart".to_string(),
                target: "boot_mode".to_string()
            }
        );
    }

    #[test]
    fn should_report_missing_device_before_illegal_action() {
        let table = stand();
        let err = Command::new("boot_mode", "explode", "nope")
            .check(&table)
            .unwrap_err();
        assert!(matches!(err, CommandError::DeviceNotFound { .. }));
    }

    #[test]
    fn should_report_wrong_target_before_illegal_action() {
        let table = stand();
        let err = Command::new("boot_mode", "restart", "d1")
            .check(&table)
            .unwrap_err();
        assert!(matches!(err, CommandError::NoApplicableDevice { .. }));
    }

    #[test]
    fn should_pick_first_record_when_pair_is_duplicated() {
        let table = DeviceTable::new(vec![
            Device::new("h", "d1", "power", "first"),
            Device::new("h", "d1", "boot_mode", "other"),
            Device::new("h", "D1", "Power", "second"),
        ])
        .unwrap();

        let device = resolve(&table, "power", "d1").unwrap();
        assert_eq!(device.channel, "first");
    }

    #[test]
    fn should_select_device_by_name_and_target() {
        let table = DeviceTable::new(vec![
            Device::new("host", "d1", "power", "K1"),
            Device::new("host", "d1", "boot_mode", "K2"),
            Device::new("host", "d2", "boot_mode", "K3"),
        ])
        .unwrap();

        let device = resolve(&table, "boot_mode", "d1").unwrap();
        assert_eq!(device.channel, "K2");
    }

    #[test]
    fn should_validate_power_case_insensitively() {
        for target in ["power", "POWER", "Power", "pOwEr"] {
            assert_eq!(validate(target, "restart"), Ok(Action::Restart));
        }
    }

    #[test]
    fn should_return_device_not_found_for_empty_table() {
        let table = DeviceTable::default();
        assert!(matches!(
            resolve(&table, "power", "d1"),
            Err(CommandError::DeviceNotFound { .. })
        ));
    }
}
