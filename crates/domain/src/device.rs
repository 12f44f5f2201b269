//! Device — one relay output reachable through a broker topic, and the
//! read-only table of all devices on a stand.

use std::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};

use crate::error::ValidationError;

/// A controllable relay output.
///
/// On the wire a device is an object keyed by `WB_MQTT_HOST`, `NAME`,
/// `TARGET` and `CHANNEL`, matched case-insensitively. A missing or `null`
/// key leaves the field empty, which [`Device::validate`] rejects. Unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    /// Broker endpoint, e.g. `tcp://wiren-board.test-stand:1883`.
    pub host: String,
    /// Case-insensitive device name, not unique across the table.
    pub name: String,
    /// Case-insensitive target category (`power`, `boot_mode`, …).
    pub target: String,
    /// Topic the relay listens on.
    pub channel: String,
}

impl Device {
    /// Create a device from its four fields.
    pub fn new(
        host: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            target: target.into(),
            channel: channel.into(),
        }
    }

    /// Check domain invariants.
    ///
    /// `index` is the record position, used only for the error message.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first empty field.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        let fields = [
            ("WB_MQTT_HOST", &self.host),
            ("NAME", &self.name),
            ("TARGET", &self.target),
            ("CHANNEL", &self.channel),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(ValidationError::EmptyField { index, field });
            }
        }
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.name = self.name.to_lowercase();
        self.target = self.target.to_lowercase();
        self
    }
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DeviceVisitor)
    }
}

struct DeviceVisitor;

impl<'de> Visitor<'de> for DeviceVisitor {
    type Value = Device;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a device record")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Device, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut device = Device::default();
        while let Some(key) = map.next_key::<String>()? {
            let field = match key.to_ascii_uppercase().as_str() {
                "WB_MQTT_HOST" => &mut device.host,
                "NAME" => &mut device.name,
                "TARGET" => &mut device.target,
                "CHANNEL" => &mut device.channel,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if let Some(value) = map.next_value::<Option<String>>()? {
                *field = value;
            }
        }
        Ok(device)
    }
}

/// Ordered, read-only collection of every device on the stand.
///
/// Names and targets are lower-cased on construction; table order is kept
/// because it decides which record wins when a `(name, target)` pair is
/// configured twice.
#[derive(Debug, Clone, Default)]
pub struct DeviceTable {
    devices: Vec<Device>,
}

impl DeviceTable {
    /// Validate and normalize `devices` into a table.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if any record has an empty
    /// field; no partial table is returned.
    pub fn new(devices: Vec<Device>) -> Result<Self, ValidationError> {
        for (index, device) in devices.iter().enumerate() {
            device.validate(index)?;
        }
        Ok(Self {
            devices: devices.into_iter().map(Device::normalized).collect(),
        })
    }

    /// All devices, in table order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Devices named `name` (already lower-cased), in table order.
    pub fn by_name(&self, name: &str) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(move |d| d.name == name)
    }

    /// Every `(name, target)` pair that appears more than once, in order of
    /// first appearance.
    ///
    /// Resolution silently picks the first record for such pairs, so callers
    /// should surface these at load time.
    #[must_use]
    pub fn duplicates(&self) -> Vec<(&str, &str)> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        let mut duplicated: Vec<(&str, &str)> = Vec::new();
        for device in &self.devices {
            let key = (device.name.as_str(), device.target.as_str());
            if seen.contains(&key) {
                if !duplicated.contains(&key) {
                    duplicated.push(key);
                }
            } else {
                seen.push(key);
            }
        }
        duplicated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_one_device_from_stand_json() {
        let json = r#"[
            {
                "WB_MQTT_HOST": "wiren-board.test-stand",
                "NAME": "DEVICE1",
                "TARGET": "POWER",
                "CHANNEL": "/devices/wb-mr3_17/controls/K1/on"
            }
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        let table = DeviceTable::new(devices).unwrap();

        assert_eq!(table.len(), 1);
        let device = &table.devices()[0];
        assert_eq!(device.host, "wiren-board.test-stand");
        assert_eq!(device.name, "device1");
        assert_eq!(device.target, "power");
        assert_eq!(device.channel, "/devices/wb-mr3_17/controls/K1/on");
    }

    #[test]
    fn should_keep_table_order_for_two_devices() {
        let json = r#"[
            {"WB_MQTT_HOST": "h", "NAME": "DEVICE1", "TARGET": "POWER", "CHANNEL": "K1"},
            {"WB_MQTT_HOST": "h", "NAME": "DEVICE2", "TARGET": "BOOT", "CHANNEL": "K2"}
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        let table = DeviceTable::new(devices).unwrap();

        let names: Vec<&str> = table.devices().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["device1", "device2"]);
        assert_eq!(table.devices()[1].target, "boot");
    }

    #[test]
    fn should_reject_record_without_channel() {
        let json = r#"[
            {"WB_MQTT_HOST": "wiren-board.test-stand", "NAME": "DEVICE1", "TARGET": "POWER"}
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        let result = DeviceTable::new(devices);

        assert_eq!(
            result.unwrap_err(),
            ValidationError::EmptyField {
                index: 0,
                field: "CHANNEL"
            }
        );
    }

    #[test]
    fn should_accept_case_insensitive_keys() {
        let json = r#"[
            {"wb_mqtt_host": "h", "Name": "D1", "target": "power", "channel": "/c/K1"}
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        let table = DeviceTable::new(devices).unwrap();

        assert_eq!(
            table.devices()[0],
            Device::new("h", "d1", "power", "/c/K1")
        );
    }

    #[test]
    fn should_ignore_unknown_keys_and_null_values() {
        let json = r#"[
            {"WB_MQTT_HOST": "h", "NAME": "d1", "TARGET": "power", "CHANNEL": "/c/K1",
             "COMMENT": {"rack": 3}},
            {"WB_MQTT_HOST": "h", "NAME": "d2", "TARGET": null, "CHANNEL": "/c/K2"}
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();

        assert_eq!(devices[0].channel, "/c/K1");
        assert_eq!(
            DeviceTable::new(devices).unwrap_err(),
            ValidationError::EmptyField {
                index: 1,
                field: "TARGET"
            }
        );
    }

    #[test]
    fn should_reject_non_string_field_value() {
        let json = r#"[{"WB_MQTT_HOST": "h", "NAME": 1, "TARGET": "power", "CHANNEL": "K1"}]"#;
        assert!(serde_json::from_str::<Vec<Device>>(json).is_err());
    }

    #[test]
    fn should_reject_empty_name_in_later_record() {
        let devices = vec![
            Device::new("h", "d1", "power", "K1"),
            Device::new("h", "", "power", "K2"),
        ];
        assert_eq!(
            DeviceTable::new(devices).unwrap_err(),
            ValidationError::EmptyField {
                index: 1,
                field: "NAME"
            }
        );
    }

    #[test]
    fn should_not_lowercase_host_or_channel() {
        let table =
            DeviceTable::new(vec![Device::new("Host", "D1", "Power", "/Devices/K1")]).unwrap();
        let device = &table.devices()[0];
        assert_eq!(device.host, "Host");
        assert_eq!(device.channel, "/Devices/K1");
    }

    #[test]
    fn should_find_all_devices_by_name() {
        let table = DeviceTable::new(vec![
            Device::new("host", "d1", "POWER", "K1"),
            Device::new("host", "d1", "BOOT_MODE", "K2"),
            Device::new("host", "d2", "BOOT_MODE", "K2"),
        ])
        .unwrap();

        let targets: Vec<&str> = table.by_name("d1").map(|d| d.target.as_str()).collect();
        assert_eq!(targets, ["power", "boot_mode"]);
    }

    #[test]
    fn should_report_duplicate_name_target_pairs_once() {
        let table = DeviceTable::new(vec![
            Device::new("h", "d1", "power", "K1"),
            Device::new("h", "D1", "POWER", "K2"),
            Device::new("h", "d1", "power", "K3"),
            Device::new("h", "d2", "power", "K4"),
        ])
        .unwrap();

        assert_eq!(table.duplicates(), [("d1", "power")]);
    }

    #[test]
    fn should_report_no_duplicates_for_distinct_pairs() {
        let table = DeviceTable::new(vec![
            Device::new("h", "d1", "power", "K1"),
            Device::new("h", "d1", "boot_mode", "K2"),
        ])
        .unwrap();

        assert!(table.duplicates().is_empty());
    }
}
