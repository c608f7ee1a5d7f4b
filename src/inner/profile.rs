//! The Crafty GATT profile. All vendor UUIDs share the base
//! `xxxxxxxx-4c45-4b43-4942-265a524f5453`; the low nibble of the 32-bit
//! prefix names the owning service.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use uuid::Uuid;

use crate::inner::error::{CraftyError, CraftyResult};

pub(crate) const DATA_SERVICE: Uuid = Uuid::from_u128(0x00000001_4c45_4b43_4942_265a524f5453);
pub(crate) const CURRENT_TEMP: Uuid = Uuid::from_u128(0x00000011_4c45_4b43_4942_265a524f5453);
pub(crate) const TEMP_SETPOINT: Uuid = Uuid::from_u128(0x00000021_4c45_4b43_4942_265a524f5453);
pub(crate) const BOOST_TEMP: Uuid = Uuid::from_u128(0x00000031_4c45_4b43_4942_265a524f5453);
pub(crate) const BATTERY_LEVEL: Uuid = Uuid::from_u128(0x00000041_4c45_4b43_4942_265a524f5453);
pub(crate) const LED_BRIGHTNESS: Uuid = Uuid::from_u128(0x00000051_4c45_4b43_4942_265a524f5453);
pub(crate) const HEATER_ON: Uuid = Uuid::from_u128(0x00000081_4c45_4b43_4942_265a524f5453);

pub(crate) const META_SERVICE: Uuid = Uuid::from_u128(0x00000002_4c45_4b43_4942_265a524f5453);
pub(crate) const MODEL_NAME: Uuid = Uuid::from_u128(0x00000022_4c45_4b43_4942_265a524f5453);
pub(crate) const FIRMWARE_VERSION: Uuid = Uuid::from_u128(0x00000032_4c45_4b43_4942_265a524f5453);
pub(crate) const SERIAL_NUMBER: Uuid = Uuid::from_u128(0x00000052_4c45_4b43_4942_265a524f5453);

pub(crate) const SETTINGS_SERVICE: Uuid = Uuid::from_u128(0x00000003_4c45_4b43_4942_265a524f5453);
pub(crate) const CHARGE_INDICATOR: Uuid = Uuid::from_u128(0x00000093_4c45_4b43_4942_265a524f5453);

/// Advertisements carry the serial number as service data keyed by the
/// 16-bit id 0x0052 on the Bluetooth base UUID, not by [SERIAL_NUMBER].
pub(crate) const SERIAL_SERVICE_DATA: Uuid = Uuid::from_u128(0x00000052_0000_1000_8000_00805f9b34fb);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WireType {
    FixedU16,
    CString,
    Flag,
}

impl Display for WireType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FixedU16 => "uint16-fixed1",
            Self::CString => "cstring",
            Self::Flag => "flag",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Caps {
    pub(crate) read: bool,
    pub(crate) write: bool,
    pub(crate) notify: bool,
}

const READ: Caps = Caps {
    read: true,
    write: false,
    notify: false,
};
const READ_WRITE: Caps = Caps {
    read: true,
    write: true,
    notify: false,
};
const READ_NOTIFY: Caps = Caps {
    read: true,
    write: false,
    notify: true,
};
const WRITE: Caps = Caps {
    read: false,
    write: true,
    notify: false,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct CharacteristicSpec {
    pub(crate) name: &'static str,
    pub(crate) uuid: Uuid,
    pub(crate) wire: WireType,
    pub(crate) caps: Caps,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ServiceSpec {
    pub(crate) name: &'static str,
    pub(crate) uuid: Uuid,
    pub(crate) characteristics: &'static [CharacteristicSpec],
}

pub(crate) static PROFILE: &[ServiceSpec] = &[
    ServiceSpec {
        name: "data",
        uuid: DATA_SERVICE,
        characteristics: &[
            CharacteristicSpec {
                name: "current-temperature",
                uuid: CURRENT_TEMP,
                wire: WireType::FixedU16,
                caps: READ_NOTIFY,
            },
            CharacteristicSpec {
                name: "temperature-setpoint",
                uuid: TEMP_SETPOINT,
                wire: WireType::FixedU16,
                caps: READ_WRITE,
            },
            CharacteristicSpec {
                name: "boost-temperature",
                uuid: BOOST_TEMP,
                wire: WireType::FixedU16,
                caps: READ_WRITE,
            },
            CharacteristicSpec {
                name: "battery-level",
                uuid: BATTERY_LEVEL,
                wire: WireType::FixedU16,
                caps: READ_NOTIFY,
            },
            CharacteristicSpec {
                name: "led-brightness",
                uuid: LED_BRIGHTNESS,
                wire: WireType::FixedU16,
                caps: READ_WRITE,
            },
            CharacteristicSpec {
                name: "heater-on",
                uuid: HEATER_ON,
                wire: WireType::FixedU16,
                caps: WRITE,
            },
        ],
    },
    ServiceSpec {
        name: "metadata",
        uuid: META_SERVICE,
        characteristics: &[
            CharacteristicSpec {
                name: "model-name",
                uuid: MODEL_NAME,
                wire: WireType::CString,
                caps: READ,
            },
            CharacteristicSpec {
                name: "firmware-version",
                uuid: FIRMWARE_VERSION,
                wire: WireType::CString,
                caps: READ,
            },
            CharacteristicSpec {
                name: "serial-number",
                uuid: SERIAL_NUMBER,
                wire: WireType::CString,
                caps: READ,
            },
        ],
    },
    ServiceSpec {
        name: "settings",
        uuid: SETTINGS_SERVICE,
        characteristics: &[CharacteristicSpec {
            name: "charge-indicator",
            uuid: CHARGE_INDICATOR,
            wire: WireType::Flag,
            caps: READ_WRITE,
        }],
    },
];

pub(crate) fn service(name: &str) -> CraftyResult<&'static ServiceSpec> {
    PROFILE
        .iter()
        .find(|service| service.name == name)
        .ok_or_else(|| CraftyError::UnknownIdentifier(name.to_string()))
}

pub(crate) fn characteristic(
    service_name: &str,
    characteristic_name: &str,
) -> CraftyResult<&'static CharacteristicSpec> {
    service(service_name)?
        .characteristics
        .iter()
        .find(|ch| ch.name == characteristic_name)
        .ok_or_else(|| {
            CraftyError::UnknownIdentifier(format!("{service_name}/{characteristic_name}"))
        })
}

/// Resolves every characteristic of a service to its UUID by symbolic name.
pub(crate) fn resolve(service_name: &str) -> CraftyResult<HashMap<&'static str, Uuid>> {
    Ok(service(service_name)?
        .characteristics
        .iter()
        .map(|ch| (ch.name, ch.uuid))
        .collect())
}

pub(crate) fn wire_type(service_name: &str, characteristic_name: &str) -> CraftyResult<WireType> {
    Ok(characteristic(service_name, characteristic_name)?.wire)
}
