pub(crate) mod data;
pub(crate) mod settings;

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use btleplug::api::{CharPropFlags, Characteristic, Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use tokio::time::timeout;
use tracing::warn;

use crate::inner::codec;
use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::profile::{self, Caps, ServiceSpec, WireType};

/// One discovered service, bound slot by slot against the profile catalog.
/// Characteristics the catalog does not declare are never bound or touched.
#[derive(Debug)]
pub(crate) struct BoundService {
    spec: &'static ServiceSpec,
    slots: HashMap<&'static str, Characteristic>,
}

impl BoundService {
    pub(crate) fn bind(
        service: &str,
        characteristics: &BTreeSet<Characteristic>,
    ) -> CraftyResult<Self> {
        let spec = profile::service(service)?;
        let mut slots = HashMap::new();
        for (name, uuid) in profile::resolve(service)? {
            let Some(found) = characteristics.iter().find(|ch| ch.uuid == uuid) else {
                continue;
            };
            let declared = profile::characteristic(service, name)?;
            if !covers(found.properties, declared.caps) {
                warn!(
                    service = spec.name,
                    characteristic = name,
                    properties = ?found.properties,
                    "Device does not advertise every declared capability"
                );
            }
            slots.insert(name, found.clone());
        }
        Ok(Self { spec, slots })
    }

    /// Catalog names the device did not expose, in catalog order.
    pub(crate) fn missing(&self) -> Vec<&'static str> {
        self.spec
            .characteristics
            .iter()
            .filter(|ch| !self.slots.contains_key(ch.name))
            .map(|ch| ch.name)
            .collect()
    }

    /// Serves a bound slot under the wire type the caller will decode it
    /// with; the catalog has to declare that same type for the name.
    pub(crate) fn slot(
        &self,
        name: &'static str,
        wire: WireType,
    ) -> CraftyResult<&Characteristic> {
        if profile::wire_type(self.spec.name, name)? != wire {
            return Err(CraftyError::UnknownIdentifier(format!(
                "{}/{name}:{wire}",
                self.spec.name
            )));
        }
        let declared = profile::characteristic(self.spec.name, name)?;
        self.slots
            .get(name)
            .ok_or(CraftyError::CharacteristicNotFound {
                name,
                uuid: declared.uuid,
            })
    }

    pub(crate) async fn read_fixed(
        &self,
        peripheral: &Peripheral,
        name: &'static str,
        io_timeout: Duration,
    ) -> CraftyResult<u16> {
        let characteristic = self.slot(name, WireType::FixedU16)?;
        let payload = timeout(io_timeout, peripheral.read(characteristic)).await??;
        Ok(codec::decode_fixed_u16(&payload)?)
    }

    pub(crate) async fn read_text(
        &self,
        peripheral: &Peripheral,
        name: &'static str,
        io_timeout: Duration,
    ) -> CraftyResult<String> {
        let characteristic = self.slot(name, WireType::CString)?;
        let payload = timeout(io_timeout, peripheral.read(characteristic)).await??;
        Ok(codec::decode_text(&payload))
    }

    pub(crate) async fn read_flag(
        &self,
        peripheral: &Peripheral,
        name: &'static str,
        io_timeout: Duration,
    ) -> CraftyResult<bool> {
        let characteristic = self.slot(name, WireType::Flag)?;
        let payload = timeout(io_timeout, peripheral.read(characteristic)).await??;
        Ok(codec::decode_flag(&payload)?)
    }

    pub(crate) async fn write_fixed(
        &self,
        peripheral: &Peripheral,
        name: &'static str,
        value: u16,
        io_timeout: Duration,
    ) -> CraftyResult<()> {
        let characteristic = self.slot(name, WireType::FixedU16)?;
        let payload = codec::encode_fixed_u16(value);
        timeout(
            io_timeout,
            peripheral.write(characteristic, &payload, WriteType::WithResponse),
        )
        .await??;
        Ok(())
    }

    pub(crate) async fn write_flag(
        &self,
        peripheral: &Peripheral,
        name: &'static str,
        on: bool,
        io_timeout: Duration,
    ) -> CraftyResult<()> {
        let characteristic = self.slot(name, WireType::Flag)?;
        let payload = codec::encode_flag(on);
        timeout(
            io_timeout,
            peripheral.write(characteristic, &payload, WriteType::WithResponse),
        )
        .await??;
        Ok(())
    }
}

/// True when the device's GATT properties include every capability the
/// catalog declares for the slot.
fn covers(properties: CharPropFlags, caps: Caps) -> bool {
    (!caps.read || properties.contains(CharPropFlags::READ))
        && (!caps.write || properties.contains(CharPropFlags::WRITE))
        && (!caps.notify || properties.contains(CharPropFlags::NOTIFY))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn gatt(uuid: Uuid, service_uuid: Uuid, properties: CharPropFlags) -> Characteristic {
        Characteristic {
            uuid,
            service_uuid,
            properties,
            descriptors: BTreeSet::new(),
        }
    }

    #[test]
    fn binds_only_catalog_declared_characteristics() {
        let characteristics = BTreeSet::from([
            gatt(profile::MODEL_NAME, profile::META_SERVICE, CharPropFlags::READ),
            gatt(Uuid::from_u128(0xfeed), profile::META_SERVICE, CharPropFlags::READ),
        ]);
        let bound = BoundService::bind("metadata", &characteristics).unwrap();
        assert!(bound.slot("model-name", WireType::CString).is_ok());
        assert_eq!(bound.missing(), vec!["firmware-version", "serial-number"]);
    }

    #[test]
    fn binding_an_unknown_service_is_rejected() {
        assert!(matches!(
            BoundService::bind("bogus", &BTreeSet::new()),
            Err(CraftyError::UnknownIdentifier(name)) if name == "bogus"
        ));
    }

    #[test]
    fn a_slot_is_only_served_under_its_declared_wire_type() {
        let characteristics = BTreeSet::from([gatt(
            profile::CHARGE_INDICATOR,
            profile::SETTINGS_SERVICE,
            CharPropFlags::READ | CharPropFlags::WRITE,
        )]);
        let bound = BoundService::bind("settings", &characteristics).unwrap();
        assert!(bound.slot("charge-indicator", WireType::Flag).is_ok());
        assert!(matches!(
            bound.slot("charge-indicator", WireType::FixedU16),
            Err(CraftyError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn capability_coverage_checks_each_declared_bit() {
        let read_write = Caps {
            read: true,
            write: true,
            notify: false,
        };
        assert!(covers(CharPropFlags::READ | CharPropFlags::WRITE, read_write));
        assert!(!covers(CharPropFlags::READ, read_write));

        let read_notify = Caps {
            read: true,
            write: false,
            notify: true,
        };
        assert!(covers(CharPropFlags::READ | CharPropFlags::NOTIFY, read_notify));
        assert!(!covers(CharPropFlags::READ | CharPropFlags::WRITE, read_notify));
    }
}
