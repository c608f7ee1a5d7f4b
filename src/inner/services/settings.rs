use std::collections::BTreeSet;
use std::time::Duration;

use btleplug::api::Characteristic;
use btleplug::platform::Peripheral;

use super::BoundService;
use crate::inner::error::CraftyResult;

/// Typed handle over the settings service.
#[derive(Debug)]
pub(crate) struct SettingsService {
    inner: BoundService,
}

impl SettingsService {
    pub(crate) fn bind(characteristics: &BTreeSet<Characteristic>) -> CraftyResult<Self> {
        Ok(Self {
            inner: BoundService::bind("settings", characteristics)?,
        })
    }

    pub(crate) fn missing(&self) -> Vec<&'static str> {
        self.inner.missing()
    }

    pub(crate) async fn read_charge_indicator(
        &self,
        peripheral: &Peripheral,
        io_timeout: Duration,
    ) -> CraftyResult<bool> {
        self.inner
            .read_flag(peripheral, "charge-indicator", io_timeout)
            .await
    }

    pub(crate) async fn write_charge_indicator(
        &self,
        peripheral: &Peripheral,
        on: bool,
        io_timeout: Duration,
    ) -> CraftyResult<()> {
        self.inner
            .write_flag(peripheral, "charge-indicator", on, io_timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use btleplug::api::CharPropFlags;

    use super::*;
    use crate::inner::error::CraftyError;
    use crate::inner::profile::{self, WireType};

    #[test]
    fn binds_the_charge_indicator() {
        let characteristic = Characteristic {
            uuid: profile::CHARGE_INDICATOR,
            service_uuid: profile::SETTINGS_SERVICE,
            properties: CharPropFlags::READ | CharPropFlags::WRITE,
            descriptors: BTreeSet::new(),
        };
        let service = SettingsService::bind(&BTreeSet::from([characteristic])).unwrap();
        assert!(service.inner.slot("charge-indicator", WireType::Flag).is_ok());
        assert!(service.missing().is_empty());
    }

    #[test]
    fn an_empty_service_reports_the_slot_missing() {
        let service = SettingsService::bind(&BTreeSet::new()).unwrap();
        assert_eq!(service.missing(), vec!["charge-indicator"]);
        assert!(matches!(
            service.inner.slot("charge-indicator", WireType::Flag),
            Err(CraftyError::CharacteristicNotFound {
                name: "charge-indicator",
                ..
            })
        ));
    }
}
