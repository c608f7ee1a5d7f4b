use std::collections::BTreeSet;
use std::time::Duration;

use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::Peripheral;
use tracing::warn;

use super::BoundService;
use crate::inner::error::CraftyResult;
use crate::inner::model::status::DeviceStatus;
use crate::inner::profile::WireType;

/// Typed handle over the data service. Slots missing on the device surface
/// as `CharacteristicNotFound` only when actually used.
#[derive(Debug)]
pub(crate) struct DataService {
    inner: BoundService,
}

impl DataService {
    pub(crate) fn bind(characteristics: &BTreeSet<Characteristic>) -> CraftyResult<Self> {
        Ok(Self {
            inner: BoundService::bind("data", characteristics)?,
        })
    }

    pub(crate) fn missing(&self) -> Vec<&'static str> {
        self.inner.missing()
    }

    pub(crate) fn current_temp(&self) -> CraftyResult<&Characteristic> {
        self.inner.slot("current-temperature", WireType::FixedU16)
    }

    pub(crate) fn battery(&self) -> CraftyResult<&Characteristic> {
        self.inner.slot("battery-level", WireType::FixedU16)
    }

    /// Reads every readable slot. A failing slot keeps its zero default and
    /// never aborts the remaining reads.
    pub(crate) async fn read_status(
        &self,
        peripheral: &Peripheral,
        io_timeout: Duration,
    ) -> DeviceStatus {
        let mut status = DeviceStatus {
            id: peripheral.address().to_string(),
            ..Default::default()
        };
        match self.inner.read_fixed(peripheral, "current-temperature", io_timeout).await {
            Ok(value) => status.current_temp_deci = value,
            Err(err) => warn!("Failed to read current temperature: {err}"),
        }
        match self.inner.read_fixed(peripheral, "temperature-setpoint", io_timeout).await {
            Ok(value) => status.setpoint_deci = value,
            Err(err) => warn!("Failed to read temperature setpoint: {err}"),
        }
        match self.inner.read_fixed(peripheral, "boost-temperature", io_timeout).await {
            Ok(value) => status.boost_deci = value,
            Err(err) => warn!("Failed to read boost temperature: {err}"),
        }
        match self.inner.read_fixed(peripheral, "battery-level", io_timeout).await {
            Ok(value) => status.battery_pct = value,
            Err(err) => warn!("Failed to read battery level: {err}"),
        }
        match self.inner.read_fixed(peripheral, "led-brightness", io_timeout).await {
            Ok(value) => status.led_pct = value,
            Err(err) => warn!("Failed to read LED brightness: {err}"),
        }
        status
    }

    pub(crate) async fn write_setpoint(
        &self,
        peripheral: &Peripheral,
        deci: u16,
        io_timeout: Duration,
    ) -> CraftyResult<()> {
        self.inner
            .write_fixed(peripheral, "temperature-setpoint", deci, io_timeout)
            .await
    }

    pub(crate) async fn write_boost(
        &self,
        peripheral: &Peripheral,
        deci: u16,
        io_timeout: Duration,
    ) -> CraftyResult<()> {
        self.inner
            .write_fixed(peripheral, "boost-temperature", deci, io_timeout)
            .await
    }

    /// The heater takes the same fixed-point format; any non-zero value
    /// starts heating.
    pub(crate) async fn turn_on(
        &self,
        peripheral: &Peripheral,
        io_timeout: Duration,
    ) -> CraftyResult<()> {
        self.inner
            .write_fixed(peripheral, "heater-on", 1, io_timeout)
            .await
    }
}
