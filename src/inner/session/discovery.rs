use std::time::Duration;

use btleplug::api::{Peripheral as _, Service};
use btleplug::platform::Peripheral;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::model::metadata::DeviceMetadata;
use crate::inner::profile;
use crate::inner::services::BoundService;
use crate::inner::services::data::DataService;
use crate::inner::services::settings::SettingsService;

/// One full GATT enumeration; everything after this binds against the
/// cached service list.
pub(crate) async fn discover_services(
    peripheral: &Peripheral,
    io_timeout: Duration,
) -> CraftyResult<()> {
    timeout(io_timeout, peripheral.discover_services()).await??;
    debug!(services = peripheral.services().len(), "Discovered services");
    Ok(())
}

/// Picks a catalog service out of the discovery response.
fn find_service(peripheral: &Peripheral, name: &str) -> CraftyResult<Service> {
    let spec = profile::service(name)?;
    peripheral
        .services()
        .into_iter()
        .find(|service| service.uuid == spec.uuid)
        .ok_or(CraftyError::ServiceNotFound {
            name: spec.name,
            uuid: spec.uuid,
        })
}

/// Reads the identity characteristics. A failing read leaves that field
/// empty instead of dropping the whole result.
pub(crate) async fn discover_metadata(
    peripheral: &Peripheral,
    io_timeout: Duration,
) -> CraftyResult<DeviceMetadata> {
    let service = find_service(peripheral, "metadata")?;
    let bound = BoundService::bind("metadata", &service.characteristics)?;
    let mut metadata = DeviceMetadata {
        id: peripheral.address().to_string(),
        ..Default::default()
    };
    for (name, field) in [
        ("model-name", &mut metadata.model_name),
        ("firmware-version", &mut metadata.fw_version),
        ("serial-number", &mut metadata.serial_number),
    ] {
        match bound.read_text(peripheral, name, io_timeout).await {
            Ok(text) => *field = text,
            Err(err) => warn!(characteristic = name, "Failed to read metadata: {err}"),
        }
    }
    Ok(metadata)
}

pub(crate) fn discover_data_service(peripheral: &Peripheral) -> CraftyResult<DataService> {
    let service = find_service(peripheral, "data")?;
    let data = DataService::bind(&service.characteristics)?;
    let missing = data.missing();
    if !missing.is_empty() {
        warn!(?missing, "Data service is missing characteristics");
    }
    Ok(data)
}

pub(crate) fn discover_settings_service(peripheral: &Peripheral) -> CraftyResult<SettingsService> {
    let service = find_service(peripheral, "settings")?;
    let settings = SettingsService::bind(&service.characteristics)?;
    let missing = settings.missing();
    if !missing.is_empty() {
        warn!(?missing, "Settings service is missing characteristics");
    }
    Ok(settings)
}
