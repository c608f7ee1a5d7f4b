use std::time::Duration;

use btleplug::platform::Peripheral;
use tracing::warn;

use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::model::command::PendingCommand;
use crate::inner::model::status::DeviceStatus;
use crate::inner::profile;
use crate::inner::services::data::DataService;
use crate::inner::services::settings::SettingsService;

/// Raw write requests from the command line, dispatched in a fixed order:
/// temperature, boost, charge indicator.
#[derive(Debug, Clone, Default)]
pub(crate) struct CommandRequest {
    pub(crate) set_temp: Option<i64>,
    pub(crate) set_boost: Option<i64>,
    pub(crate) set_charge_indicator: Option<String>,
}

impl CommandRequest {
    pub(crate) fn is_empty(&self) -> bool {
        self.set_temp.is_none() && self.set_boost.is_none() && self.set_charge_indicator.is_none()
    }
}

/// Validates and issues the requested writes. A rejected or failed command
/// is reported and never stops the ones after it.
pub(crate) async fn run(
    peripheral: &Peripheral,
    data: Option<&DataService>,
    settings: Option<&SettingsService>,
    status: Option<&DeviceStatus>,
    request: &CommandRequest,
    io_timeout: Duration,
) -> CraftyResult<()> {
    // Boost rides on top of the setpoint: the one being set right now when
    // valid, the one read from the device otherwise.
    let mut boost_base = status.map(DeviceStatus::setpoint_celsius).unwrap_or_default();

    if let Some(celsius) = request.set_temp {
        match PendingCommand::set_temperature(celsius) {
            Ok(command) => {
                if let PendingCommand::SetTemperature { celsius } = command {
                    boost_base = celsius;
                }
                if let Err(err) = dispatch(&command, peripheral, data, settings, io_timeout).await {
                    warn!("Failed to set the temperature point: {err}");
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    if let Some(offset) = request.set_boost {
        match PendingCommand::set_boost(boost_base, offset) {
            Ok(command) => {
                if let Err(err) = dispatch(&command, peripheral, data, settings, io_timeout).await {
                    warn!("Failed to set the boost temperature: {err}");
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    if let Some(token) = &request.set_charge_indicator {
        match PendingCommand::set_charge_indicator(token) {
            Ok(command) => {
                if let Err(err) = dispatch(&command, peripheral, data, settings, io_timeout).await {
                    warn!("Failed to set the charge indicator: {err}");
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}

async fn dispatch(
    command: &PendingCommand,
    peripheral: &Peripheral,
    data: Option<&DataService>,
    settings: Option<&SettingsService>,
    io_timeout: Duration,
) -> CraftyResult<()> {
    match *command {
        PendingCommand::SetTemperature { celsius } => {
            let data = data.ok_or(data_service_unavailable())?;
            println!("Setting temperature point to {celsius}");
            data.write_setpoint(peripheral, celsius * 10, io_timeout).await
        }
        PendingCommand::SetBoost { effective, .. } => {
            let data = data.ok_or(data_service_unavailable())?;
            if command.clamped() {
                println!("Clamped boost temp to +{effective} C");
            }
            if effective == 0 {
                // Zero boost is "no boost requested".
                return Ok(());
            }
            println!("Setting boost temp to +{effective} C");
            data.write_boost(peripheral, effective * 10, io_timeout).await
        }
        PendingCommand::SetChargeIndicator { on } => {
            let settings = settings.ok_or(settings_service_unavailable())?;
            println!("Turning charge indicator {}.", if on { "ON" } else { "OFF" });
            settings
                .write_charge_indicator(peripheral, on, io_timeout)
                .await?;
            // The write ack alone does not make the setting stick; reading
            // it back settles it and reports the state the device kept.
            let observed = settings.read_charge_indicator(peripheral, io_timeout).await?;
            println!("Charge indicator: {}", if observed { "ON" } else { "OFF" });
            Ok(())
        }
    }
}

fn data_service_unavailable() -> CraftyError {
    CraftyError::ServiceNotFound {
        name: "data",
        uuid: profile::DATA_SERVICE,
    }
}

fn settings_service_unavailable() -> CraftyError {
    CraftyError::ServiceNotFound {
        name: "settings",
        uuid: profile::SETTINGS_SERVICE,
    }
}
