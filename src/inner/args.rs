use std::time::Duration;

use clap::Parser;

use crate::inner::commands::CommandRequest;
use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::model::target::TargetSelector;
use crate::inner::session::SessionAction;

const SN_HELP: &str =
    "CRAFTY_SN must be set to the device serial number from the bottom label, like [CYxxxxxx], \
     or --device must name a peripheral address.";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = r###"Remote control for the Storz & Bickel Crafty vaporizer
"###
)]
pub(crate) struct AppConf {
    /// Serial number from the label on the bottom of the device, like
    /// [CYxxxxxx]. A shorter value matches as a prefix.
    #[arg(long, env = "CRAFTY_SN")]
    pub(crate) serial: Option<String>,

    /// Exact peripheral address to connect to instead of matching by serial.
    #[arg(long)]
    pub(crate) device: Option<String>,

    /// Set the base vape temperature point, in whole °C (0-210).
    #[arg(long, value_name = "CELSIUS")]
    pub(crate) set_temp: Option<i64>,

    /// Set the boost value on top of the temperature point (positive only).
    #[arg(long, value_name = "CELSIUS")]
    pub(crate) set_boost: Option<i64>,

    /// Set the charging indicator ON or OFF.
    #[arg(long, value_name = "ON|OFF")]
    pub(crate) set_charge_indicator: Option<String>,

    /// Turn the Crafty ON remotely before monitoring.
    #[arg(long)]
    pub(crate) turn_on: bool,

    /// Give up when no matching device shows up within this time.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    pub(crate) scan_timeout: Duration,

    /// Connection establishment timeout.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "15s")]
    pub(crate) connect_timeout: Duration,

    /// Timeout for service discovery and characteristic reads and writes.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "5s")]
    pub(crate) io_timeout: Duration,
}

impl AppConf {
    /// An explicit --device wins over the serial from flag or environment.
    pub(crate) fn target(&self) -> CraftyResult<TargetSelector> {
        if let Some(device) = &self.device {
            if device.is_empty() {
                return Err(CraftyError::Validation(SN_HELP.to_string()));
            }
            return Ok(TargetSelector::Address(device.clone()));
        }
        match &self.serial {
            Some(serial) if !serial.is_empty() => Ok(TargetSelector::SerialPrefix(serial.clone())),
            _ => Err(CraftyError::Validation(SN_HELP.to_string())),
        }
    }

    /// With no write flags given the session monitors notifications.
    pub(crate) fn action(&self) -> SessionAction {
        let request = CommandRequest {
            set_temp: self.set_temp,
            set_boost: self.set_boost,
            set_charge_indicator: self.set_charge_indicator.clone(),
        };
        if request.is_empty() {
            SessionAction::Monitor {
                turn_on: self.turn_on,
            }
        } else {
            SessionAction::Command(request)
        }
    }
}
