pub(crate) mod discovery;
mod scan;

use std::collections::HashSet;
use std::sync::Arc;

use btleplug::api::{Central as _, Manager as _, Peripheral as _};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::inner::args::AppConf;
use crate::inner::commands::{self, CommandRequest};
use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::model::metadata::DeviceMetadata;
use crate::inner::model::target::TargetSelector;
use crate::inner::monitor;

#[derive(Debug, Clone)]
pub(crate) enum SessionAction {
    Monitor { turn_on: bool },
    Command(CommandRequest),
}

pub(crate) async fn default_adapter() -> CraftyResult<Adapter> {
    let manager = Manager::new().await?;
    let adapter = manager
        .adapters()
        .await?
        .into_iter()
        .next()
        .ok_or(CraftyError::AdapterNotFound)?;
    info!(adapter = %adapter.adapter_info().await?, "Using adapter");
    Ok(adapter)
}

/// One scan-connect-interact-disconnect pass against a single Crafty.
pub(crate) struct CraftySession {
    adapter: Adapter,
    selector: TargetSelector,
    conf: Arc<AppConf>,
    /// Peripherals already rejected by the selector.
    seen: HashSet<PeripheralId>,
}

impl CraftySession {
    pub(crate) fn new(adapter: Adapter, selector: TargetSelector, conf: Arc<AppConf>) -> Self {
        Self {
            adapter,
            selector,
            conf,
            seen: HashSet::new(),
        }
    }

    pub(crate) async fn run(mut self, action: SessionAction) -> CraftyResult<()> {
        let peripheral = self.scan_for_target().await?;
        // A half-open connection attempt may still land after a timeout, so
        // the teardown runs on every path past this point.
        let outcome = match self.connect(&peripheral).await {
            Ok(()) => self.drive(&peripheral, action).await,
            Err(err) => Err(err),
        };
        self.close(&peripheral).await;
        outcome
    }

    #[tracing::instrument(level = "info", skip_all, err)]
    async fn connect(&self, peripheral: &Peripheral) -> CraftyResult<()> {
        info!(address = %peripheral.address(), "Connecting");
        timeout(self.conf.connect_timeout, peripheral.connect()).await??;
        info!("Connected");
        Ok(())
    }

    async fn drive(&self, peripheral: &Peripheral, action: SessionAction) -> CraftyResult<()> {
        discovery::discover_services(peripheral, self.conf.io_timeout).await?;

        let metadata = match discovery::discover_metadata(peripheral, self.conf.io_timeout).await {
            Ok(metadata) => Some(metadata),
            Err(err @ CraftyError::ServiceNotFound { .. }) => {
                warn!("{err}");
                None
            }
            Err(err) => return Err(err),
        };
        self.verify_identity(peripheral, metadata.as_ref())?;
        if let Some(metadata) = &metadata {
            println!("{metadata}");
        }

        let data = match discovery::discover_data_service(peripheral) {
            Ok(data) => Some(data),
            Err(err @ CraftyError::ServiceNotFound { .. }) => {
                warn!("{err}");
                None
            }
            Err(err) => return Err(err),
        };
        let status = match &data {
            Some(data) => {
                let status = data.read_status(peripheral, self.conf.io_timeout).await;
                println!("{status}");
                Some(status)
            }
            None => None,
        };

        let settings = match discovery::discover_settings_service(peripheral) {
            Ok(settings) => Some(settings),
            Err(err @ CraftyError::ServiceNotFound { .. }) => {
                warn!("{err}");
                None
            }
            Err(err) => return Err(err),
        };
        if let Some(settings) = &settings {
            match settings
                .read_charge_indicator(peripheral, self.conf.io_timeout)
                .await
            {
                Ok(on) => println!("Charge indicator: {}", if on { "ON" } else { "OFF" }),
                Err(err) => warn!("Failed to read charging indicator status: {err}"),
            }
        }

        match action {
            SessionAction::Monitor { turn_on } => {
                monitor::run(peripheral, data.as_ref(), turn_on, self.conf.io_timeout).await
            }
            SessionAction::Command(request) => {
                commands::run(
                    peripheral,
                    data.as_ref(),
                    settings.as_ref(),
                    status.as_ref(),
                    &request,
                    self.conf.io_timeout,
                )
                .await
            }
        }
    }

    /// The device scanning picked must be the one asked for. A connected
    /// mismatch aborts the session before any write can happen.
    fn verify_identity(
        &self,
        peripheral: &Peripheral,
        metadata: Option<&DeviceMetadata>,
    ) -> CraftyResult<()> {
        match &self.selector {
            TargetSelector::Address(expected) => {
                if !self.selector.matches_address(peripheral.address()) {
                    return Err(CraftyError::IdentityMismatch {
                        expected: expected.clone(),
                        actual: peripheral.address().to_string(),
                    });
                }
            }
            TargetSelector::SerialPrefix(expected) => {
                let serial = metadata
                    .map(|metadata| metadata.serial_number.as_str())
                    .unwrap_or_default();
                if serial.is_empty() {
                    warn!("Could not read the device serial; identity left unverified");
                } else if !self.selector.matches_serial(serial) {
                    return Err(CraftyError::IdentityMismatch {
                        expected: expected.clone(),
                        actual: serial.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    async fn close(&self, peripheral: &Peripheral) {
        match peripheral.is_connected().await {
            Ok(true) => match peripheral.disconnect().await {
                Ok(()) => info!("Disconnected"),
                Err(err) => warn!("Failed to disconnect cleanly: {err}"),
            },
            Ok(false) => {}
            Err(err) => warn!("Failed to check the connection state: {err}"),
        }
    }
}
