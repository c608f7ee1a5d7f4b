use std::collections::HashMap;
use std::time::Duration;

use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::Peripheral;
use futures_util::StreamExt;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::inner::codec;
use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::model::status::Deci;
use crate::inner::profile;
use crate::inner::services::data::DataService;

type ValueHandler = Box<dyn FnMut(CraftyResult<u16>) + Send>;

/// Fans notifications out to per-characteristic handlers. Payloads are
/// decoded before dispatch, so handlers only ever see values or errors.
pub(crate) struct Subscriber<'a> {
    peripheral: &'a Peripheral,
    handlers: HashMap<Uuid, ValueHandler>,
}

impl<'a> Subscriber<'a> {
    pub(crate) fn new(peripheral: &'a Peripheral) -> Self {
        Self {
            peripheral,
            handlers: HashMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) async fn subscribe<F>(
        &mut self,
        characteristic: &Characteristic,
        io_timeout: Duration,
        handler: F,
    ) -> CraftyResult<()>
    where
        F: FnMut(CraftyResult<u16>) + Send + 'static,
    {
        timeout(io_timeout, self.peripheral.subscribe(characteristic)).await??;
        self.handlers.insert(characteristic.uuid, Box::new(handler));
        Ok(())
    }

    /// Runs until the notification stream ends, which only happens once the
    /// connection is gone.
    pub(crate) async fn run(mut self) -> CraftyResult<()> {
        let mut notifications = self.peripheral.notifications().await?;
        while let Some(event) = notifications.next().await {
            let Some(handler) = self.handlers.get_mut(&event.uuid) else {
                continue;
            };
            handler(codec::decode_fixed_u16(&event.value).map_err(CraftyError::from));
        }
        Err(CraftyError::EndOfStream)
    }
}

/// Subscribes to battery and temperature updates and prints them until the
/// stream ends or the user interrupts.
pub(crate) async fn run(
    peripheral: &Peripheral,
    data: Option<&DataService>,
    turn_on: bool,
    io_timeout: Duration,
) -> CraftyResult<()> {
    let Some(data) = data else {
        return Err(CraftyError::ServiceNotFound {
            name: "data",
            uuid: profile::DATA_SERVICE,
        });
    };

    if turn_on {
        println!("Turning Crafty ON...");
        if let Err(err) = data.turn_on(peripheral, io_timeout).await {
            warn!("Failed to send turn on command to Crafty: {err}");
        }
    }

    let mut subscriber = Subscriber::new(peripheral);

    match data.battery() {
        Ok(characteristic) => {
            subscriber
                .subscribe(characteristic, io_timeout, |value| match value {
                    Ok(level) => println!("Battery level: {level}%"),
                    Err(err) => warn!("Dropped a battery notification: {err}"),
                })
                .await?;
        }
        Err(err) => warn!("Battery subscription skipped: {err}"),
    }

    match data.current_temp() {
        Ok(characteristic) => {
            subscriber
                .subscribe(characteristic, io_timeout, |value| match value {
                    Ok(deci) => println!("Current Temp: {} C", Deci(deci)),
                    Err(err) => warn!("Dropped a temperature notification: {err}"),
                })
                .await?;
        }
        Err(err) => warn!("Temperature subscription skipped: {err}"),
    }

    if subscriber.is_empty() {
        warn!("Nothing to monitor; both notification sources are missing");
        return Ok(());
    }

    info!("Monitoring; press Ctrl-C to stop");
    tokio::select! {
        outcome = subscriber.run() => outcome,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Interrupted");
            Ok(())
        }
    }
}
