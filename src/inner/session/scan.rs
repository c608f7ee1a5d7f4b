use std::collections::HashMap;

use btleplug::api::{Central as _, CentralEvent, Peripheral as _, ScanFilter};
use btleplug::platform::Peripheral;
use futures_util::StreamExt;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use super::CraftySession;
use crate::inner::error::{CraftyError, CraftyResult};
use crate::inner::model::target::TargetSelector;
use crate::inner::profile;

impl CraftySession {
    /// Scans until an advertisement satisfies the selector, then hands the
    /// matched peripheral back with scanning already stopped.
    #[tracing::instrument(level = "info", skip_all, err)]
    pub(super) async fn scan_for_target(&mut self) -> CraftyResult<Peripheral> {
        info!(selector = %self.selector, timeout = ?self.conf.scan_timeout, "Scanning for Crafty");
        self.adapter
            .start_scan(ScanFilter {
                services: vec![profile::DATA_SERVICE, profile::META_SERVICE],
            })
            .await?;

        let matched = timeout(self.conf.scan_timeout, self.match_advertisements()).await;

        // Scanning interferes with connection setup; stop it in every outcome.
        if let Err(err) = self.adapter.stop_scan().await {
            warn!("Failed to stop scanning: {err}");
        }

        match matched {
            Ok(found) => found,
            Err(_) => Err(CraftyError::ScanTimedOut),
        }
    }

    async fn match_advertisements(&mut self) -> CraftyResult<Peripheral> {
        let mut events = self.adapter.events().await?;
        while let Some(event) = events.next().await {
            match event {
                CentralEvent::ServiceDataAdvertisement { id, service_data } => {
                    if self.seen.contains(&id) {
                        continue;
                    }
                    if let Some(serial) = self.selector.match_service_data(&service_data) {
                        let peripheral = self.adapter.peripheral(&id).await?;
                        info!(address = %peripheral.address(), %serial, "Matched advertised serial");
                        return Ok(peripheral);
                    }
                    if ruled_out_by_serial(&self.selector, &service_data) {
                        self.seen.insert(id);
                    }
                }
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => {
                    if !matches!(self.selector, TargetSelector::Address(_))
                        || self.seen.contains(&id)
                    {
                        continue;
                    }
                    let peripheral = self.adapter.peripheral(&id).await?;
                    if self.selector.matches_address(peripheral.address()) {
                        info!(address = %peripheral.address(), "Matched device address");
                        return Ok(peripheral);
                    }
                    self.seen.insert(id);
                }
                _ => {}
            }
        }
        Err(CraftyError::EndOfStream)
    }
}

/// The advertised serial is static, so a peripheral whose serial failed the
/// match stays non-matching for the rest of the scan. An address selector
/// never inspects service data and must keep the peripheral eligible for
/// address matching.
fn ruled_out_by_serial(
    selector: &TargetSelector,
    service_data: &HashMap<Uuid, Vec<u8>>,
) -> bool {
    matches!(selector, TargetSelector::SerialPrefix(_))
        && service_data.contains_key(&profile::SERIAL_SERVICE_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crafty_advert() -> HashMap<Uuid, Vec<u8>> {
        HashMap::from([(profile::SERIAL_SERVICE_DATA, b"CY123456".to_vec())])
    }

    #[test]
    fn serial_selector_rules_out_a_non_matching_peripheral() {
        let selector = TargetSelector::SerialPrefix("CY999999".to_string());
        assert!(selector.match_service_data(&crafty_advert()).is_none());
        assert!(ruled_out_by_serial(&selector, &crafty_advert()));
    }

    #[test]
    fn address_selector_never_rules_out_from_service_data() {
        let selector = TargetSelector::Address("00:11:22:33:44:55".to_string());
        assert!(!ruled_out_by_serial(&selector, &crafty_advert()));
    }

    #[test]
    fn adverts_without_a_serial_rule_nothing_out() {
        let selector = TargetSelector::SerialPrefix("CY1".to_string());
        assert!(!ruled_out_by_serial(&selector, &HashMap::new()));
    }
}
