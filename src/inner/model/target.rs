use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use btleplug::api::BDAddr;
use uuid::Uuid;

use crate::inner::codec;
use crate::inner::profile;

/// How the wanted device is recognized among scan results.
#[derive(Debug, Clone)]
pub(crate) enum TargetSelector {
    /// Exact peripheral address, compared case-insensitively.
    Address(String),
    /// Prefix of the serial number advertised in service data.
    SerialPrefix(String),
}

impl TargetSelector {
    pub(crate) fn matches_address(&self, address: BDAddr) -> bool {
        match self {
            Self::Address(wanted) => address.to_string().eq_ignore_ascii_case(wanted),
            Self::SerialPrefix(_) => false,
        }
    }

    /// Returns the advertised serial when it satisfies a serial-prefix
    /// selector. Serials shorter than the prefix never match.
    pub(crate) fn match_service_data(
        &self,
        service_data: &HashMap<Uuid, Vec<u8>>,
    ) -> Option<String> {
        let Self::SerialPrefix(prefix) = self else {
            return None;
        };
        let payload = service_data.get(&profile::SERIAL_SERVICE_DATA)?;
        let serial = codec::decode_text(payload);
        serial.starts_with(prefix.as_str()).then_some(serial)
    }

    pub(crate) fn matches_serial(&self, serial: &str) -> bool {
        match self {
            Self::SerialPrefix(prefix) => serial.starts_with(prefix.as_str()),
            Self::Address(_) => true,
        }
    }
}

impl Display for TargetSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(address) => write!(f, "address {address}"),
            Self::SerialPrefix(prefix) => write!(f, "serial {prefix}*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advert(serial: &[u8]) -> HashMap<Uuid, Vec<u8>> {
        HashMap::from([(profile::SERIAL_SERVICE_DATA, serial.to_vec())])
    }

    #[test]
    fn serial_prefix_matches_advertised_serial() {
        let selector = TargetSelector::SerialPrefix("CY12345".to_string());
        assert_eq!(
            selector.match_service_data(&advert(b"CY123456")),
            Some("CY123456".to_string())
        );
    }

    #[test]
    fn short_serial_prefix_matches() {
        let selector = TargetSelector::SerialPrefix("CY1".to_string());
        assert_eq!(
            selector.match_service_data(&advert(b"CY123456")),
            Some("CY123456".to_string())
        );
    }

    #[test]
    fn advertised_serial_shorter_than_the_prefix_does_not_match() {
        let selector = TargetSelector::SerialPrefix("CY123456".to_string());
        // NUL padding cuts the decoded serial short.
        assert_eq!(selector.match_service_data(&advert(b"CY12345\0")), None);
    }

    #[test]
    fn unrelated_service_data_does_not_match() {
        let selector = TargetSelector::SerialPrefix("CY12345".to_string());
        let data = HashMap::from([(profile::META_SERVICE, b"CY123456".to_vec())]);
        assert_eq!(selector.match_service_data(&data), None);
    }

    #[test]
    fn address_selector_ignores_service_data() {
        let selector = TargetSelector::Address("00:11:22:33:44:55".to_string());
        assert_eq!(selector.match_service_data(&advert(b"CY123456")), None);
    }

    #[test]
    fn address_matching_is_case_insensitive() {
        let selector = TargetSelector::Address("aa:bb:cc:dd:ee:ff".to_string());
        let address = BDAddr::from([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert!(selector.matches_address(address));

        let other = BDAddr::from([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x00]);
        assert!(!selector.matches_address(other));
    }

    #[test]
    fn serial_prefix_selector_never_matches_by_address() {
        let selector = TargetSelector::SerialPrefix("CY12345".to_string());
        assert!(!selector.matches_address(BDAddr::from([0, 1, 2, 3, 4, 5])));
    }

    #[test]
    fn serial_verification_uses_prefix_matching() {
        let selector = TargetSelector::SerialPrefix("CY12345".to_string());
        assert!(selector.matches_serial("CY123456"));
        assert!(!selector.matches_serial("CY999999"));
        assert!(!selector.matches_serial("CY1234"));
    }
}
