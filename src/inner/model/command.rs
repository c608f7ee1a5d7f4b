use crate::inner::error::{CraftyError, CraftyResult};

pub(crate) const MAX_TEMP_CELSIUS: u16 = 210;

/// A validated write request. Constructors reject out-of-range input, so a
/// value carried here is always safe to put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingCommand {
    SetTemperature { celsius: u16 },
    SetBoost { requested: u16, effective: u16 },
    SetChargeIndicator { on: bool },
}

impl PendingCommand {
    pub(crate) fn set_temperature(celsius: i64) -> CraftyResult<Self> {
        if celsius > i64::from(MAX_TEMP_CELSIUS) {
            return Err(CraftyError::Validation(
                "Temperature cannot exceed 210.".to_string(),
            ));
        }
        if celsius < 0 {
            return Err(CraftyError::Validation(
                "Temperature must be positive.".to_string(),
            ));
        }
        Ok(Self::SetTemperature {
            celsius: celsius as u16,
        })
    }

    /// Clamps the offset so that `base + boost` never exceeds the device
    /// maximum. An effective value of 0 means nothing gets written.
    pub(crate) fn set_boost(base_celsius: u16, offset: i64) -> CraftyResult<Self> {
        if offset < 0 {
            return Err(CraftyError::Validation("Boost must be positive.".to_string()));
        }
        let headroom = i64::from(MAX_TEMP_CELSIUS.saturating_sub(base_celsius));
        Ok(Self::SetBoost {
            requested: offset.min(i64::from(u16::MAX)) as u16,
            effective: offset.min(headroom) as u16,
        })
    }

    /// The token is case-sensitive: exactly `ON` or `OFF`.
    pub(crate) fn set_charge_indicator(token: &str) -> CraftyResult<Self> {
        match token {
            "ON" => Ok(Self::SetChargeIndicator { on: true }),
            "OFF" => Ok(Self::SetChargeIndicator { on: false }),
            other => Err(CraftyError::InvalidOption {
                given: other.to_string(),
                subject: "charge indicator",
                expected: "ON or OFF",
            }),
        }
    }

    pub(crate) fn clamped(&self) -> bool {
        match self {
            Self::SetBoost {
                requested,
                effective,
            } => requested != effective,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inner::codec;

    #[test]
    fn temperature_within_range_is_accepted() {
        assert_eq!(
            PendingCommand::set_temperature(0).unwrap(),
            PendingCommand::SetTemperature { celsius: 0 }
        );
        assert_eq!(
            PendingCommand::set_temperature(210).unwrap(),
            PendingCommand::SetTemperature { celsius: 210 }
        );
    }

    #[test]
    fn temperature_above_maximum_is_rejected() {
        let err = PendingCommand::set_temperature(211).unwrap_err();
        assert!(matches!(
            err,
            CraftyError::Validation(message) if message == "Temperature cannot exceed 210."
        ));
    }

    #[test]
    fn negative_temperature_is_rejected() {
        let err = PendingCommand::set_temperature(-1).unwrap_err();
        assert!(matches!(err, CraftyError::Validation(_)));
    }

    #[test]
    fn temperature_wire_payload_is_deci_celsius() {
        let PendingCommand::SetTemperature { celsius } =
            PendingCommand::set_temperature(175).unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(codec::encode_fixed_u16(celsius * 10), [0xD6, 0x06]);
    }

    #[test]
    fn boost_is_clamped_to_the_headroom() {
        let command = PendingCommand::set_boost(200, 30).unwrap();
        assert_eq!(
            command,
            PendingCommand::SetBoost {
                requested: 30,
                effective: 10,
            }
        );
        assert!(command.clamped());

        let PendingCommand::SetBoost { effective, .. } = command else {
            panic!("wrong variant");
        };
        assert_eq!(codec::encode_fixed_u16(effective * 10), [0x64, 0x00]);
    }

    #[test]
    fn boost_within_headroom_stays_as_requested() {
        let command = PendingCommand::set_boost(180, 20).unwrap();
        assert_eq!(
            command,
            PendingCommand::SetBoost {
                requested: 20,
                effective: 20,
            }
        );
        assert!(!command.clamped());
    }

    #[test]
    fn zero_boost_means_no_write() {
        let command = PendingCommand::set_boost(180, 0).unwrap();
        assert_eq!(
            command,
            PendingCommand::SetBoost {
                requested: 0,
                effective: 0,
            }
        );
    }

    #[test]
    fn boost_with_no_headroom_clamps_to_zero() {
        let command = PendingCommand::set_boost(210, 30).unwrap();
        assert_eq!(
            command,
            PendingCommand::SetBoost {
                requested: 30,
                effective: 0,
            }
        );
        assert!(command.clamped());
    }

    #[test]
    fn negative_boost_is_rejected() {
        let err = PendingCommand::set_boost(180, -5).unwrap_err();
        assert!(matches!(
            err,
            CraftyError::Validation(message) if message == "Boost must be positive."
        ));
    }

    #[test]
    fn charge_indicator_tokens_are_case_sensitive() {
        assert_eq!(
            PendingCommand::set_charge_indicator("ON").unwrap(),
            PendingCommand::SetChargeIndicator { on: true }
        );
        assert_eq!(
            PendingCommand::set_charge_indicator("OFF").unwrap(),
            PendingCommand::SetChargeIndicator { on: false }
        );
        for bad in ["on", "off", "On", "1", ""] {
            assert!(matches!(
                PendingCommand::set_charge_indicator(bad),
                Err(CraftyError::InvalidOption { subject: "charge indicator", .. })
            ));
        }
    }
}
