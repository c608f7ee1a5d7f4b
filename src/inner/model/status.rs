use std::fmt::{Display, Formatter};

/// A fixed-point value in tenths of a unit, rendered with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Deci(pub(crate) u16);

impl Display for Deci {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Live state read from the data service. Temperatures are kept in deci-°C
/// as the device reports them; battery and LED are whole percent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DeviceStatus {
    pub(crate) id: String,
    pub(crate) current_temp_deci: u16,
    pub(crate) setpoint_deci: u16,
    pub(crate) boost_deci: u16,
    pub(crate) battery_pct: u16,
    pub(crate) led_pct: u16,
}

impl DeviceStatus {
    pub(crate) fn current_temp(&self) -> Deci {
        Deci(self.current_temp_deci)
    }

    pub(crate) fn setpoint(&self) -> Deci {
        Deci(self.setpoint_deci)
    }

    pub(crate) fn boost(&self) -> Deci {
        Deci(self.boost_deci)
    }

    /// Whole °C of the setpoint, the base a boost offset is applied to.
    pub(crate) fn setpoint_celsius(&self) -> u16 {
        self.setpoint_deci / 10
    }
}

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Current Temp: {} C", self.current_temp())?;
        writeln!(f, "Setpoint: {} C", self.setpoint())?;
        writeln!(f, "Boost: +{} C", self.boost())?;
        writeln!(f, "Battery level: {}%", self.battery_pct)?;
        write!(f, "LED brightness: {}%", self.led_pct)
    }
}
