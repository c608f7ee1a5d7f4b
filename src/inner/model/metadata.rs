use std::fmt::{Display, Formatter};

/// Identity strings read from the metadata service. Fields a device does not
/// expose stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DeviceMetadata {
    pub(crate) id: String,
    pub(crate) model_name: String,
    pub(crate) fw_version: String,
    pub(crate) serial_number: String,
}

impl Display for DeviceMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} SN:{} FW:{} ID:{}",
            self.model_name, self.serial_number, self.fw_version, self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_on_one_line() {
        let metadata = DeviceMetadata {
            id: "00:11:22:33:44:55".to_string(),
            model_name: "Crafty".to_string(),
            fw_version: "V02.43".to_string(),
            serial_number: "CY123456".to_string(),
        };
        assert_eq!(
            metadata.to_string(),
            "Crafty SN:CY123456 FW:V02.43 ID:00:11:22:33:44:55"
        );
    }
}
