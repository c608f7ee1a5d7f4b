use uuid::Uuid;

use crate::inner::codec::CodecError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CraftyError {
    #[error("Bluetooth transport error: {0}")]
    Transport(#[from] btleplug::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Characteristic {name} [{uuid}] is not present on this device")]
    CharacteristicNotFound { name: &'static str, uuid: Uuid },

    #[error("Service {name} [{uuid}] is not present on this device")]
    ServiceNotFound { name: &'static str, uuid: Uuid },

    #[error("{0}")]
    Validation(String),

    #[error("Unrecognized option [{given}] for {subject}. Must be {expected}.")]
    InvalidOption {
        given: String,
        subject: &'static str,
        expected: &'static str,
    },

    #[error("Connected device [{actual}] does not match the requested target [{expected}]")]
    IdentityMismatch { expected: String, actual: String },

    #[error("Unknown profile identifier: {0}")]
    UnknownIdentifier(String),

    #[error("No Bluetooth adapter found")]
    AdapterNotFound,

    #[error("No matching device found before the scan timed out")]
    ScanTimedOut,

    #[error("Operation timed out: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("IoError: {0:?}")]
    IoError(#[from] std::io::Error),

    #[error("Event stream ended unexpectedly")]
    EndOfStream,

    #[error("Error: {0:?}")]
    AnyError(#[from] anyhow::Error),
}

pub(crate) type CraftyResult<T> = Result<T, CraftyError>;
