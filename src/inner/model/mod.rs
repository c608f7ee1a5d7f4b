pub(crate) mod command;
pub(crate) mod metadata;
pub(crate) mod status;
pub(crate) mod target;
