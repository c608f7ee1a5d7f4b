pub(crate) mod args;
pub(crate) mod codec;
pub(crate) mod commands;
pub(crate) mod error;
pub(crate) mod model;
pub(crate) mod monitor;
pub(crate) mod profile;
pub(crate) mod services;
pub(crate) mod session;
