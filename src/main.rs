use std::sync::Arc;

use clap::Parser;

use crate::inner::args::AppConf;
use crate::inner::error::CraftyResult;
use crate::inner::session::{self, CraftySession};

mod init;
mod inner;

#[tokio::main]
async fn main() -> CraftyResult<()> {
    init::init_tracing()?;

    let conf = Arc::new(AppConf::parse());
    let selector = conf.target()?;
    let action = conf.action();

    let adapter = session::default_adapter().await?;
    CraftySession::new(adapter, selector, conf).run(action).await
}
