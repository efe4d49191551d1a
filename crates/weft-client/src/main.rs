//! Main entry point for the Weft client.
//!
//! Usage: `weft-client [components.json] [channel_id]`. With a component file,
//! the rendered element tree is printed as JSON.

use anyhow::Context;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use weft_client::WeftApp;
use weft_common::{init_logging, ChannelId};
use weft_components::RenderContext;
use weft_config::ConfigLoader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;
    init_logging(config.logging.to_logging_config()).context("Failed to initialize logging")?;

    info!("Starting Weft client");

    let app = WeftApp::from_config(config).await?;
    if let Err(e) = app.start().await {
        error!("Failed to load translations: {}", e);
        return Err(e.into());
    }
    info!("Available languages: {}", app.i18n().options().join(", "));

    let mut args = env::args().skip(1);
    if let Some(path) = args.next().map(PathBuf::from) {
        let channel_id = args
            .next()
            .map(|raw| raw.parse::<ChannelId>())
            .transpose()
            .context("Invalid channel id")?
            .unwrap_or(ChannelId(0));

        let element = app
            .render_file(&path, RenderContext::channel(None, channel_id))
            .await
            .with_context(|| format!("Failed to render {}", path.display()))?;
        println!("{}", serde_json::to_string_pretty(&element)?);
    }

    Ok(())
}
