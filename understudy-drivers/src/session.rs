//! Session lifecycle: the one place a `fantoccini::Client` is created or
//! destroyed. Everything in [`crate::interact`] only borrows the handle.
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use tracing::info;
use understudy_common::UnderstudyConfig;
use webdriver::capabilities::Capabilities;

/// Connect to a running WebDriver service and start a Chrome session.
///
/// The endpoint and headless flag come from [`UnderstudyConfig`]; by default
/// this targets a local Chromedriver on port 9515.
pub async fn connect(config: &UnderstudyConfig) -> Result<Client> {
    let mut caps = Capabilities::new();
    let mut chrome_opts = HashMap::new();

    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    chrome_opts.insert("args".to_string(), json!(args));
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

    let client = ClientBuilder::native()
        .capabilities(caps)
        .connect(&config.webdriver_url)
        .await
        .with_context(|| {
            format!(
                "failed to start a session against {}",
                config.webdriver_url
            )
        })?;

    info!(endpoint = %config.webdriver_url, headless = config.headless, "webdriver session started");
    Ok(client)
}

/// Close the underlying browser session.
pub async fn close(client: Client) -> Result<()> {
    client.close().await?;
    Ok(())
}
