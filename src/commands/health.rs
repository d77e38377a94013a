//! Service health probe command

use crate::client::GuidanceClient;
use crate::config::Config;
use crate::error::Result;

pub async fn run(config: &Config) -> Result<()> {
    let client = GuidanceClient::from_config(config)?;

    match client.health().await {
        Ok(()) => {
            println!("OK — {} is reachable", client.base_url());
            Ok(())
        }
        Err(err) => {
            println!("UNREACHABLE — {}", client.base_url());
            Err(err)
        }
    }
}
