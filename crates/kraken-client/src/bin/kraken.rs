//! Command-line probe for a Kraken access token.
//!
//! Reads the client settings from the environment (see `ClientConfig::from_env`)
//! and the token from `KRAKEN_ACCESS_TOKEN`, then prints the requested
//! resource as JSON.
//!
//! ```text
//! kraken-probe user
//! kraken-probe followers [offset] [limit]
//! kraken-probe following [offset] [limit]
//! kraken-probe videos [offset] [limit]
//! kraken-probe video <id>
//! ```

use anyhow::{Context, bail};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kraken_client::{BroadcastType, ClientConfig, Kraken, Page};

fn page_from(args: &[String]) -> anyhow::Result<Page> {
    let mut page = Page::default();
    if let Some(offset) = args.first() {
        page.offset = offset.parse().context("offset must be a number")?;
    }
    if let Some(limit) = args.get(1) {
        page.limit = limit.parse().context("limit must be a number")?;
    }
    Ok(page)
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!("usage: kraken-probe <user|followers|following|videos|video> [args]");
    };

    let config = ClientConfig::from_env();
    if config.client_id.is_empty() {
        bail!("TWITCH_CLIENT_ID is not set");
    }
    tracing::info!(base_url = %config.base_url, version = %config.version, "Starting probe");
    let kraken = Kraken::new(config)?;

    if command == "video" {
        let id = args.get(1).context("video id required")?;
        return print(&kraken.retrieve_video(id).await?);
    }

    let token = std::env::var("KRAKEN_ACCESS_TOKEN").context("KRAKEN_ACCESS_TOKEN is not set")?;
    let session = kraken.authenticate(&token).await?;

    match command {
        "user" => print(&session.retrieve_user().await?),
        "followers" => print(&session.retrieve_followers(page_from(&args[1..])?).await?),
        "following" => print(&session.retrieve_following(page_from(&args[1..])?).await?),
        "videos" => print(
            &session
                .retrieve_followed_videos(page_from(&args[1..])?, &[BroadcastType::Archive])
                .await?,
        ),
        other => bail!("unknown command: {other}"),
    }
}
