use resilient_fetch::{FetchClient, LoadState, RequestOptions};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogItem {
    name: String,
    slug: String,
    #[serde(default)]
    enabled: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = FetchClient::from_env().map_err(anyhow::Error::msg)?;
    let path = std::env::args().nth(1).unwrap_or_else(|| "/services".to_owned());

    let state = client
        .load::<Vec<CatalogItem>>(&path, RequestOptions::get().with_retries(2, 1_000))
        .await;

    match state {
        LoadState::Success(items) => {
            for item in items {
                let availability = if item.enabled { "available" } else { "coming soon" };
                println!("{:<24} {:<24} {availability}", item.name, item.slug);
            }
        }
        LoadState::Failure(message) => anyhow::bail!("{message}"),
        LoadState::Loading => anyhow::bail!("request did not complete"),
    }

    Ok(())
}
