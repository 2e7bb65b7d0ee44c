use tracing_subscriber::EnvFilter;
use vitrine_slideshow::{HttpSlideFetcher, PlayerConfig, Runtime};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let base_url =
        std::env::var("SLIDESHOW_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    tracing::info!(base_url = %base_url, "Starting slideshow player");

    let fetcher = HttpSlideFetcher::new(&base_url)?;
    Runtime::new(fetcher, PlayerConfig::default()).run().await
}
