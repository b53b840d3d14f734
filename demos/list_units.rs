use ancpi_scraper::{AncpiClient, PortalConfig};

#[tokio::main]
async fn main() {
    // Logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // e.g. cargo run --example list_units -- CJ
    let county = std::env::args().nth(1).unwrap_or_else(|| "ALBA".to_string());

    let config = PortalConfig::from_env().expect("invalid portal configuration");
    let client = AncpiClient::new(config);

    let outcome = client.list_units(&county).await;
    println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
}
