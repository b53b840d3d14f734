use ancpi_scraper::{AncpiClient, PortalConfig, RecordQuery};

const COUNTY: &str = "ALBA";
const CITY_NAME: &str = "Alba Iulia";
const RECORD_NUMBER: &str = "100002";
const PAGE_ID: &str = "1";

#[tokio::main]
async fn main() {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter("info,ancpi_scraper=debug")
        .init();

    // Overridable via ANCPI_BASE_URL / ANCPI_TIMEOUT_SECS
    let config = PortalConfig::from_env().expect("invalid portal configuration");
    let client = AncpiClient::new(config);

    println!("=== ANCPI Default Search ===");

    // Resolve the city lid from the unit list
    let units = match client.list_units(COUNTY).await.into_result() {
        Ok(units) => units,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return;
        }
    };
    let Some(city) = units.find_city(CITY_NAME) else {
        eprintln!("❌ Error: {} not found in {}", CITY_NAME, COUNTY);
        return;
    };

    let query =
        RecordQuery::new(COUNTY, CITY_NAME, &city.value, RECORD_NUMBER).with_page_id(PAGE_ID);
    let outcome = client.query_record(&query).await;

    match outcome.error() {
        None => {
            println!("✅ Response:");
            println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        }
        Some(e) => eprintln!("❌ Error: {}", e),
    }
}
