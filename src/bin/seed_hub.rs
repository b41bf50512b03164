//! Seeds the standard service catalogue, the default pricing region with its
//! rates and the price master for one hub. Running it twice is harmless.
//!
//! Usage: `seed_hub <hub_id>`

use std::env;

use config::Config;
use dotenvy::dotenv;

use pushkind_grounds::db::establish_connection_pool;
use pushkind_grounds::domain::price_entry::{NewPriceEntry, PriceEntryDetails};
use pushkind_grounds::domain::region::{NewCatalogEntry, NewRegion, NewRegionRate};
use pushkind_grounds::domain::types::{
    Amount, CatalogName, HubId, RegionPart, ServiceCategory, ServiceCode, VisitCount,
};
use pushkind_grounds::models::config::ServerConfig;
use pushkind_grounds::repository::errors::RepositoryResult;
use pushkind_grounds::repository::{
    DieselRepository, PriceEntryReader, PriceEntryWriter, RegionWriter,
};

/// `(code, display name, default visits per year, base price per visit)`.
const CATALOG: &[(&str, &str, i32, f64)] = &[
    ("WEED_CONTROL", "Weed Control Spraying", 3, 85.0),
    ("MOWING", "Mowing", 22, 60.0),
    ("BLOWING", "Blowing & Trash Cleanup", 22, 15.0),
    ("FERTILIZER", "Fertilizer", 5, 80.0),
    ("TREE_SHRUB", "Tree & Shrub Care", 2, 120.0),
    ("MULCH", "Mulch", 2, 600.0),
];

/// `(category, frequency, default cost per visit)`.
const PRICE_MASTER: &[(&str, &str, f64)] = &[
    ("Weed Control Spraying", "3 Times / Year", 85.0),
    ("Mowing", "Weekly (22 Visits)", 60.0),
    ("Blowing & Trash Cleanup", "Weekly (22 Visits)", 15.0),
    ("Fertilizer", "5 Times / Year", 80.0),
    ("Tree & Shrub Care", "Twice / Year", 120.0),
    ("Mulch", "Every 6 Months", 600.0),
];

const REGION: (&str, &str, &str) = ("TX", "Frisco", "Small Industrial");
const RATE_MIN_SQFT: i32 = 0;
const RATE_MAX_SQFT: i32 = 8000;

#[derive(Debug, Default, PartialEq, Eq)]
struct SeedReport {
    catalog_entries: usize,
    rates: usize,
    price_entries_created: usize,
}

fn seed_hub<R>(repo: &R, hub_id: HubId) -> RepositoryResult<SeedReport>
where
    R: RegionWriter + PriceEntryReader + PriceEntryWriter,
{
    let mut report = SeedReport::default();

    for (code, name, times, _) in CATALOG {
        repo.upsert_catalog_entry(&NewCatalogEntry {
            hub_id,
            code: ServiceCode::new(*code)?,
            display_name: CatalogName::new(*name)?,
            default_times_per_year: VisitCount::new(*times)?,
        })?;
        report.catalog_entries += 1;
    }

    let (state, city, property_type) = REGION;
    let region = repo.create_region(&NewRegion {
        hub_id,
        state: RegionPart::new(state)?,
        city: RegionPart::new(city)?,
        property_type: RegionPart::new(property_type)?,
        labor_factor: 1.0,
        material_factor: 1.0,
    })?;
    log::info!("Seeding region {} (#{})", region.label(), region.id);

    for (code, _, _, price) in CATALOG {
        repo.upsert_region_rate(&NewRegionRate {
            region_id: region.id,
            service_code: ServiceCode::new(*code)?,
            base_price_per_visit: Amount::new(*price)?,
            min_sqft: Some(RATE_MIN_SQFT),
            max_sqft: Some(RATE_MAX_SQFT),
            active: true,
        })?;
        report.rates += 1;
    }

    for (category, frequency, cost) in PRICE_MASTER {
        let category = ServiceCategory::new(*category)?;
        if repo
            .find_price_entry(hub_id, &category, frequency)?
            .is_some()
        {
            continue;
        }
        repo.create_price_entry(&NewPriceEntry {
            hub_id,
            details: PriceEntryDetails {
                category,
                frequency: frequency.to_string(),
                default_cost: Amount::new(*cost)?,
                notes: None,
            },
        })?;
        report.price_entries_created += 1;
    }

    Ok(report)
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let hub_id = match env::args().nth(1).map(|arg| arg.parse::<i32>()) {
        Some(Ok(value)) => match HubId::new(value) {
            Ok(hub_id) => hub_id,
            Err(err) => {
                log::error!("Invalid hub id {value}: {err}");
                std::process::exit(2);
            }
        },
        _ => {
            log::error!("Usage: seed_hub <hub_id>");
            std::process::exit(2);
        }
    };

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let server_config = match settings.and_then(|s| s.try_deserialize::<ServerConfig>()) {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(
        &server_config.database_url,
        &server_config.database,
    ) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match seed_hub(&repo, hub_id) {
        Ok(report) => log::info!(
            "Hub {hub_id} seeded: {} catalogue entries, {} rates, {} new price entries",
            report.catalog_entries,
            report.rates,
            report.price_entries_created
        ),
        Err(err) => {
            log::error!("Failed to seed hub {hub_id}: {err}");
            std::process::exit(1);
        }
    }
}
