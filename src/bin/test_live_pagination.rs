use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use catalog_admin::api::{CatalogApi, CatalogBackend};
use catalog_admin::auth::{AuthSession, CredentialStore, MemoryCredentialStore};
use catalog_admin::config::{ApiConfig, token_from_env};
use catalog_admin::models::ListQuery;

const CONFIG_PATH: &str = "catalog.toml";
const MAX_PAGES: u32 = 50;

/// Walks `/products` page by page against a real backend and reports
/// whether the window arithmetic holds up. Needs CATALOG_API_URL (or a
/// catalog.toml) and CATALOG_API_TOKEN.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    println!("=== LIVE PAGINATION TEST ===\n");

    let config = if Path::new(CONFIG_PATH).exists() {
        ApiConfig::from_file(CONFIG_PATH)?
    } else {
        ApiConfig::from_env().context("Set CATALOG_API_URL or provide catalog.toml")?
    };

    let credentials = Arc::new(MemoryCredentialStore::new());
    match token_from_env() {
        Some(token) => credentials.set_token(&token),
        None => println!("⚠️  CATALOG_API_TOKEN not set; expect a 401 sign-out"),
    }

    let session = Arc::new(AuthSession::new(credentials));
    let api = CatalogApi::new(config.clone(), session)?;

    let mut query = ListQuery::with_page_size(config.list.default_page_size);
    let mut total = 0usize;
    let mut short_pages = 0u32;

    loop {
        if query.page > MAX_PAGES {
            println!("Reached page limit ({}), stopping", MAX_PAGES);
            break;
        }

        let (start, end) = query.offsets();
        info!("Fetching page {} (window {}..{})", query.page, start, end);

        let products = api.list_products(&query).await?;
        println!(
            "Page {:>3}: {} products (ids {:?}...)",
            query.page,
            products.len(),
            products.iter().take(3).map(|p| p.id).collect::<Vec<_>>()
        );

        total += products.len();

        if products.is_empty() {
            break;
        }
        if (products.len() as u32) < query.page_size {
            // A short page should be the last one; remember it so a
            // follow-up full page counts as a failure.
            short_pages += 1;
        }

        query.page += 1;
    }

    println!("\n=== SUMMARY ===");
    println!("Total products fetched: {}", total);

    if short_pages <= 1 {
        println!("✅ Pagination windows lined up ({} short page)", short_pages);
    } else {
        println!("❌ {} short pages before the end, window drift?", short_pages);
    }

    Ok(())
}
