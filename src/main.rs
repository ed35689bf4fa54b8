use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use catalog_admin::api::{CatalogApi, CatalogBackend};
use catalog_admin::auth::{AuthSession, CredentialStore, MemoryCredentialStore, SessionEvent};
use catalog_admin::config::{ApiConfig, token_from_env};
use catalog_admin::list::ProductList;
use catalog_admin::models::{ListQuery, SortDirection, SortField};

const CONFIG_PATH: &str = "catalog.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    // A local config file wins over plain env so setups can pin headers.
    let config = if Path::new(CONFIG_PATH).exists() {
        ApiConfig::from_file(CONFIG_PATH)?
    } else {
        ApiConfig::from_env()
            .with_context(|| format!("No {} found and environment is incomplete", CONFIG_PATH))?
    };

    info!("Using catalog API at {}", config.api.base_url);

    let credentials = Arc::new(MemoryCredentialStore::new());
    if let Some(token) = token_from_env() {
        credentials.set_token(&token);
    }

    let session = Arc::new(AuthSession::new(credentials));
    let mut signouts = session.subscribe();

    let api = Arc::new(CatalogApi::new(config.clone(), session.clone())?);

    let outcome = run_command(&args, &config, &api).await;

    // A 401 anywhere ends the session globally; tell the user before the
    // command's own error surfaces.
    if let Ok(SessionEvent::SignedOut) = signouts.try_recv() {
        warn!("The backend rejected the stored credentials; run `login` again");
    }

    outcome
}

async fn run_command(args: &[String], config: &ApiConfig, api: &Arc<CatalogApi>) -> Result<()> {
    match args[1].as_str() {
        "login" => {
            if args.len() < 4 {
                bail!("Usage: catalog-admin login <username> <password>");
            }
            api.authenticate(&args[2], &args[3]).await?;
            info!("✅ Signed in; token stored for this process");
            Ok(())
        }
        "list" => {
            let query = parse_list_args(&args[2..], config.list.default_page_size)?;
            let list = ProductList::with_query(api.clone(), query);
            list.refresh().await?;

            let products = list.products();
            for product in &products {
                println!(
                    "{:>6}  {:<32} {:<20} stock: {}",
                    product.id,
                    product.name.as_deref().unwrap_or("-"),
                    product.product_category_label.as_deref().unwrap_or("-"),
                    product
                        .qte_in_stock
                        .map(|q| q.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }

            let committed = list.query();
            info!(
                "📦 {} products on page {} (size {})",
                products.len(),
                committed.page,
                committed.page_size
            );
            Ok(())
        }
        "show" => {
            if args.len() < 3 {
                bail!("Usage: catalog-admin show <id>");
            }
            let id: i64 = args[2]
                .parse()
                .with_context(|| format!("Invalid product id: {}", args[2]))?;
            let product = api.product(id).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }
}

fn parse_list_args(args: &[String], default_page_size: u32) -> Result<ListQuery> {
    let mut query = ListQuery::with_page_size(default_page_size);

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--page" => {
                query.page = flag_value(args, i, "--page")?.parse()?;
                i += 2;
            }
            "--page-size" => {
                query.page_size = flag_value(args, i, "--page-size")?.parse()?;
                i += 2;
            }
            "--sort" => {
                query.sort = Some(parse_sort(flag_value(args, i, "--sort")?)?);
                i += 2;
            }
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            term => {
                query.search = term.to_string();
                i += 1;
            }
        }
    }

    Ok(query)
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str> {
    args.get(index + 1)
        .map(|s| s.as_str())
        .with_context(|| format!("{} needs a value", flag))
}

fn parse_sort(value: &str) -> Result<(SortField, SortDirection)> {
    let (field, direction) = value
        .split_once(':')
        .with_context(|| format!("Sort must look like field:asc or field:desc, got {}", value))?;

    let field = SortField::from_param(field)
        .with_context(|| format!("Unknown sort field: {}", field))?;
    let direction = SortDirection::from_param(direction)
        .with_context(|| format!("Unknown sort direction: {}", direction))?;

    Ok((field, direction))
}

fn print_usage() {
    println!("Usage: catalog-admin <command>");
    println!();
    println!("Commands:");
    println!("  login <username> <password>");
    println!("  list [search] [--page N] [--page-size N] [--sort field:asc|desc]");
    println!("  show <id>");
    println!();
    println!("Sortable fields: id, name, preferName, barcode, productCategoryLabel, brandName, createdAt");
}
