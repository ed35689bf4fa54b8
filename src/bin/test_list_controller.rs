use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use catalog_admin::api::{ApiError, CatalogBackend};
use catalog_admin::list::{FetchOutcome, ProductList};
use catalog_admin::models::{
    CreateProductPayload, ListQuery, PersistedProduct, ReferenceItem, UpdateProductPayload,
};

/// In-process backend that answers each list call after a scripted delay,
/// tagging rows with the call number. Lets us watch the controller
/// discard a slow stale response without any server.
struct ScriptedBackend {
    delays: Mutex<VecDeque<Duration>>,
    calls: Mutex<u64>,
}

#[async_trait]
impl CatalogBackend for ScriptedBackend {
    async fn categories(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        Ok(Vec::new())
    }

    async fn brands(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        Ok(Vec::new())
    }

    async fn stores(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_products(&self, query: &ListQuery) -> Result<Vec<PersistedProduct>, ApiError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        let delay = self
            .delays
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Duration::ZERO);

        println!(
            "  -> call {} (search={:?}, page={}) will answer in {:?}",
            call, query.search, query.page, delay
        );
        tokio::time::sleep(delay).await;

        Ok(vec![PersistedProduct {
            id: call as i64,
            name: Some(format!("response of call {}", call)),
            ..Default::default()
        }])
    }

    async fn product(&self, _id: i64) -> Result<PersistedProduct, ApiError> {
        Ok(PersistedProduct::default())
    }

    async fn create_product(
        &self,
        _payload: &CreateProductPayload,
    ) -> Result<PersistedProduct, ApiError> {
        Ok(PersistedProduct::default())
    }

    async fn update_product(
        &self,
        _id: i64,
        _payload: &UpdateProductPayload,
    ) -> Result<PersistedProduct, ApiError> {
        Ok(PersistedProduct::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== LIST CONTROLLER STALE-RESPONSE TEST ===\n");

    let backend = Arc::new(ScriptedBackend {
        delays: Mutex::new(VecDeque::from([
            Duration::from_millis(400),
            Duration::from_millis(50),
        ])),
        calls: Mutex::new(0),
    });

    let list = ProductList::new(backend.clone());

    println!("Issuing a slow search, then a fast page change 100ms later...");
    let (first, second) = tokio::join!(list.set_search("slow"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        list.set_page(2, 10).await
    });

    let first = first?;
    let second = second?;

    println!("\nFirst trigger outcome:  {:?}", first);
    println!("Second trigger outcome: {:?}", second);

    let rows = list.products();
    println!(
        "Displayed rows: {:?}",
        rows.iter().map(|p| p.id).collect::<Vec<_>>()
    );
    println!("Committed query: {:?}\n", list.query());

    let ok = first == FetchOutcome::Superseded
        && second == FetchOutcome::Committed
        && rows.len() == 1
        && rows[0].id == 2
        && list.query().page == 2
        && list.query().search == "slow";

    if ok {
        println!("✅ Stale response was discarded; last-issued query won");
    } else {
        println!("❌ Controller committed the wrong response");
    }

    Ok(())
}
