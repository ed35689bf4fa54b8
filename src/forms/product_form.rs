//! Create/edit form sessions. Each session owns its draft exclusively;
//! nothing here is shared between forms.

use std::sync::Arc;

use futures::join;
use thiserror::Error;
use tracing::warn;

use crate::api::{ApiError, CatalogBackend};
use crate::mapper::{create_payload, draft_from_persisted, update_payload};
use crate::models::{PersistedProduct, ProductDraft, ReferenceItem};

/// The three lookup lists behind the category/brand/store selectors,
/// fetched once per form session.
#[derive(Debug, Default, Clone)]
pub struct ReferenceLists {
    pub categories: Vec<ReferenceItem>,
    pub brands: Vec<ReferenceItem>,
    pub stores: Vec<ReferenceItem>,
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fetch the three reference lists concurrently. A failed list resolves
/// to an empty selector without blocking the rest of the form.
pub async fn load_reference_lists(backend: &dyn CatalogBackend) -> ReferenceLists {
    fn or_empty(
        result: Result<Vec<ReferenceItem>, ApiError>,
        what: &str,
    ) -> Vec<ReferenceItem> {
        result.unwrap_or_else(|err| {
            warn!("Failed to load {}: {}", what, err);
            Vec::new()
        })
    }

    let (categories, brands, stores) =
        join!(backend.categories(), backend.brands(), backend.stores());

    ReferenceLists {
        categories: or_empty(categories, "categories"),
        brands: or_empty(brands, "brands"),
        stores: or_empty(stores, "stores"),
    }
}

/// Client-side required-field and shape checks. The commercial numbers
/// are only constrained on create; on edit they are read-only and get
/// replaced from the loaded record at payload time anyway.
pub fn validate_draft(draft: &ProductDraft, is_edit: bool) -> Result<(), FormError> {
    let mut problems = Vec::new();

    if draft.name.trim().is_empty() {
        problems.push("name is required".to_string());
    }
    if draft.product_category_id.is_none() {
        problems.push("category is required".to_string());
    }
    if draft.brand_id.is_none() {
        problems.push("brand is required".to_string());
    }
    if draft.store_id.is_none() {
        problems.push("store is required".to_string());
    }
    if draft.one_measure.trim().is_empty() {
        problems.push("main unit is required".to_string());
    }
    if draft.one_contains < 1 {
        problems.push("units per main unit must be at least 1".to_string());
    }

    if !is_edit {
        let quantities = [
            ("purchase price", draft.mc_purchase_price),
            ("sell price", draft.mc_sell_price),
            ("small measure sell price", draft.mc_small_measure_sell_price),
            ("initial quantity", draft.initial_qte),
            ("alert quantity", draft.alert_qte),
        ];
        for (label, value) in quantities {
            if value < 0.0 {
                problems.push(format!("{} must be non-negative", label));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(FormError::Validation(problems))
    }
}

/// Session behind the "create product" page.
pub struct CreateProduct {
    backend: Arc<dyn CatalogBackend>,
    pub refs: ReferenceLists,
    pub draft: ProductDraft,
}

impl CreateProduct {
    pub async fn start(backend: Arc<dyn CatalogBackend>) -> Self {
        let refs = load_reference_lists(backend.as_ref()).await;
        Self {
            backend,
            refs,
            draft: ProductDraft::default(),
        }
    }

    pub async fn submit(&self) -> Result<PersistedProduct, FormError> {
        validate_draft(&self.draft, false)?;
        let payload = create_payload(&self.draft);
        Ok(self.backend.create_product(&payload).await?)
    }
}

/// Session behind the "edit product" page. Keeps the loaded record around
/// for the lifetime of the form: the update payload pulls the read-only
/// commercial fields from it on every submit.
pub struct EditProduct {
    backend: Arc<dyn CatalogBackend>,
    pub refs: ReferenceLists,
    loaded: PersistedProduct,
    pub draft: ProductDraft,
}

impl EditProduct {
    pub async fn load(backend: Arc<dyn CatalogBackend>, id: i64) -> Result<Self, FormError> {
        let loaded = backend.product(id).await?;
        let refs = load_reference_lists(backend.as_ref()).await;
        let draft = draft_from_persisted(&loaded);

        Ok(Self {
            backend,
            refs,
            loaded,
            draft,
        })
    }

    pub fn loaded(&self) -> &PersistedProduct {
        &self.loaded
    }

    pub async fn submit(&self) -> Result<PersistedProduct, FormError> {
        validate_draft(&self.draft, true)?;
        let payload = update_payload(&self.draft, &self.loaded);
        Ok(self.backend.update_product(self.loaded.id, &payload).await?)
    }
}
