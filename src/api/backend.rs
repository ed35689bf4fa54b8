use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{
    CreateProductPayload, ListQuery, PersistedProduct, ReferenceItem, UpdateProductPayload,
};

/// The REST backend as the rest of the crate sees it. `CatalogApi` is the
/// HTTP implementation; the list controller and form sessions only ever
/// hold this trait, so tests drive them with in-process fakes.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn categories(&self) -> Result<Vec<ReferenceItem>, ApiError>;
    async fn brands(&self) -> Result<Vec<ReferenceItem>, ApiError>;
    async fn stores(&self) -> Result<Vec<ReferenceItem>, ApiError>;

    async fn list_products(&self, query: &ListQuery) -> Result<Vec<PersistedProduct>, ApiError>;
    async fn product(&self, id: i64) -> Result<PersistedProduct, ApiError>;

    async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<PersistedProduct, ApiError>;
    async fn update_product(
        &self,
        id: i64,
        payload: &UpdateProductPayload,
    ) -> Result<PersistedProduct, ApiError>;
}
