use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;
use wreq::{Client, RequestBuilder, Response};
use wreq_util::Emulation;

use crate::api::{ApiError, CatalogBackend};
use crate::auth::AuthSession;
use crate::config::ApiConfig;
use crate::models::{
    AuthResponse, CreateProductPayload, ListQuery, PersistedProduct, ReferenceItem,
    UpdateProductPayload,
};

/// HTTP client for the catalog backend. Every request carries the static
/// headers from the config plus the bearer token from the credential
/// store; a 401 from any endpoint signs the session out before the error
/// reaches the caller.
pub struct CatalogApi {
    client: Client,
    config: ApiConfig,
    session: Arc<AuthSession>,
}

impl CatalogApi {
    pub fn new(config: ApiConfig, session: Arc<AuthSession>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .emulation(Emulation::Firefox139)
            .build()?;

        Ok(CatalogApi {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// `POST /Accounts/authenticate`; the returned token is stored in the
    /// credential store so subsequent requests pick it up.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let request = self
            .client
            .post(self.config.endpoint("/Accounts/authenticate"))
            .json(&body);
        let response = self.execute(self.with_headers(request)).await?;
        let auth: AuthResponse = response.json().await?;

        self.session.sign_in(&auth.token);
        Ok(auth.token)
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request
            .header("Content-Type", "application/json")
            .header("Language", &self.config.headers.language)
            .header("storeId", &self.config.headers.store_id)
            .header("ratio", &self.config.headers.ratio);

        if let Some(token) = self.session.token() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() == 401 {
            self.session.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.config.endpoint(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.execute(self.with_headers(request)).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Query parameters for `GET /products`. Empty search terms and absent
/// sorts are omitted entirely rather than sent as empty values.
pub fn list_query_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    let (start, end) = query.offsets();
    let mut params = Vec::new();

    if !query.search.is_empty() {
        params.push(("search", query.search.clone()));
    }
    params.push(("_start", start.to_string()));
    params.push(("_end", end.to_string()));

    if let Some((field, direction)) = query.sort {
        params.push(("_sort", field.as_param().to_string()));
        params.push(("_order", direction.as_param().to_string()));
    }

    params
}

#[async_trait]
impl CatalogBackend for CatalogApi {
    async fn categories(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        self.get_json("/ProductCategories", &[]).await
    }

    async fn brands(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        self.get_json("/brands", &[]).await
    }

    async fn stores(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        self.get_json("/stores", &[]).await
    }

    async fn list_products(&self, query: &ListQuery) -> Result<Vec<PersistedProduct>, ApiError> {
        let params = list_query_params(query);
        info!(
            "Fetching products page {} (size {}) search={:?}",
            query.page, query.page_size, query.search
        );
        self.get_json("/products", &params).await
    }

    async fn product(&self, id: i64) -> Result<PersistedProduct, ApiError> {
        self.get_json(&format!("/products/{}", id), &[]).await
    }

    async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<PersistedProduct, ApiError> {
        let request = self
            .client
            .post(self.config.endpoint("/products"))
            .json(payload);
        let response = self.execute(self.with_headers(request)).await?;
        Ok(response.json().await?)
    }

    async fn update_product(
        &self,
        id: i64,
        payload: &UpdateProductPayload,
    ) -> Result<PersistedProduct, ApiError> {
        let request = self
            .client
            .put(self.config.endpoint(&format!("/products/{}", id)))
            .json(payload);
        let response = self.execute(self.with_headers(request)).await?;
        Ok(response.json().await?)
    }
}
