use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as the backend stores and returns it. Field names follow the
/// wire schema (camelCase); everything the server may omit is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedProduct {
    pub id: i64,
    pub store_product_id: i64,
    pub barcode: Option<String>,

    pub name: Option<String>,
    pub prefer_name: Option<String>,

    pub short_description: Option<String>,

    pub product_measure: Option<String>,
    pub one_measure: Option<String>,
    pub small_measure: Option<String>,
    pub one_contains: Option<u32>,
    pub weight_in_kg: Option<f64>,

    pub product_category_id: Option<i64>,
    pub product_category_label: Option<String>,

    pub brand_id: Option<i64>,
    pub brand_name: Option<String>,

    pub store_id: Option<i64>,

    pub mc_purchase_price: Option<f64>,
    pub mc_sell_price: Option<f64>,
    pub mc_small_measure_sell_price: Option<f64>,

    pub qte_in_stock: Option<f64>,
    pub alert_qte: Option<f64>,

    pub production_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,

    pub attachment_file_name: Option<String>,
}

/// Body of a successful `POST /Accounts/authenticate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
}

/// Element of the category/brand/store lookup lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceItem {
    pub id: i64,
    pub name: String,
}

/// The form-facing representation of a product being created or edited.
/// Names and shapes deliberately diverge from the wire schema
/// (`preferred_name` vs `preferName`, `initial_qte` vs `qteInStock`);
/// `mapper::field_mapper` owns the translation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub preferred_name: String,

    pub product_category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub store_id: Option<i64>,

    pub one_measure: String,
    pub small_measure: String,
    pub one_contains: u32,

    pub mc_purchase_price: f64,
    pub mc_sell_price: f64,
    pub mc_small_measure_sell_price: f64,

    pub initial_qte: f64,
    pub alert_qte: f64,

    pub attachment: Option<String>,
    pub attachment_file_name: Option<String>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            preferred_name: String::new(),
            product_category_id: None,
            brand_id: None,
            store_id: None,
            one_measure: String::new(),
            small_measure: String::new(),
            one_contains: 1,
            mc_purchase_price: 0.0,
            mc_sell_price: 0.0,
            mc_small_measure_sell_price: 0.0,
            initial_qte: 0.0,
            alert_qte: 0.0,
            attachment: None,
            attachment_file_name: None,
        }
    }
}

/// Body of `POST /products`. Attachment fields are omitted from the JSON
/// entirely when no file was selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub name: String,
    pub prefer_name: String,
    pub product_category_id: i64,
    pub brand_id: i64,
    pub store_id: i64,
    pub one_measure: String,
    pub small_measure: String,
    pub one_contains: u32,
    pub mc_purchase_price: f64,
    pub mc_sell_price: f64,
    pub mc_small_measure_sell_price: f64,
    pub initial_qte: f64,
    pub alert_qte: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_file_name: Option<String>,
}

/// Body of `PUT /products/{id}`. The backend expects every field on every
/// update, including the commercial fields the UI treats as read-only;
/// attachment fields are sent as explicit nulls when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub name: String,
    pub prefer_name: String,
    pub product_category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub store_id: Option<i64>,
    pub one_measure: String,
    pub small_measure: String,
    pub one_contains: u32,
    pub mc_purchase_price: f64,
    pub mc_sell_price: f64,
    pub mc_small_measure_sell_price: f64,
    pub initial_qte: f64,
    pub alert_qte: f64,
    pub attachment: Option<String>,
    pub attachment_file_name: Option<String>,
}

/// Columns the product table can be sorted by server-side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Name,
    PreferName,
    Barcode,
    ProductCategoryLabel,
    BrandName,
    CreatedAt,
}

impl SortField {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "id" => Some(SortField::Id),
            "name" => Some(SortField::Name),
            "preferName" => Some(SortField::PreferName),
            "barcode" => Some(SortField::Barcode),
            "productCategoryLabel" => Some(SortField::ProductCategoryLabel),
            "brandName" => Some(SortField::BrandName),
            "createdAt" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::PreferName => "preferName",
            SortField::Barcode => "barcode",
            SortField::ProductCategoryLabel => "productCategoryLabel",
            SortField::BrandName => "brandName",
            SortField::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Canonical query state for the product list. The sort field and
/// direction live in a single `Option` pair, so one cannot be present
/// without the other.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<(SortField, SortDirection)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: 10,
            sort: None,
        }
    }
}

impl ListQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Half-open `[_start, _end)` window for the current page.
    pub fn offsets(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let size = self.page_size.max(1) as u64;
        let start = (page - 1) * size;
        (start, start + size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert!(query.search.is_empty());
        assert!(query.sort.is_none());
    }

    #[test]
    fn test_offsets() {
        let query = ListQuery {
            page: 2,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offsets(), (10, 20));

        let first = ListQuery::default();
        assert_eq!(first.offsets(), (0, 10));

        // Degenerate sizes clamp instead of wrapping
        let clamped = ListQuery {
            page: 0,
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(clamped.offsets(), (0, 1));
    }

    #[test]
    fn test_sort_param_round_trip() {
        for field in [
            SortField::Id,
            SortField::Name,
            SortField::PreferName,
            SortField::Barcode,
            SortField::ProductCategoryLabel,
            SortField::BrandName,
            SortField::CreatedAt,
        ] {
            assert_eq!(SortField::from_param(field.as_param()), Some(field));
        }
        assert!(SortField::from_param("qteInStock").is_none());
        assert_eq!(SortDirection::from_param("desc"), Some(SortDirection::Desc));
        assert!(SortDirection::from_param("descending").is_none());
    }

    #[test]
    fn test_sort_params() {
        assert_eq!(SortField::PreferName.as_param(), "preferName");
        assert_eq!(SortField::ProductCategoryLabel.as_param(), "productCategoryLabel");
        assert_eq!(SortField::CreatedAt.as_param(), "createdAt");
        assert_eq!(SortDirection::Asc.as_param(), "asc");
        assert_eq!(SortDirection::Desc.as_param(), "desc");
    }

    #[test]
    fn test_persisted_product_tolerates_sparse_payloads() {
        let product: PersistedProduct = serde_json::from_str(
            r#"{"id": 7, "name": "Milk", "qteInStock": 42, "mcSellPrice": 9.5}"#,
        )
        .unwrap();

        assert_eq!(product.id, 7);
        assert_eq!(product.name.as_deref(), Some("Milk"));
        assert_eq!(product.qte_in_stock, Some(42.0));
        assert_eq!(product.mc_sell_price, Some(9.5));
        assert!(product.prefer_name.is_none());
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_create_payload_omits_absent_attachment() {
        let payload = CreateProductPayload {
            name: "Milk".to_string(),
            prefer_name: String::new(),
            product_category_id: 1,
            brand_id: 2,
            store_id: 3,
            one_measure: "Box".to_string(),
            small_measure: "Pcs".to_string(),
            one_contains: 12,
            mc_purchase_price: 5.0,
            mc_sell_price: 8.0,
            mc_small_measure_sell_price: 1.0,
            initial_qte: 100.0,
            alert_qte: 10.0,
            attachment: None,
            attachment_file_name: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("attachment").is_none());
        assert!(json.get("attachmentFileName").is_none());
        assert_eq!(json["preferName"], "");
        assert_eq!(json["initialQte"], 100.0);
    }

    #[test]
    fn test_update_payload_sends_explicit_nulls() {
        let payload = UpdateProductPayload {
            name: "Milk".to_string(),
            prefer_name: "Fresh Milk".to_string(),
            product_category_id: Some(1),
            brand_id: None,
            store_id: Some(3),
            one_measure: "Box".to_string(),
            small_measure: "Pcs".to_string(),
            one_contains: 12,
            mc_purchase_price: 5.0,
            mc_sell_price: 8.0,
            mc_small_measure_sell_price: 1.0,
            initial_qte: 42.0,
            alert_qte: 5.0,
            attachment: None,
            attachment_file_name: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["attachment"].is_null());
        assert!(json["attachmentFileName"].is_null());
        assert!(json["brandId"].is_null());
        // stock travels as initialQte on update, never as qteInStock
        assert!(json.get("qteInStock").is_none());
        assert_eq!(json["initialQte"], 42.0);
    }
}
