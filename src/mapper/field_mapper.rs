//! Translation between the wire schema and the form schema.
//!
//! The backend and the form disagree on names and shapes: the wire says
//! `preferName` where the form says `preferred_name`, and the stock count
//! arrives as `qteInStock` but is always submitted as `initialQte`. All
//! of those renames and the numeric defaults live here, in one place, so
//! the read and write directions stay inverse on the fields that are
//! supposed to round-trip.

use crate::models::{CreateProductPayload, PersistedProduct, ProductDraft, UpdateProductPayload};

/// Read direction: pre-populate the edit form from a loaded record.
///
/// The "initial quantity" shown on edit is the *current* stock
/// (`qteInStock`); the form renders it read-only.
pub fn draft_from_persisted(product: &PersistedProduct) -> ProductDraft {
    ProductDraft {
        name: product.name.clone().unwrap_or_default(),
        preferred_name: product.prefer_name.clone().unwrap_or_default(),

        product_category_id: product.product_category_id,
        brand_id: product.brand_id,
        store_id: product.store_id,

        one_measure: product.one_measure.clone().unwrap_or_default(),
        small_measure: product.small_measure.clone().unwrap_or_default(),
        one_contains: product.one_contains.unwrap_or(1),

        mc_purchase_price: product.mc_purchase_price.unwrap_or(0.0),
        mc_sell_price: product.mc_sell_price.unwrap_or(0.0),
        mc_small_measure_sell_price: product.mc_small_measure_sell_price.unwrap_or(0.0),

        initial_qte: product.qte_in_stock.unwrap_or(0.0),
        alert_qte: product.alert_qte.unwrap_or(0.0),

        attachment: None,
        attachment_file_name: product.attachment_file_name.clone(),
    }
}

/// Write direction for `POST /products`: field-for-field from the draft.
/// Callers validate the draft first; missing reference ids map to 0 and
/// will be rejected server-side.
pub fn create_payload(draft: &ProductDraft) -> CreateProductPayload {
    CreateProductPayload {
        name: draft.name.clone(),
        prefer_name: draft.preferred_name.clone(),
        product_category_id: draft.product_category_id.unwrap_or_default(),
        brand_id: draft.brand_id.unwrap_or_default(),
        store_id: draft.store_id.unwrap_or_default(),
        one_measure: draft.one_measure.clone(),
        small_measure: draft.small_measure.clone(),
        one_contains: draft.one_contains.max(1),
        mc_purchase_price: draft.mc_purchase_price,
        mc_sell_price: draft.mc_sell_price,
        mc_small_measure_sell_price: draft.mc_small_measure_sell_price,
        initial_qte: draft.initial_qte,
        alert_qte: draft.alert_qte,
        attachment: draft.attachment.clone(),
        attachment_file_name: draft.attachment_file_name.clone(),
    }
}

/// Write direction for `PUT /products/{id}`.
///
/// The four commercial fields are immutable in the edit UI but must still
/// travel on every update; they are taken from the previously loaded
/// record, never from the draft, so a malformed draft cannot corrupt
/// persisted pricing. `initialQte` comes from the persisted `qteInStock`.
pub fn update_payload(draft: &ProductDraft, loaded: &PersistedProduct) -> UpdateProductPayload {
    UpdateProductPayload {
        name: draft.name.clone(),
        prefer_name: draft.preferred_name.clone(),
        product_category_id: draft.product_category_id,
        brand_id: draft.brand_id,
        store_id: draft.store_id,
        one_measure: draft.one_measure.clone(),
        small_measure: draft.small_measure.clone(),
        one_contains: draft.one_contains.max(1),

        mc_purchase_price: loaded.mc_purchase_price.unwrap_or(0.0),
        mc_sell_price: loaded.mc_sell_price.unwrap_or(0.0),
        mc_small_measure_sell_price: loaded.mc_small_measure_sell_price.unwrap_or(0.0),
        initial_qte: loaded.qte_in_stock.unwrap_or(0.0),

        alert_qte: draft.alert_qte,

        attachment: draft.attachment.clone(),
        attachment_file_name: draft.attachment_file_name.clone(),
    }
}
