//! Vendor dashboard route handlers.
//!
//! Every handler takes [`RequireVendor`], so the owner is always the
//! signed-in vendor and never a request parameter.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use smart_bazaar_core::{
    CatalogItem, ItemId, NewCatalogItem, VendorDraft, VendorProfileUpdate, VendorRecord,
};

use super::PositionQuery;
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::services::{CatalogManager, ShareLink, VendorProfileManager, share_link};
use crate::state::AppState;

/// What the dashboard shows: the saved record, or a draft to fill in.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorRecord>,
    pub items: Vec<CatalogItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<ShareLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<VendorDraft>,
}

/// New item form. The price may be sent as text or as a number.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub price: PriceInput,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// The signed-in vendor's shop, or a draft when none is saved.
///
/// GET /api/dashboard/vendor?lat=..&lng=..
pub async fn show(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Query(position): Query<PositionQuery>,
) -> Result<Json<DashboardView>> {
    let profiles = VendorProfileManager::new(state.store());

    let view = match profiles.load_own_record(&vendor.id).await? {
        Some(record) => {
            let items = CatalogManager::new(state.store())
                .list_items(&record.id)
                .await?;
            let share = share_link(&record, &state.config().base_url);
            DashboardView {
                vendor: Some(record),
                items,
                share: Some(share),
                draft: None,
            }
        }
        None => {
            let source = position.source()?;
            let draft = profiles
                .draft_for_new_vendor(&source, state.config().default_location)
                .await;
            DashboardView {
                vendor: None,
                items: Vec::new(),
                share: None,
                draft: Some(draft),
            }
        }
    };

    Ok(Json(view))
}

/// Create or update the signed-in vendor's shop.
///
/// PUT /api/dashboard/vendor
pub async fn save(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Json(update): Json<VendorProfileUpdate>,
) -> Result<Json<VendorRecord>> {
    let record = VendorProfileManager::new(state.store())
        .save(&vendor.id, update)
        .await?;
    Ok(Json(record))
}

/// Delete the signed-in vendor's shop and catalog.
///
/// DELETE /api/dashboard/vendor
pub async fn delete(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
) -> Result<StatusCode> {
    if VendorProfileManager::new(state.store())
        .delete(&vendor.id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Vendor profile".to_string()))
    }
}

/// Add an item to the signed-in vendor's catalog.
///
/// POST /api/dashboard/items
pub async fn add_item(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Json(form): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CatalogItem>)> {
    let item = NewCatalogItem::parse(&form.name, &form.price.as_text(), form.description.as_deref())?;
    let record = own_record(&state, &vendor.id).await?;

    let item = CatalogManager::new(state.store())
        .add_item(&record.id, item)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Remove an item from the signed-in vendor's catalog.
///
/// DELETE /api/dashboard/items/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(item_id): Path<String>,
) -> Result<StatusCode> {
    let record = own_record(&state, &vendor.id).await?;

    CatalogManager::new(state.store())
        .remove_item(&record.id, &ItemId::new(item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn own_record(
    state: &AppState,
    owner_id: &smart_bazaar_core::OwnerId,
) -> Result<VendorRecord> {
    VendorProfileManager::new(state.store())
        .load_own_record(owner_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Save your shop profile before editing items".to_string()))
}
