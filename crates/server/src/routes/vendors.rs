//! Public directory route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use smart_bazaar_core::{CatalogItem, Coordinates, VendorId, VendorRecord};

use super::PositionQuery;
use crate::error::{AppError, Result};
use crate::services::{DirectoryService, ShareLink, directions_url, share_link};
use crate::state::AppState;

/// A vendor page: shop, catalog, share link and directions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPage {
    pub vendor: VendorRecord,
    pub items: Vec<CatalogItem>,
    pub share: ShareLink,
    pub directions_url: String,
}

/// A map marker: the vendor record plus a directions link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorListing {
    #[serde(flatten)]
    pub vendor: VendorRecord,
    pub directions_url: String,
}

impl From<VendorRecord> for VendorListing {
    fn from(vendor: VendorRecord) -> Self {
        let directions_url = directions_url(&vendor.profile.location).to_string();
        Self {
            vendor,
            directions_url,
        }
    }
}

/// Every vendor, for the map.
///
/// GET /api/vendors
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<VendorListing>>> {
    let vendors = DirectoryService::new(state.store())
        .list_all_vendors()
        .await?;
    Ok(Json(vendors.into_iter().map(VendorListing::from).collect()))
}

/// One vendor with its catalog.
///
/// GET /api/vendors/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VendorPage>> {
    let found = DirectoryService::new(state.store())
        .get_vendor_with_catalog(&VendorId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))?;

    let share = share_link(&found.vendor, &state.config().base_url);
    let directions_url = directions_url(&found.vendor.profile.location).to_string();
    Ok(Json(VendorPage {
        vendor: found.vendor,
        items: found.items,
        share,
        directions_url,
    }))
}

/// Where to centre the customer map.
///
/// GET /api/map/center?lat=..&lng=..
pub async fn map_center(
    State(state): State<AppState>,
    Query(position): Query<PositionQuery>,
) -> Result<Json<Coordinates>> {
    let source = position.source()?;
    let center = DirectoryService::new(state.store())
        .map_center(&source, state.config().default_location)
        .await;
    Ok(Json(center))
}
