//! Catalog API handlers.

use axum::Json;

use crate::catalog::{self, Product, Theme};

/// GET /api/themes - All coloring themes.
pub async fn themes() -> Json<&'static [Theme]> {
    Json(catalog::themes())
}

/// GET /api/palette - Toolbar swatches.
pub async fn palette() -> Json<&'static [&'static str]> {
    Json(&catalog::PALETTE)
}

/// GET /api/carousel - Gallery images.
pub async fn carousel() -> Json<&'static [&'static str]> {
    Json(&catalog::CAROUSEL_IMAGES)
}

/// GET /api/products - Checkout offers.
pub async fn products() -> Json<&'static [Product]> {
    Json(catalog::products())
}
