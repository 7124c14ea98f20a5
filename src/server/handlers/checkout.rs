//! Checkout redirect.

use axum::{
    extract::Path,
    http::StatusCode,
    response::Redirect,
};
use tracing::info;

use crate::catalog;

/// GET /checkout/:product - Redirect to the product's external payment page.
pub async fn redirect(Path(product): Path<String>) -> Result<Redirect, (StatusCode, String)> {
    let product = catalog::product_by_id(&product).ok_or((
        StatusCode::NOT_FOUND,
        format!("Product '{}' not found", product),
    ))?;
    info!(product = product.id, "checkout redirect");
    Ok(Redirect::to(product.checkout_url))
}
