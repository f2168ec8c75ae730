//! Product catalog service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use bizvoice_core::validation::{
    validate_price_cents, validate_product_name, validate_search_query, validate_unit,
};
use bizvoice_core::{
    NewProduct, PriceHistory, Product, ProductSummary, ProductUpdate, User, MAX_LIST_RESULTS,
    MAX_SEARCH_RESULTS,
};
use bizvoice_db::repository::product::generate_product_id;

use crate::error::ApiError;
use crate::state::AppState;

/// Catalog operations behind `/api/products`.
pub struct ProductService {
    state: Arc<AppState>,
}

impl ProductService {
    pub fn new(state: Arc<AppState>) -> Self {
        ProductService { state }
    }

    pub async fn create(&self, new_product: NewProduct) -> Result<Product, ApiError> {
        let name = new_product.name.trim().to_string();
        let unit = new_product.unit.trim().to_string();
        validate_product_name(&name)?;
        validate_price_cents(new_product.current_price_cents)?;
        validate_unit(&unit)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name,
            description: new_product.description,
            current_price_cents: new_product.current_price_cents,
            unit,
            created_at: now,
            updated_at: now,
        };

        let product = self.state.db.products().insert(&product).await?;
        info!(id = %product.id, name = %product.name, price_cents = product.current_price_cents, "Product created");
        Ok(product)
    }

    /// Newest first, capped.
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self.state.db.products().list(MAX_LIST_RESULTS).await?)
    }

    /// Case-insensitive name search for the invoice editor's picker.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, ApiError> {
        let query = validate_search_query(query)?;
        let products = self
            .state
            .db
            .products()
            .search(&query, MAX_SEARCH_RESULTS)
            .await?;

        Ok(products.into_iter().map(ProductSummary::from).collect())
    }

    /// Partial update; a real price change is recorded in the history.
    pub async fn update(
        &self,
        id: &str,
        changes: ProductUpdate,
        acting: &User,
    ) -> Result<Product, ApiError> {
        if let Some(name) = &changes.name {
            validate_product_name(name.trim())?;
        }
        if let Some(price) = changes.current_price_cents {
            validate_price_cents(price)?;
        }
        if let Some(unit) = &changes.unit {
            validate_unit(unit.trim())?;
        }

        let changes = ProductUpdate {
            name: changes.name.map(|n| n.trim().to_string()),
            unit: changes.unit.map(|u| u.trim().to_string()),
            ..changes
        };

        let product = self
            .state
            .db
            .products()
            .update(id, &changes, &acting.username)
            .await?;

        info!(id = %product.id, changed_by = %acting.username, "Product updated");
        Ok(product)
    }

    /// Price changes of one product, newest first.
    pub async fn price_history(&self, id: &str) -> Result<Vec<PriceHistory>, ApiError> {
        let products = self.state.db.products();
        if products.get_by_id(id).await?.is_none() {
            return Err(ApiError::not_found("Product", id));
        }

        Ok(products.price_history(id).await?)
    }
}
