//! Products resource
//!
//! Products are stored as posts on the target API.

use restcheck_domain::{Product, Response};
use tracing::info;

use crate::client::RestClient;
use crate::context::WorkerContext;
use crate::error::ClientResult;

/// Collection endpoint.
pub const PRODUCTS_ENDPOINT: &str = "/public/v2/posts";
/// Single-product endpoint template.
pub const PRODUCT_BY_ID_ENDPOINT: &str = "/public/v2/posts/{productId}";

const PRODUCT_ID: &str = "productId";

/// Calls against `/public/v2/posts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductService;

impl ProductService {
    /// Creates the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `POST /posts`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn create_product(
        &self,
        worker: &mut WorkerContext,
        product: &Product,
    ) -> ClientResult<Response> {
        info!(worker = %worker.id(), title = %product.title, "creating product");
        RestClient::new(worker).post(PRODUCTS_ENDPOINT, product).await
    }

    /// `GET /posts/{productId}`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn get_product(&self, worker: &mut WorkerContext, product_id: u64) -> ClientResult<Response> {
        info!(worker = %worker.id(), product_id, "getting product");
        RestClient::new(worker)
            .add_path_param(PRODUCT_ID, product_id.to_string())
            .get(PRODUCT_BY_ID_ENDPOINT)
            .await
    }

    /// `GET /posts`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn get_all_products(&self, worker: &mut WorkerContext) -> ClientResult<Response> {
        info!(worker = %worker.id(), "getting all products");
        RestClient::new(worker).get(PRODUCTS_ENDPOINT).await
    }

    /// `PUT /posts/{productId}`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn update_product(
        &self,
        worker: &mut WorkerContext,
        product_id: u64,
        product: &Product,
    ) -> ClientResult<Response> {
        info!(worker = %worker.id(), product_id, "updating product");
        RestClient::new(worker)
            .add_path_param(PRODUCT_ID, product_id.to_string())
            .put(PRODUCT_BY_ID_ENDPOINT, product)
            .await
    }

    /// `DELETE /posts/{productId}`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn delete_product(
        &self,
        worker: &mut WorkerContext,
        product_id: u64,
    ) -> ClientResult<Response> {
        info!(worker = %worker.id(), product_id, "deleting product");
        RestClient::new(worker)
            .add_path_param(PRODUCT_ID, product_id.to_string())
            .delete(PRODUCT_BY_ID_ENDPOINT)
            .await
    }
}
