//! The product service: catalog, item details, orders.

use crate::{ApiConfig, FetchClient, FetchError};
use async_trait::async_trait;
use larek_commerce::catalog::CatalogItem;
use larek_commerce::checkout::{OrderRequest, OrderResult};
use larek_commerce::ids::ProductId;
use serde::Deserialize;

/// List envelope returned by `GET /product`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiListResponse<T> {
    /// Number of records on the server.
    pub total: u32,
    /// The records.
    pub items: Vec<T>,
}

/// Remote collaborator the storefront loads data from and sends orders to.
///
/// Returned items carry absolute image URLs.
#[async_trait]
pub trait ProductService {
    /// `GET /product`
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, FetchError>;

    /// `GET /product/{id}`
    async fn fetch_item(&self, id: &ProductId) -> Result<CatalogItem, FetchError>;

    /// `POST /order`
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, FetchError>;
}

/// HTTP implementation of [`ProductService`].
#[derive(Debug, Clone)]
pub struct LarekApi {
    client: FetchClient,
    cdn_url: String,
}

impl LarekApi {
    /// Create an API client from explicit URLs.
    pub fn new(
        client: FetchClient,
        base_url: impl Into<String>,
        cdn_url: impl Into<String>,
    ) -> Self {
        Self {
            client: client
                .with_base_url(base_url)
                .with_default_header("Accept", "application/json"),
            cdn_url: cdn_url.into(),
        }
    }

    /// Create an API client from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = FetchClient::with_timeout(config.timeout())?;
        Ok(Self::new(client, &config.base_url, &config.cdn_url))
    }

    /// Resolve an image path against the CDN.
    pub fn image_url(&self, image: &str) -> String {
        if image.starts_with("http://") || image.starts_with("https://") {
            return image.to_string();
        }
        format!(
            "{}/{}",
            self.cdn_url.trim_end_matches('/'),
            image.trim_start_matches('/')
        )
    }

    fn with_cdn(&self, mut item: CatalogItem) -> CatalogItem {
        item.image = self.image_url(&item.image);
        item
    }
}

#[async_trait]
impl ProductService for LarekApi {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, FetchError> {
        let list: ApiListResponse<CatalogItem> = self
            .client
            .get("/product")
            .send()
            .await?
            .error_for_status()?
            .json()?;
        tracing::debug!(total = list.total, received = list.items.len(), "catalog fetched");
        Ok(list.items.into_iter().map(|item| self.with_cdn(item)).collect())
    }

    async fn fetch_item(&self, id: &ProductId) -> Result<CatalogItem, FetchError> {
        let item: CatalogItem = self
            .client
            .get(format!("/product/{}", id))
            .send()
            .await?
            .error_for_status()?
            .json()?;
        Ok(self.with_cdn(item))
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, FetchError> {
        self.client
            .post("/order")
            .json(order)?
            .send()
            .await?
            .error_for_status()?
            .json()
    }
}
