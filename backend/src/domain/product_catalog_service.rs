//! Product writes with code assignment, and listings with embedded categories.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::error;
use uuid::Uuid;

use crate::domain::ports::{
    CodeSequence, CodeSequenceError, ResourceCommand, ResourceQuery, ResourceRepository,
};
use crate::domain::{
    Category, CodeKind, Error, ListRequest, Predicate, Product, ProductDraft, ProductFields,
    ProductListing, ResourceService,
};

pub(crate) fn map_code_sequence_error(error: CodeSequenceError) -> Error {
    error!(%error, "code sequence failed");
    Error::internal(format!("failed to allocate code: {error}"))
}

/// Command and query service for products.
#[derive(Clone)]
pub struct ProductCatalogService {
    products: ResourceService<Product>,
    categories: ResourceService<Category>,
    codes: Arc<dyn CodeSequence>,
}

impl ProductCatalogService {
    /// Wire the product and category repositories with the code sequence.
    pub fn new(
        products: Arc<dyn ResourceRepository<Product>>,
        categories: Arc<dyn ResourceRepository<Category>>,
        codes: Arc<dyn CodeSequence>,
    ) -> Self {
        Self {
            products: ResourceService::new(products),
            categories: ResourceService::new(categories),
            codes,
        }
    }

    /// Resolve the categories referenced by `products` with one batch lookup.
    async fn categories_for(&self, products: &[Product]) -> Result<HashMap<Uuid, Category>, Error> {
        let ids: BTreeSet<Uuid> = products
            .iter()
            .filter_map(|product| product.fields.category_id)
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i64::try_from(ids.len()).unwrap_or(i64::MAX);
        let request = ListRequest::new(PageRequest::new(Some(limit), None))
            .with_predicate(Predicate::IdIn(ids.into_iter().collect()));
        let page = self.categories.fetch_page(&request).await?;
        Ok(page
            .items
            .into_iter()
            .map(|category| (category.id, category))
            .collect())
    }
}

#[async_trait]
impl ResourceCommand<Product> for ProductCatalogService {
    async fn create(&self, input: ProductFields) -> Result<Product, Error> {
        let code = self
            .codes
            .next_code(CodeKind::Product)
            .await
            .map_err(map_code_sequence_error)?;
        let draft = ProductDraft {
            code,
            fields: input,
        };
        self.products.insert(&draft).await
    }

    async fn update(&self, id: Uuid, changes: ProductFields) -> Result<Product, Error> {
        self.products.overwrite(id, &changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        self.products.remove(id).await
    }
}

#[async_trait]
impl ResourceQuery<Product> for ProductCatalogService {
    async fn get(&self, id: Uuid) -> Result<Product, Error> {
        self.products.fetch(id).await
    }

    async fn list(&self, request: ListRequest) -> Result<Page<ProductListing>, Error> {
        let page = self.products.fetch_page(&request).await?;
        let categories = self.categories_for(&page.items).await?;
        Ok(page.map(|product| {
            let category = product
                .fields
                .category_id
                .and_then(|id| categories.get(&id).cloned());
            ProductListing { product, category }
        }))
    }
}
