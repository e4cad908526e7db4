//! Product catalog CRUD against `/Product`, with server-side filtering,
//! sorting and paging.

use uuid::Uuid;

use crate::config::endpoints;
use crate::error::Result;
use crate::models::Product;
use crate::query_builder::QueryBuilder;
use crate::session::Session;

// ---------------------------------------------------------------------------
// ProductListParams
// ---------------------------------------------------------------------------

/// Parameters for a filtered product listing.
///
/// All fields are optional. When `None`, the corresponding parameter is not
/// sent and the server default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListParams {
    pub filter_on: Option<String>,
    pub filter_query: Option<String>,
    pub sort_by: Option<String>,
    pub is_ascending: bool,
    pub page_number: Option<usize>,
    pub page_size: Option<usize>,
}

impl ProductListParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut qb = QueryBuilder::new();

        if let (Some(on), Some(query)) = (&self.filter_on, &self.filter_query) {
            qb.filter(on, query);
        }
        if let Some(by) = &self.sort_by {
            qb.sort(by, self.is_ascending);
        }
        if let Some(size) = self.page_size {
            qb.page(self.page_number.unwrap_or(1), size);
        }

        qb.build()
    }
}

// ---------------------------------------------------------------------------
// ProductApi
// ---------------------------------------------------------------------------

/// Query interface for catalog products.
pub struct ProductApi<'a> {
    session: &'a Session,
}

impl<'a> ProductApi<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fetch the whole catalog.
    pub fn list(&self) -> Result<Vec<Product>> {
        self.session.get_json(endpoints::PRODUCTS)
    }

    /// Fetch one page of the catalog with optional filter and sort.
    pub fn list_with(&self, params: &ProductListParams) -> Result<Vec<Product>> {
        let query = params.to_query();
        self.session.get_json_with_query(endpoints::PRODUCTS, &query)
    }

    pub fn create(&self, product: &Product) -> Result<Product> {
        let created: Product = self.session.post_json(endpoints::PRODUCTS, product)?;
        tracing::info!(id = %created.id, name = %created.name, "product created");
        Ok(created)
    }

    pub fn update(&self, id: Uuid, product: &Product) -> Result<Product> {
        self.session.put_json(&endpoints::product_with_id(id), product)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.session.delete(&endpoints::product_with_id(id))
    }
}
