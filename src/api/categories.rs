//! Category CRUD against `/Category`.

use uuid::Uuid;

use crate::config::endpoints;
use crate::error::Result;
use crate::models::Category;
use crate::session::Session;

/// Query interface for product categories.
pub struct CategoryApi<'a> {
    session: &'a Session,
}

impl<'a> CategoryApi<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        self.session.get_json(endpoints::CATEGORIES)
    }

    /// Create a category and return the stored record.
    pub fn create(&self, category: &Category) -> Result<Category> {
        let created: Category = self.session.post_json(endpoints::CATEGORIES, category)?;
        tracing::info!(id = %created.id, name = %created.name, "category created");
        Ok(created)
    }

    pub fn update(&self, id: Uuid, category: &Category) -> Result<Category> {
        self.session
            .put_json(&endpoints::category_with_id(id), category)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.session.delete(&endpoints::category_with_id(id))
    }
}
