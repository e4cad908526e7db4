//! Page-level flows without a UI: checkout, product and category forms,
//! search-as-you-type and product list paging.
//!
//! Every flow that talks to the API ends in a [`Notice`], the text of the
//! modal dialog a shell would show. Failures never escape as errors here;
//! they become `Error` notices and leave local state as it was.

use std::path::Path;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::ProductListParams;
use crate::cart::Cart;
use crate::config::PLACEHOLDER_IMAGE_URL;
use crate::error::{Result, ShopError};
use crate::image_host::ImageHost;
use crate::models::{Category, Order, Product};
use crate::render::format_money;
use crate::ShopClient;

/// Delay between the last keystroke and the search it triggers.
pub const SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Suggestion list length under the search box.
pub const MAX_SUGGESTIONS: usize = 10;

/// Product list page size used when none is chosen.
pub const DEFAULT_PAGE_SIZE: usize = 25;

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A modal message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notice for a failed call. Validation failures get their own title.
    pub fn from_error(err: &ShopError) -> Self {
        let title = match err {
            ShopError::Validation(_) => "Validation Error",
            ShopError::Upload(_) => "Upload Error",
            _ => "Error",
        };
        Self::error(title, err.user_message())
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// Submit the cart as an order. The cart is cleared only once the server
/// has accepted it.
pub fn place_order(client: &ShopClient, cart: &mut Cart, discount: Decimal) -> Result<Order> {
    let request = cart.to_create_order(discount)?;
    let order = client.orders().create(&request)?;
    cart.clear();
    Ok(order)
}

/// [`place_order`] reported as a dialog.
pub fn checkout(client: &ShopClient, cart: &mut Cart, discount: Decimal) -> Notice {
    match place_order(client, cart, discount) {
        Ok(order) => Notice::success(format!(
            "Order placed successfully. Total: {}",
            format_money(order.total_amount)
        )),
        Err(e) => {
            tracing::warn!(error = %e, lines = cart.len(), "checkout failed");
            Notice::from_error(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Raw input from the add/edit product dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: i32,
}

impl ProductForm {
    /// Prefill from an existing product for editing.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone().unwrap_or_default(),
            price: product.price.to_string(),
            quantity: product.quantity,
        }
    }

    /// Check required fields and parse the price.
    pub fn validate(&self) -> Result<Decimal> {
        if self.name.trim().is_empty()
            || self.category.trim().is_empty()
            || self.price.trim().is_empty()
        {
            return Err(ShopError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        }
        match self.price.trim().parse::<Decimal>() {
            Ok(price) if !price.is_sign_negative() || price.is_zero() => Ok(price),
            _ => Err(ShopError::Validation(
                "Please enter a valid price.".to_string(),
            )),
        }
    }

    /// Build the product to send, keeping `id`.
    pub fn to_product(&self, id: Uuid, image_url: Option<String>) -> Result<Product> {
        let price = self.validate()?;
        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            category: Some(self.category.trim().to_string()),
            image_url,
            price,
            quantity: self.quantity,
        })
    }
}

/// Raw input from the add category dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    pub fn to_category(&self) -> Result<Category> {
        if self.name.trim().is_empty() {
            return Err(ShopError::Validation("Please fill in all fields.".to_string()));
        }
        Ok(Category::new(self.name.trim()))
    }
}

fn upload_photo(host: Option<&ImageHost>, image: &Path) -> Result<String> {
    let host = host.ok_or_else(|| {
        ShopError::Upload("Image uploads are not configured.".to_string())
    })?;
    host.upload(image).map_err(|e| {
        tracing::warn!(error = %e, "image upload failed");
        ShopError::Upload("Failed to upload image. Please try again.".to_string())
    })
}

/// Validate the form, upload the photo if one was picked and create the
/// product. Without a photo the placeholder image is used.
pub fn add_product(
    client: &ShopClient,
    host: Option<&ImageHost>,
    form: &ProductForm,
    image: Option<&Path>,
) -> Notice {
    let result = (|| -> Result<Product> {
        form.validate()?;
        let image_url = match image {
            Some(path) => upload_photo(host, path)?,
            None => PLACEHOLDER_IMAGE_URL.to_string(),
        };
        let product = form.to_product(Uuid::new_v4(), Some(image_url))?;
        client.products().create(&product)
    })();

    match result {
        Ok(created) => Notice::success(format!(
            "Product '{}' has been added successfully.",
            created.name
        )),
        Err(e @ (ShopError::Validation(_) | ShopError::Upload(_))) => Notice::from_error(&e),
        Err(e) => Notice::error("Error", format!("Failed to add product: {}", e.user_message())),
    }
}

/// Validate the form and update `existing`. A new photo replaces the old
/// one; otherwise the current image URL is kept.
pub fn edit_product(
    client: &ShopClient,
    host: Option<&ImageHost>,
    existing: &Product,
    form: &ProductForm,
    image: Option<&Path>,
) -> Notice {
    let result = (|| -> Result<Product> {
        form.validate()?;
        let image_url = match image {
            Some(path) => Some(upload_photo(host, path)?),
            None => existing.image_url.clone(),
        };
        let product = form.to_product(existing.id, image_url)?;
        client.products().update(existing.id, &product)
    })();

    match result {
        Ok(updated) => Notice::success(format!(
            "Product '{}' has been updated successfully.",
            updated.name
        )),
        Err(e @ (ShopError::Validation(_) | ShopError::Upload(_))) => Notice::from_error(&e),
        Err(e) => Notice::error(
            "Error",
            format!("Failed to update product: {}", e.user_message()),
        ),
    }
}

/// Delete a product, then its hosted photo if it has one. A photo that
/// cannot be removed does not fail the delete.
pub fn delete_product(client: &ShopClient, host: Option<&ImageHost>, product: &Product) -> Notice {
    if let Err(e) = client.products().delete(product.id) {
        return Notice::error("Error", format!("Failed to delete product: {}", e.user_message()));
    }

    if let (Some(host), Some(url)) = (host, product.image_url.as_deref()) {
        if url != PLACEHOLDER_IMAGE_URL {
            if let Err(e) = host.delete(url) {
                tracing::warn!(error = %e, url, "product photo left behind");
            }
        }
    }

    Notice::success(format!("Product '{}' has been deleted.", product.name))
}

pub fn add_category(client: &ShopClient, form: &CategoryForm) -> Notice {
    let result = form
        .to_category()
        .and_then(|category| client.categories().create(&category));
    match result {
        Ok(created) => Notice::success(format!(
            "Category '{}' has been added successfully.",
            created.name
        )),
        Err(e) => Notice::from_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .category
            .as_deref()
            .map(|c| c.to_lowercase().contains(needle))
            .unwrap_or(false)
}

/// Products whose name or category contains `term`, ignoring case.
/// A blank term returns everything.
pub fn search_products(products: &[Product], term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products.iter().filter(|p| matches(p, &needle)).cloned().collect()
}

/// Up to `limit` product names for the search box dropdown. Empty for a
/// blank term.
pub fn suggestions(products: &[Product], term: &str, limit: usize) -> Vec<String> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| matches(p, &needle))
        .map(|p| p.name.clone())
        .take(limit)
        .collect()
}

/// Delays search-as-you-type until typing pauses.
///
/// Time is passed in by the caller, so the shell decides how often to poll.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a keystroke. Replaces any pending query and restarts the delay.
    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now + self.delay));
    }

    /// The pending query, once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(q, _)| q),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// ---------------------------------------------------------------------------
// Pager
// ---------------------------------------------------------------------------

/// Server-side paging state for the product list.
///
/// The API does not report a total, so "next" is offered whenever the last
/// page came back full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_number: usize,
    page_size: usize,
    last_count: Option<usize>,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_number: 1,
            page_size: page_size.max(1),
            last_count: None,
        }
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.reset();
    }

    /// Back to page one, e.g. after the sort or filter changed.
    pub fn reset(&mut self) {
        self.page_number = 1;
        self.last_count = None;
    }

    /// Remember how many rows the current page returned.
    pub fn record(&mut self, count: usize) {
        self.last_count = Some(count);
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.last_count == Some(self.page_size)
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page_number += 1;
        self.last_count = None;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page_number -= 1;
        self.last_count = None;
        true
    }

    /// `base` with this pager's page number and size filled in.
    pub fn apply(&self, base: &ProductListParams) -> ProductListParams {
        ProductListParams {
            page_number: Some(self.page_number),
            page_size: Some(self.page_size),
            ..base.clone()
        }
    }

    /// Fetch the current page and record its size.
    pub fn load(&mut self, client: &ShopClient, base: &ProductListParams) -> Result<Vec<Product>> {
        let products = client.products().list_with(&self.apply(base))?;
        self.record(products.len());
        Ok(products)
    }
}
