//! Point-of-sale cart: selected products with quantities and totals.
//!
//! A line's quantity is always at least 1; decrementing to zero removes the
//! line. Lines keep the order products were first added in.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, ShopError};
use crate::models::{CreateOrder, CreateOrderItem, Product};

// ---------------------------------------------------------------------------
// CartLine
// ---------------------------------------------------------------------------

/// A product in the cart with the price captured when it was added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            category: product.category_name().to_string(),
            image_url: product.image_url.clone(),
            unit_price: product.price,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, creating its line if needed.
    ///
    /// Returns the line's new quantity.
    pub fn add_or_increment(&mut self, product: &Product) -> i32 {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity += 1;
            return line.quantity;
        }
        self.lines.push(CartLine::from_product(product));
        1
    }

    /// Adjust a line's quantity by `delta`, removing it when the result
    /// would be zero or less.
    ///
    /// Returns the new quantity, or `None` if the line was removed.
    pub fn change_quantity(&mut self, product_id: Uuid, delta: i32) -> Result<Option<i32>> {
        let idx = self.position(product_id).ok_or_else(|| {
            ShopError::NotFound(format!("Product {} is not in the cart", product_id))
        })?;

        let next = self.lines[idx].quantity.saturating_add(delta);
        if next <= 0 {
            self.lines.remove(idx);
            return Ok(None);
        }
        self.lines[idx].quantity = next;
        Ok(Some(next))
    }

    pub fn increment(&mut self, product_id: Uuid) -> Result<Option<i32>> {
        self.change_quantity(product_id, 1)
    }

    pub fn decrement(&mut self, product_id: Uuid) -> Result<Option<i32>> {
        self.change_quantity(product_id, -1)
    }

    /// Drop a line regardless of its quantity. Returns whether it existed.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        match self.position(product_id) {
            Some(idx) => {
                self.lines.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal minus a flat discount. The discount is clamped into
    /// `0..=subtotal`, so the total never exceeds the subtotal or drops below zero.
    pub fn total(&self, discount: Decimal) -> Decimal {
        let subtotal = self.subtotal();
        subtotal - discount.max(Decimal::ZERO).min(subtotal)
    }

    /// Package the lines into an order request.
    pub fn to_create_order(&self, discount: Decimal) -> Result<CreateOrder> {
        if self.is_empty() {
            return Err(ShopError::Validation(
                "Add at least one product to the cart.".to_string(),
            ));
        }
        if discount.is_sign_negative() && !discount.is_zero() {
            return Err(ShopError::Validation(
                "Discount cannot be negative.".to_string(),
            ));
        }
        if discount > self.subtotal() {
            return Err(ShopError::Validation(
                "Discount cannot exceed the subtotal.".to_string(),
            ));
        }

        let order_items = self
            .lines
            .iter()
            .map(|l| CreateOrderItem {
                product_id: l.product_id,
                product_name: l.product_name.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price,
                total_price: l.line_total(),
            })
            .collect();

        Ok(CreateOrder {
            discount,
            order_items,
        })
    }

    fn position(&self, product_id: Uuid) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
