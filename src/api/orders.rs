//! Order history and order placement against `/Order`.

use uuid::Uuid;

use crate::config::endpoints;
use crate::error::Result;
use crate::models::{CreateOrder, Order};
use crate::session::Session;

// ---------------------------------------------------------------------------
// OrderApi
// ---------------------------------------------------------------------------

/// Query interface for placed orders.
pub struct OrderApi<'a> {
    session: &'a Session,
}

impl<'a> OrderApi<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fetch every order with its line items.
    pub fn list(&self) -> Result<Vec<Order>> {
        self.session.get_json(endpoints::ORDERS)
    }

    pub fn get(&self, id: Uuid) -> Result<Order> {
        self.session.get_json(&endpoints::order_with_id(id))
    }

    /// Place an order built from the cart.
    pub fn create(&self, order: &CreateOrder) -> Result<Order> {
        let placed: Order = self.session.post_json(endpoints::ORDERS, order)?;
        tracing::info!(
            id = %placed.id,
            items = placed.order_items.len(),
            total = %placed.total_amount,
            "order placed"
        );
        Ok(placed)
    }

    pub fn update(&self, id: Uuid, order: &Order) -> Result<Order> {
        self.session.put_json(&endpoints::order_with_id(id), order)
    }

    /// Flag an order as returned and store it.
    pub fn mark_returned(&self, order: &Order) -> Result<Order> {
        let mut returned = order.clone();
        returned.is_returned = true;
        self.update(order.id, &returned)
    }
}
