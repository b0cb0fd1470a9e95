//! Order types.
//!
//! [`Order`] and [`OrderItem`] are the read side returned by `GET /orders`;
//! [`NewOrderItem`] is the request side sent to `POST /orders`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OrderId, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owner of the order, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub status: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Number of line items in the order.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A line item of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A line item in an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl NewOrderItem {
    /// A single unit of `product_id`, the only order shape the client places.
    #[must_use]
    pub const fn single(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialize() {
        let json = r#"{
            "id": "order-1",
            "userId": "user-1",
            "items": [
                {"productId": "prod-1", "quantity": 1},
                {"productId": "prod-2", "quantity": 3}
            ],
            "status": "Confirmed",
            "createdAt": "2026-01-15T10:30:00.123456789Z"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id.as_str(), "order-1");
        assert_eq!(order.user_id, Some(UserId::new("user-1")));
        assert_eq!(order.status, "Confirmed");
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_order_with_offset_timestamp() {
        let json = r#"{
            "id": "order-2",
            "items": [],
            "status": "Confirmed",
            "createdAt": "2026-01-15T12:30:00+02:00"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.created_at.to_rfc3339(), "2026-01-15T10:30:00+00:00");
        assert_eq!(order.item_count(), 0);
    }

    #[test]
    fn test_single_item_request_body() {
        let body = vec![NewOrderItem::single(ProductId::new("p1"))];
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"[{"productId":"p1","quantity":1}]"#
        );
    }
}
