//! Product catalogue types.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A product as listed by `GET /products`.
///
/// A read-only snapshot; every list load fetches a fresh copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    pub stock: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_deserialize() {
        let json = r#"{
            "id": "prod-1",
            "name": "Pineapple",
            "description": "Fresh and sweet",
            "price": 3.5,
            "stock": 42
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "prod-1");
        assert_eq!(product.name, "Pineapple");
        assert_eq!(product.price.amount(), Decimal::new(35, 1));
        assert_eq!(product.stock, 42);
    }

    #[test]
    fn test_product_missing_description_defaults_empty() {
        let json = r#"{"id": "p", "name": "n", "price": 1, "stock": 0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
    }
}
