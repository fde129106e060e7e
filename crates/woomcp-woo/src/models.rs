//! Typed views of upstream WooCommerce records.
//!
//! Deserialization is strict on the required fields: an upstream object
//! missing `id` (or any other required field) fails as a whole rather
//! than producing a partially populated record. Loosely-typed parts of
//! the upstream payload (categories, line items) are kept as raw JSON
//! maps, exactly as the store returns them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub regular_price: Option<String>,
    #[serde(default)]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub categories: Vec<Map<String, Value>>,
}

/// An order as returned by `GET /orders/{id}` or `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: String,
    pub total: String,
    pub customer_id: i64,
    #[serde(default)]
    pub line_items: Vec<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_full() {
        let product: Product = serde_json::from_value(json!({
            "id": 42,
            "name": "Hoodie",
            "price": "19.99",
            "regular_price": "24.99",
            "sale_price": "19.99",
            "stock_status": "instock",
            "categories": [{"id": 9, "name": "Clothing"}],
            "unknown_upstream_field": true
        }))
        .unwrap();

        assert_eq!(product.id, 42);
        assert_eq!(product.name, "Hoodie");
        assert_eq!(product.price.as_deref(), Some("19.99"));
        assert_eq!(product.stock_status.as_deref(), Some("instock"));
        assert_eq!(product.categories.len(), 1);
        assert_eq!(product.categories[0]["name"], "Clothing");
    }

    #[test]
    fn test_product_optional_fields_absent() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Sticker"
        }))
        .unwrap();

        assert!(product.price.is_none());
        assert!(product.categories.is_empty());
    }

    #[test]
    fn test_product_missing_id_fails() {
        let result: Result<Product, _> = serde_json::from_value(json!({
            "name": "No id here"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_product_missing_name_fails() {
        let result: Result<Product, _> = serde_json::from_value(json!({
            "id": 7
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_order_full() {
        let order: Order = serde_json::from_value(json!({
            "id": 100,
            "status": "pending",
            "total": "59.97",
            "customer_id": 5,
            "line_items": [{"product_id": 42, "quantity": 3}]
        }))
        .unwrap();

        assert_eq!(order.id, 100);
        assert_eq!(order.status, "pending");
        assert_eq!(order.total, "59.97");
        assert_eq!(order.line_items[0]["quantity"], 3);
    }

    #[test]
    fn test_order_missing_total_fails() {
        let result: Result<Order, _> = serde_json::from_value(json!({
            "id": 100,
            "status": "pending",
            "customer_id": 5
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_order_serializes_back_out() {
        let order = Order {
            id: 1,
            status: "processing".to_string(),
            total: "10.00".to_string(),
            customer_id: 2,
            line_items: vec![],
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["line_items"], json!([]));
    }
}
