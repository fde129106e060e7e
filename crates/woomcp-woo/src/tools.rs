//! MCP tool handlers for the WooCommerce operations.
//!
//! Read-many tools (`list_products`, `search_products`, `list_orders`)
//! degrade to an empty listing on any failure, so a broken upstream
//! never takes a dashboard down with it. Single-entity reads and writes
//! (`get_order`, `create_order`) propagate the failure as a tool error:
//! silently returning nothing would hide a missed lookup or a failed
//! write. Pagination parameters are forwarded upstream unclamped.

use crate::client::WooClient;
use crate::models::{Order, Product};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use woomcp_server::{ServerTool, ServerToolBuilder, ToolExecutor};

fn int_arg(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(Value::as_i64)
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn require<T>(value: Option<T>, name: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("Missing or invalid argument: {name}"))
}

/// Wrap a listing payload the way `tools/call` exposes it.
fn listing<T: serde::Serialize>(records: &[T]) -> Result<Value, String> {
    let result = serde_json::to_value(records).map_err(|e| e.to_string())?;
    Ok(json!({ "result": result }))
}

fn empty_listing() -> Value {
    json!({ "result": [] })
}

async fn fetch_products(
    client: &WooClient,
    endpoint_query: &[(&str, String)],
) -> crate::error::WooResult<Vec<Product>> {
    let body = client.get("products", endpoint_query).await?;
    Ok(serde_json::from_value(body)?)
}

async fn fetch_orders(
    client: &WooClient,
    endpoint_query: &[(&str, String)],
) -> crate::error::WooResult<Vec<Order>> {
    let body = client.get("orders", endpoint_query).await?;
    Ok(serde_json::from_value(body)?)
}

struct ListProducts {
    client: Arc<WooClient>,
}

#[async_trait::async_trait]
impl ToolExecutor for ListProducts {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let per_page = int_arg(&args, "per_page").unwrap_or(20);
        let page = int_arg(&args, "page").unwrap_or(1);
        info!(page, per_page, "Listing products");

        let query = [
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        match fetch_products(&self.client, &query).await {
            Ok(products) => {
                info!(count = products.len(), "Retrieved products");
                listing(&products)
            }
            Err(e) => {
                error!(error = %e, "Error in list_products");
                Ok(empty_listing())
            }
        }
    }
}

struct SearchProducts {
    client: Arc<WooClient>,
}

#[async_trait::async_trait]
impl ToolExecutor for SearchProducts {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let query_text = require(str_arg(&args, "query"), "query")?.to_string();
        let per_page = int_arg(&args, "per_page").unwrap_or(10);
        info!(query = %query_text, "Searching products");

        let query = [
            ("search", query_text),
            ("per_page", per_page.to_string()),
        ];
        match fetch_products(&self.client, &query).await {
            Ok(products) => {
                info!(count = products.len(), "Found products");
                listing(&products)
            }
            Err(e) => {
                error!(error = %e, "Error in search_products");
                Ok(empty_listing())
            }
        }
    }
}

struct CreateOrder {
    client: Arc<WooClient>,
}

#[async_trait::async_trait]
impl ToolExecutor for CreateOrder {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let customer_id = require(int_arg(&args, "customer_id"), "customer_id")?;
        let items = require(
            args.get("line_items").and_then(Value::as_array).cloned(),
            "line_items",
        )?;
        let billing = require(
            args.get("billing").and_then(Value::as_object).cloned(),
            "billing",
        )?;
        // Shipping falls back to the billing address when omitted
        let shipping = args
            .get("shipping")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_else(|| billing.clone());

        // Trim each line item down to what the order endpoint needs
        let mut line_items = Vec::with_capacity(items.len());
        for item in &items {
            let product_id = require(
                item.get("product_id").and_then(Value::as_i64),
                "line_items[].product_id",
            )?;
            let quantity = require(
                item.get("quantity").and_then(Value::as_i64),
                "line_items[].quantity",
            )?;
            line_items.push(json!({ "product_id": product_id, "quantity": quantity }));
        }

        let payload = json!({
            "customer_id": customer_id,
            "line_items": line_items,
            "billing": billing,
            "shipping": shipping,
            "set_paid": false
        });

        info!(customer_id, "Creating order");
        let body = self.client.post("orders", &payload).await.map_err(|e| {
            error!(error = %e, "Error in create_order");
            e.to_string()
        })?;
        let order: Order = serde_json::from_value(body).map_err(|e| {
            error!(error = %e, "Error in create_order");
            e.to_string()
        })?;

        info!(order_id = order.id, "Order created");
        serde_json::to_value(&order).map_err(|e| e.to_string())
    }
}

struct GetOrder {
    client: Arc<WooClient>,
}

#[async_trait::async_trait]
impl ToolExecutor for GetOrder {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let order_id = require(int_arg(&args, "order_id"), "order_id")?;
        info!(order_id, "Retrieving order");

        let body = self
            .client
            .get(&format!("orders/{order_id}"), &[])
            .await
            .map_err(|e| {
                error!(order_id, error = %e, "Error in get_order");
                e.to_string()
            })?;
        let order: Order = serde_json::from_value(body).map_err(|e| {
            error!(order_id, error = %e, "Error in get_order");
            e.to_string()
        })?;

        serde_json::to_value(&order).map_err(|e| e.to_string())
    }
}

struct ListOrders {
    client: Arc<WooClient>,
}

#[async_trait::async_trait]
impl ToolExecutor for ListOrders {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let per_page = int_arg(&args, "per_page").unwrap_or(10);
        let customer_id = int_arg(&args, "customer_id");
        let status = str_arg(&args, "status").map(str::to_string);
        info!(?customer_id, ?status, "Listing orders");

        let mut query = vec![("per_page", per_page.to_string())];
        if let Some(customer) = customer_id {
            query.push(("customer", customer.to_string()));
        }
        if let Some(status) = status {
            query.push(("status", status));
        }

        match fetch_orders(&self.client, &query).await {
            Ok(orders) => {
                info!(count = orders.len(), "Retrieved orders");
                listing(&orders)
            }
            Err(e) => {
                error!(error = %e, "Error in list_orders");
                Ok(empty_listing())
            }
        }
    }
}

/// Build the full tool registry backed by one upstream client.
pub fn registry(client: Arc<WooClient>) -> HashMap<String, ServerTool> {
    let tools = [
        ServerToolBuilder::new("list_products")
            .description("List all products with pagination")
            .parameters(json!({
                "type": "object",
                "properties": {
                    "per_page": { "type": "integer", "default": 20 },
                    "page": { "type": "integer", "default": 1 }
                }
            }))
            .build(ListProducts {
                client: client.clone(),
            }),
        ServerToolBuilder::new("search_products")
            .description("Search for products by name or SKU")
            .parameters(json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "per_page": { "type": "integer", "default": 10 }
                },
                "required": ["query"]
            }))
            .build(SearchProducts {
                client: client.clone(),
            }),
        ServerToolBuilder::new("create_order")
            .description("Create a new order")
            .parameters(json!({
                "type": "object",
                "properties": {
                    "customer_id": { "type": "integer" },
                    "line_items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "product_id": { "type": "integer" },
                                "quantity": { "type": "integer" }
                            },
                            "required": ["product_id", "quantity"]
                        }
                    },
                    "billing": { "type": "object" },
                    "shipping": { "type": "object" }
                },
                "required": ["customer_id", "line_items", "billing"]
            }))
            .build(CreateOrder {
                client: client.clone(),
            }),
        ServerToolBuilder::new("get_order")
            .description("Retrieve a specific order by ID")
            .parameters(json!({
                "type": "object",
                "properties": {
                    "order_id": { "type": "integer" }
                },
                "required": ["order_id"]
            }))
            .build(GetOrder {
                client: client.clone(),
            }),
        ServerToolBuilder::new("list_orders")
            .description("List orders with optional filters")
            .parameters(json!({
                "type": "object",
                "properties": {
                    "customer_id": { "type": "integer" },
                    "status": { "type": "string" },
                    "per_page": { "type": "integer", "default": 10 }
                }
            }))
            .build(ListOrders { client }),
    ];

    tools
        .into_iter()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
}
