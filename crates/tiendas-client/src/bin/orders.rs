//! # Order History Viewer
//!
//! Prints a user's orders with the same financial breakdown the order
//! detail view shows.
//!
//! ## Usage
//! ```bash
//! # Orders for user 4 against the default API (http://localhost:3000)
//! cargo run -p tiendas-client --bin orders -- --user 4
//!
//! # Point at another API and turn on request logs
//! TIENDAS_API_URL=https://api.tienda.example RUST_LOG=tiendas_client=debug \
//!     cargo run -p tiendas-client --bin orders -- --user 4
//! ```

use std::env;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tiendas_client::{ClientConfig, StoreClient};
use tiendas_core::Order;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let user_id = parse_user_arg()?;

    let config = ClientConfig::load().context("loading client configuration")?;
    info!(base_url = %config.base_url, user_id, "Fetching orders");

    let client = StoreClient::new(config)?;
    let orders = match client.orders_for_user(user_id).await {
        Ok(orders) => orders,
        Err(e) => bail!(e.user_message()),
    };

    if orders.is_empty() {
        println!("No orders for user {user_id}");
        return Ok(());
    }

    for order in &orders {
        print_order(order);
    }

    Ok(())
}

fn parse_user_arg() -> anyhow::Result<i64> {
    let args: Vec<String> = env::args().collect();
    let mut user = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--user" | "-u" => {
                let value = args.get(i + 1).context("--user needs a value")?;
                user = Some(value.parse().with_context(|| format!("invalid user id '{value}'"))?);
                i += 2;
            }
            other => bail!("unknown argument '{other}'"),
        }
    }

    user.context("usage: orders --user <id>")
}

fn print_order(order: &Order) {
    let breakdown = match order.financials() {
        Ok(breakdown) => breakdown,
        Err(e) => {
            warn!(order_id = order.id, error = %e, "Skipping order with unusable amounts");
            return;
        }
    };
    if breakdown.has_negative_adjustment() {
        warn!(order_id = order.id, "Stored total is below subtotal plus tax");
    }
    if let Some(diff) = breakdown.unaccounted().filter(|d| !d.is_zero()) {
        warn!(order_id = order.id, %diff, "Stored total does not match its breakdown");
    }

    let shipping = order.shipping_method();
    println!("Order #{} ({:?})", order.id, order.payment_status);
    if let Some(created) = order.created_at {
        println!("  placed      {}", created.format("%Y-%m-%d %H:%M"));
    }
    println!("  shipping by {}", shipping.label());
    for item in &order.items {
        // Every line fits: the subtotal above was computed from them.
        let line = item.line_total().map(|m| m.to_string()).unwrap_or_default();
        println!(
            "  {:>3} x {:>10} = {:>10}",
            item.quantity,
            item.unit_price.to_string(),
            line
        );
    }
    println!("  subtotal    {:>10}", breakdown.subtotal.to_string());
    println!("  tax (8%)    {:>10}", breakdown.tax.to_string());
    println!("  shipping    {:>10}", breakdown.shipping.to_string());
    println!("  commission  {:>10}", breakdown.commission.to_string());
    println!("  total       {:>10}", breakdown.total.to_string());
    println!();
}
