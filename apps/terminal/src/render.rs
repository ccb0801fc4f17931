//! # Terminal Rendering
//!
//! Turns command responses into printable text. Amounts go through
//! [`ConfigState::format_currency`] so the configured currency code shows
//! everywhere.
//!
//! ```text
//! Order 3f2a91c0 (pending), 1 line
//!   1c9e04aa  Coffee - Americano          x2   USD 7.98
//!   ─────────────────────────────────────────────────
//!   Subtotal                                   USD 7.98
//!   Tax                                        USD 0.40
//!   Discount                                  -USD 1.00
//!   Total                                      USD 7.38
//! ```

use flow_core::history::PaymentSummary;
use flow_core::{Notice, NoticeLevel, Order, OrderSnapshot, Product};

use crate::commands::history::HistoryResponse;
use crate::commands::order::CheckoutResponse;
use crate::state::ConfigState;

const ID_WIDTH: usize = 8;

fn short_id(id: &str) -> &str {
    id.get(..ID_WIDTH).unwrap_or(id)
}

fn total_line(label: &str, amount: String) -> String {
    format!("  {:<30}{:>20}", label, amount)
}

/// One line per notice, oldest first.
pub fn notices(notices: &[Notice]) -> Vec<String> {
    notices
        .iter()
        .map(|n| {
            let marker = match n.level {
                NoticeLevel::Success => "✓",
                NoticeLevel::Info => "·",
                NoticeLevel::Warning => "!",
            };
            format!("{} {}", marker, n.message)
        })
        .collect()
}

/// The current order with its lines and totals.
pub fn order(config: &ConfigState, order: &OrderSnapshot) -> Vec<String> {
    let mut out = vec![format!(
        "Order {} ({}), {} line(s)",
        short_id(&order.order_id),
        order.status,
        order.item_count
    )];

    if order.items.is_empty() {
        out.push("  (no items yet, use `add <product> [qty]`)".to_string());
    }
    for item in &order.items {
        let mut line = format!(
            "  {:<width$}  {:<26} x{:<4}{:>12}",
            short_id(&item.id),
            item.product.name,
            item.quantity,
            config.format_currency(item.line_total()),
            width = ID_WIDTH
        );
        if let Some(notes) = &item.notes {
            line.push_str(&format!("  ({})", notes));
        }
        out.push(line);
    }

    out.push(format!("  {}", "─".repeat(50)));
    out.push(total_line("Subtotal", config.format_currency(order.subtotal)));
    out.push(total_line("Tax", config.format_currency(order.tax)));
    if !order.discount.is_zero() {
        out.push(total_line(
            "Discount",
            format!("-{}", config.format_currency(order.discount)),
        ));
    }
    out.push(total_line("Total", config.format_currency(order.total)));
    out
}

/// Confirmation printed after a successful checkout.
pub fn checkout(config: &ConfigState, checkout: &CheckoutResponse) -> Vec<String> {
    let order = &checkout.order;
    let mut out = notices(&checkout.notices);
    out.push(format!(
        "Paid {} by {} for order {}",
        config.format_currency(order.total),
        order
            .payment_method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        short_id(&order.id)
    ));
    if !checkout.persisted {
        out.push("! Order could not be saved to local history".to_string());
    }
    out.push(format!("Receipt: {}", checkout.receipt_url));
    out
}

/// The catalog table.
pub fn products(config: &ConfigState, products: &[Product]) -> Vec<String> {
    if products.is_empty() {
        return vec!["No matching products".to_string()];
    }

    products
        .iter()
        .map(|p| {
            let mut line = format!(
                "  {:<4} {:<26}{:>12}  tax {}",
                p.id,
                p.name,
                config.format_currency(p.charged_price()),
                p.tax_rate()
            );
            if p.charged_price() != p.price() {
                line.push_str(&format!("  (was {})", config.format_currency(p.price())));
            }
            if p.is_service {
                line.push_str("  [service]");
            }
            line
        })
        .collect()
}

fn history_row(config: &ConfigState, order: &Order) -> String {
    let when = order
        .completed_at
        .unwrap_or(order.created_at)
        .format("%Y-%m-%d %H:%M");
    let method = order
        .payment_method
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    let customer = order.customer_name.as_deref().unwrap_or("Walk-in");

    format!(
        "  {}  {}  {:<7}{:>12}  {} line(s), {} unit(s)  {}",
        short_id(&order.id),
        when,
        method,
        config.format_currency(order.total),
        order.item_count(),
        order.total_quantity(),
        customer
    )
}

/// Stored orders, most recent first.
pub fn history(config: &ConfigState, history: &HistoryResponse) -> Vec<String> {
    if history.orders.is_empty() {
        return vec![match history.filter {
            Some(method) => format!("No {} orders in history", method),
            None => "No orders in history".to_string(),
        }];
    }

    history
        .orders
        .iter()
        .map(|order| history_row(config, order))
        .collect()
}

/// Sales totals with the per-method breakdown.
pub fn summary(config: &ConfigState, summary: &PaymentSummary) -> Vec<String> {
    let mut out = vec![
        match summary.filter {
            Some(method) => format!("Sales paid by {}", method),
            None => "All sales".to_string(),
        },
        total_line("Orders", summary.order_count.to_string()),
        total_line("Total sales", config.format_currency(summary.total_sales)),
        total_line(
            "Average order",
            config.format_currency(summary.average_order_value()),
        ),
    ];

    for entry in &summary.by_method {
        let label = entry
            .method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        out.push(total_line(
            &format!("  {} ({})", label, entry.count),
            config.format_currency(entry.total),
        ));
    }

    if let Some(top) = summary.most_popular().and_then(|t| t.method) {
        out.push(format!("  Most used method: {}", top));
    }
    out
}
