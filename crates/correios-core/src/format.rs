use crate::types::{CodeRecord, Order};

pub const NO_ORDERS: &str = "No orders found";

/// One `[id] status - date` line per order, newline separated.
pub fn format_orders(orders: &[Order]) -> String {
    format_labeled(orders, &[])
}

/// Like [`format_orders`], prefixing each line with the stored label of the
/// record whose code equals the order id.
pub fn format_labeled(orders: &[Order], records: &[CodeRecord]) -> String {
    if orders.is_empty() {
        return NO_ORDERS.to_string();
    }
    orders
        .iter()
        .map(|order| match label_for(&order.id, records) {
            Some(label) => format!("{label} {order}"),
            None => order.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn label_for<'a>(id: &str, records: &'a [CodeRecord]) -> Option<&'a str> {
    records
        .iter()
        .find(|r| r.code.as_str() == id)
        .and_then(|r| r.label.as_deref())
        .filter(|l| !l.is_empty())
}
