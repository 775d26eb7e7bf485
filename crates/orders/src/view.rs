use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Order, OrderStage};

const DAY_MS: f64 = 86_400_000.0;

/// Order as shown in the order list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub total_value: f64,
    /// Whole days until the due date, rounded up. Negative once overdue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

impl OrderView {
    pub fn new(order: Order, now: DateTime<Utc>) -> Self {
        let days_remaining = order.due_date.and_then(|due| {
            let due = due.and_hms_opt(0, 0, 0)?.and_utc();
            let ms = (due - now).num_milliseconds() as f64;
            Some((ms / DAY_MS).ceil() as i64)
        });
        Self {
            total_value: order.total_value(),
            days_remaining,
            order,
        }
    }
}

/// Order count per stage; every stage is present.
pub fn stage_counts<'a>(orders: impl IntoIterator<Item = &'a Order>) -> BTreeMap<OrderStage, usize> {
    let mut counts: BTreeMap<OrderStage, usize> = OrderStage::ALL.iter().map(|s| (*s, 0)).collect();
    for order in orders {
        *counts.entry(order.stage).or_default() += 1;
    }
    counts
}
