//! Dashboard KPIs.

use std::collections::BTreeMap;

use serde::Serialize;

use bss_catalog::Offering;
use bss_core::RecordId;
use bss_crm::{Customer, CustomerState};
use bss_orders::{stage_counts, Order, OrderStage};

const RECENT_ORDERS: usize = 6;
const TOP_CUSTOMERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub customer_id: RecordId,
    pub name: Option<String>,
    pub billable_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub customer_total: usize,
    pub customers_by_state: BTreeMap<CustomerState, usize>,
    pub ticket_total: usize,
    pub product_total: usize,
    pub order_total: usize,
    pub orders_by_stage: BTreeMap<OrderStage, usize>,
    pub recent_orders: Vec<Order>,
    /// Sum of plan monthly fees over billable orders.
    pub mrr: f64,
    pub top_customers: Vec<TopCustomer>,
}

pub fn dashboard(
    customers: &[Customer],
    orders: &[Order],
    offerings: &[Offering],
    ticket_total: usize,
    product_total: usize,
) -> Dashboard {
    let mut customers_by_state: BTreeMap<CustomerState, usize> =
        CustomerState::ALL.iter().map(|s| (*s, 0)).collect();
    for c in customers {
        *customers_by_state.entry(c.state).or_default() += 1;
    }

    let mut recent: Vec<Order> = orders.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_ORDERS);

    let billable: Vec<&Order> = orders.iter().filter(|o| o.is_billable()).collect();

    let mrr = billable
        .iter()
        .filter_map(|o| o.offering_id)
        .filter_map(|id| offerings.iter().find(|off| off.id == id))
        .map(Offering::monthly_fee)
        .sum();

    let mut per_customer: BTreeMap<RecordId, usize> = BTreeMap::new();
    for id in billable.iter().filter_map(|o| o.customer_id) {
        *per_customer.entry(id).or_default() += 1;
    }
    let mut ranked: Vec<(RecordId, usize)> = per_customer.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top_customers = ranked
        .into_iter()
        .take(TOP_CUSTOMERS)
        .map(|(id, n)| TopCustomer {
            customer_id: id,
            name: customers.iter().find(|c| c.id == id).map(|c| c.name.clone()),
            billable_orders: n,
        })
        .collect();

    Dashboard {
        customer_total: customers.len(),
        customers_by_state,
        ticket_total,
        product_total,
        order_total: orders.len(),
        orders_by_stage: stage_counts(orders),
        recent_orders: recent,
        mrr,
        top_customers,
    }
}
