//! Monthly billing preview.

use core::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use bss_catalog::{find_price, find_product, BillingMode, Offering, Price, Product};
use bss_core::{DomainError, RecordId};
use bss_crm::Customer;
use bss_orders::Order;

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth {
    first: NaiveDate,
}

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.first.month() == 12 {
            (self.first.year() + 1, 1)
        } else {
            (self.first.year(), self.first.month() + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.first)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.first.year() && date.month() == self.first.month()
    }
}

impl core::fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

impl FromStr for BillingMonth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map(|first| Self { first })
            .map_err(|_| DomainError::validation(format!("invalid billing month: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingLine {
    pub order_id: RecordId,
    pub contract: String,
    pub customer: String,
    pub offering: String,
    pub qty: u32,
    pub unit: f64,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingPreview {
    pub month: String,
    pub lines: Vec<BillingLine>,
    pub total: f64,
}

impl BillingPreview {
    /// CSV export, one row per line.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Order,Contract,Customer,Offering,Qty,Unit,Amount,Currency");
        for l in &self.lines {
            out.push('\n');
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}",
                l.order_id,
                l.contract,
                quoted(&l.customer),
                quoted(&l.offering),
                l.qty,
                l.unit,
                l.amount,
                l.currency
            ));
        }
        out
    }

    pub fn file_name(&self) -> String {
        format!("billing_{}.csv", self.month)
    }
}

fn take_currency(current: &mut String, candidate: &str) {
    if !candidate.is_empty() {
        *current = candidate.to_string();
    }
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Clone, Copy)]
pub struct BillingInputs<'a> {
    pub customers: &'a [Customer],
    pub offerings: &'a [Offering],
    pub products: &'a [Product],
    pub prices: &'a [Price],
}

/// Charges for every billable order whose contract is in force during `month`.
///
/// Recurring fees come from the offering plan, the offering price and the
/// monthly components. One-off components are charged only in the month the
/// order was last modified (its delivery or close). Usage is not billed here.
pub fn billing_preview<'a>(
    month: BillingMonth,
    orders: impl IntoIterator<Item = &'a Order>,
    inputs: BillingInputs<'_>,
) -> BillingPreview {
    let first = month.first_day();
    let last = month.last_day();
    let mut lines = Vec::new();

    for order in orders {
        if !order.is_billable() {
            continue;
        }
        if order.contract_start.is_some_and(|s| s > last) || order.contract_end.is_some_and(|e| e < first) {
            continue;
        }
        let Some(off) = order
            .offering_id
            .and_then(|id| inputs.offerings.iter().find(|o| o.id == id))
        else {
            continue;
        };
        let Some(cust) = order
            .customer_id
            .and_then(|id| inputs.customers.iter().find(|c| c.id == id))
        else {
            continue;
        };

        let mut unit = 0.0;
        let mut currency = "USD".to_string();

        if let Some(plan) = &off.price_plan {
            unit += plan.monthly_fee;
            take_currency(&mut currency, &plan.currency);
        }
        if let Some(p) = find_price(inputs.prices, off.price_id.as_deref()) {
            unit += p.monthly;
            take_currency(&mut currency, &p.currency);
        }

        let one_off_month = order
            .last_modified
            .is_some_and(|ts| month.contains(ts.date_naive()));
        for comp in off.effective_components() {
            let Some(prod) = comp.product_id.and_then(|pid| find_product(inputs.products, pid)) else {
                continue;
            };
            let Some(p) = find_price(inputs.prices, prod.price_id.as_deref()) else {
                continue;
            };
            let qty = f64::from(comp.qty);
            match comp.billing {
                BillingMode::Monthly => {
                    unit += p.monthly * qty;
                    take_currency(&mut currency, &p.currency);
                }
                BillingMode::OneOff if one_off_month => {
                    unit += p.one_off * qty;
                    take_currency(&mut currency, &p.currency);
                }
                BillingMode::OneOff | BillingMode::Usage => {}
            }
        }

        lines.push(BillingLine {
            order_id: order.id,
            contract: order.contract_number.clone(),
            customer: cust.name.clone(),
            offering: off.name.clone(),
            qty: 1,
            unit,
            amount: unit,
            currency,
        });
    }

    let total = lines.iter().map(|l| l.amount).sum();
    BillingPreview {
        month: month.to_string(),
        lines,
        total,
    }
}
