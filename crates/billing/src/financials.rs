use serde::Serialize;

use bss_catalog::{find_price, find_product, BillingMode, Offering, Price, Product};

/// Up-front and recurring value of an offering as sold on one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFinancials {
    pub setup_fee: f64,
    /// Setup fee plus one-off components.
    pub one_off_total: f64,
    /// Plan monthly fee plus monthly components.
    pub monthly_total: f64,
    pub currency: String,
}

pub fn order_financials(offering: &Offering, products: &[Product], prices: &[Price]) -> OrderFinancials {
    let mut one_off = offering.setup_fee();
    let mut monthly = offering.monthly_fee();
    let currency = offering
        .price_plan
        .as_ref()
        .map(|p| p.currency.clone())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "USD".to_string());

    for comp in offering.effective_components() {
        let price = comp
            .product_id
            .and_then(|pid| find_product(products, pid))
            .and_then(|p| find_price(prices, p.price_id.as_deref()));
        let Some(price) = price else {
            continue;
        };
        let qty = f64::from(comp.qty);
        match comp.billing {
            BillingMode::OneOff => one_off += price.one_off * qty,
            BillingMode::Monthly => monthly += price.monthly * qty,
            BillingMode::Usage => {}
        }
    }

    OrderFinancials {
        setup_fee: offering.setup_fee(),
        one_off_total: one_off,
        monthly_total: monthly,
        currency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bss_catalog::{Component, PricePlan};
    use bss_core::RecordId;

    #[test]
    fn splits_one_off_and_recurring() {
        let offering = Offering {
            price_plan: Some(PricePlan { setup_fee: 250.0, monthly_fee: 30.0, currency: "EUR".into() }),
            components: vec![
                Component::new(RecordId::new(1), 2, BillingMode::OneOff),
                Component::new(RecordId::new(2), 3, BillingMode::Monthly),
                Component::new(RecordId::new(3), 1, BillingMode::Usage),
                Component::new(RecordId::new(9), 1, BillingMode::OneOff),
            ],
            ..Offering::default()
        };
        let products: Vec<Product> = (1..=3)
            .map(|i| Product { id: RecordId::new(i), price_id: Some(format!("P{i}")), ..Product::default() })
            .collect();
        let prices: Vec<Price> = (1..=3)
            .map(|i| Price { price_id: format!("P{i}"), one_off: 100.0, monthly: 5.0, usage: 1.0, ..Price::default() })
            .collect();

        let f = order_financials(&offering, &products, &prices);
        assert_eq!(f.setup_fee, 250.0);
        assert_eq!(f.one_off_total, 450.0);
        assert_eq!(f.monthly_total, 45.0);
        assert_eq!(f.currency, "EUR");
    }

    #[test]
    fn bare_offering_is_zero_usd() {
        let f = order_financials(&Offering::default(), &[], &[]);
        assert_eq!((f.one_off_total, f.monthly_total), (0.0, 0.0));
        assert_eq!(f.currency, "USD");
    }
}
