use serde::{Deserialize, Serialize};

/// Order pipeline stage, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStage {
    #[default]
    Prospect,
    Negotiation,
    Contract,
    Activation,
    Delivery,
    Closed,
}

impl OrderStage {
    pub const ALL: [OrderStage; 6] = [
        OrderStage::Prospect,
        OrderStage::Negotiation,
        OrderStage::Contract,
        OrderStage::Activation,
        OrderStage::Delivery,
        OrderStage::Closed,
    ];

    /// The following stage; `None` for closed orders.
    pub fn next(self) -> Option<OrderStage> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// Stages whose orders are invoiced.
    pub fn is_billable(self) -> bool {
        matches!(self, OrderStage::Delivery | OrderStage::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStage::Prospect => "prospect",
            OrderStage::Negotiation => "negotiation",
            OrderStage::Contract => "contract",
            OrderStage::Activation => "activation",
            OrderStage::Delivery => "delivery",
            OrderStage::Closed => "closed",
        }
    }
}

impl core::fmt::Display for OrderStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
