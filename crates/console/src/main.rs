use anyhow::Context;

use bss_console::{Console, ConsoleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bss_observability::init();

    let config = ConsoleConfig::from_env();
    let console = Console::open(&config).await.context("failed to open console storage")?;
    console.warm().await.context("failed to load collections")?;

    let d = console.dashboard().await.context("failed to build dashboard")?;
    tracing::info!(
        customers = d.customer_total,
        tickets = d.ticket_total,
        products = d.product_total,
        orders = d.order_total,
        mrr = d.mrr,
        top_customer = d.top_customers.first().and_then(|c| c.name.as_deref()).unwrap_or("-"),
        "dashboard"
    );

    let billing = console.current_billing_preview().await.context("failed to build billing preview")?;
    tracing::info!(
        month = %billing.month,
        lines = billing.lines.len(),
        total = billing.total,
        file = %billing.file_name(),
        "billing preview"
    );

    Ok(())
}
