//! Scripted walkthrough of the console happy path.
//!
//! Runs against the in-memory store with a canned insight service, so it
//! exercises the full action surface without a browser or a network.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use mizan_ai::{AnalysisRequest, AnalysisResponse, InsightService, ServiceError};
use mizan_app::Console;
use mizan_core::Confirmation;
use mizan_entitlement::OwnerRegistry;
use mizan_invoicing::{InvoiceDraft, InvoiceItem, InvoiceStatus};
use mizan_store::MemoryStore;

/// Canned stand-in for the generative-AI service.
struct CannedInsights;

#[async_trait]
impl InsightService for CannedInsights {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, ServiceError> {
        if request.schema.is_some() {
            Ok(AnalysisResponse::Structured(json!({
                "summary": "Cash flow looks healthy; one invoice needs attention.",
                "actions": [
                    { "type": "REPEAT_CUSTOMER", "customerName": "Alice" }
                ]
            })))
        } else {
            Ok(AnalysisResponse::Text(
                "The expansion is feasible if supplier terms stay fixed.".to_string(),
            ))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    mizan_observability::init();

    let now = Utc::now();
    let owners = OwnerRegistry::new(["owner@mizan.example"]);
    let mut console = Console::load(Box::new(MemoryStore::new()), owners, now);

    console.register("merchant@example.com", now);
    tracing::info!(
        tier = ?console.tier(now),
        days_left = console.days_left_in_trial(now),
        "registered"
    );

    let widget = console.add_product("Widget", 1500, 4, now)?;
    let gadget = console.add_product("Gadget", 900, 10, now)?;

    // Direct one-unit sale: invoice + income row + stock decrement in one go.
    console.sell_product(widget, "Alice", "0100-555-0199", now)?;

    // A multi-line unpaid invoice under a name variant.
    console.add_invoice(
        InvoiceDraft {
            customer_name: "alice ".to_string(),
            customer_phone: "0100-555-0199".to_string(),
            items: vec![InvoiceItem {
                product_id: gadget,
                quantity: 2,
                price_at_purchase: 900,
            }],
            date: now.date_naive(),
            status: InvoiceStatus::Unpaid,
        },
        now,
    )?;

    let outcome = console.merge_customers(now)?;
    tracing::info!(%outcome, "customer merge");

    let employee = console.add_employee("Omar", "Cashier", 6000, now.date_naive())?;
    console.pay_salary(employee, now)?;

    let totals = console.totals();
    tracing::info!(
        income = totals.total_income,
        net = totals.net_profit,
        "books after the morning"
    );

    let service = CannedInsights;
    console.run_project_analysis(&service, "Open a second store").await?;
    console.run_anomaly_scan(&service, now).await?;

    for n in console.notifications().notifications() {
        tracing::info!(id = %n.id, title = %n.title, "notification");
    }

    console.reset_all(Confirmation::Confirmed);
    tracing::info!("demo finished");
    Ok(())
}
