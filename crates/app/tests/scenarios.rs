//! Black-box scenarios driven through the console action surface.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use mizan_accounting::TransactionKind;
use mizan_ai::{AnalysisRequest, AnalysisResponse, InsightService, RunOutcome, ServiceError};
use mizan_app::{Console, DataCategory};
use mizan_core::Confirmation;
use mizan_entitlement::{Access, OwnerRegistry, Tier};
use mizan_invoicing::{InvoiceDraft, InvoiceItem, InvoiceStatus};
use mizan_store::{MemoryStore, StateStore, StorageKey, StoreError};

fn now() -> DateTime<Utc> {
    "2026-02-10T12:00:00Z".parse().expect("fixed timestamp")
}

fn owners() -> OwnerRegistry {
    OwnerRegistry::new(["owner@mizan.example"])
}

fn fresh_console() -> Console {
    Console::load(Box::new(MemoryStore::new()), owners(), now())
}

/// Store handle that survives a console reload (shared in-memory backing).
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl StateStore for SharedStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        self.0.borrow().read(key)
    }

    fn write(&mut self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().write(key, value)
    }
}

#[test]
fn scenario_direct_sale_updates_all_three_ledgers() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());

    let widget = console.add_product("Widget", 10, 5, now()).unwrap();
    let invoice_id = console.sell_product(widget, "Alice", "0100", now()).unwrap();

    let invoice = console.invoices().get(invoice_id).unwrap();
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.items[0].quantity, 1);
    assert_eq!(invoice.items[0].price_at_purchase, 10);
    assert_eq!(invoice.status, InvoiceStatus::Paid);

    assert_eq!(console.products().get(widget).unwrap().stock, 4);

    let rows = console.transactions().transactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TransactionKind::Income);
    assert_eq!(rows[0].amount, 10);
}

#[test]
fn scenario_merge_canonicalizes_name_variants() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());
    let widget = console.add_product("Widget", 10, 5, now()).unwrap();

    console.sell_product(widget, "john", "", now()).unwrap();
    console.sell_product(widget, "John ", "", now()).unwrap();

    console.merge_customers(now()).unwrap();
    // Tied 1-1: the first-encountered spelling wins.
    for invoice in console.invoices().invoices() {
        assert_eq!(invoice.customer_name, "john");
    }

    // Idempotent: a second run finds nothing.
    let second = console.merge_customers(now()).unwrap();
    assert_eq!(format!("{second}"), "no duplicate customers found");
}

#[test]
fn scenario_low_stock_alert_is_emitted_once() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());

    let widget = console.add_product("Widget", 10, 4, now()).unwrap();
    assert!(console.notifications().is_empty());

    // Stock drops to 3: one alert.
    console.sell_product(widget, "Alice", "", now()).unwrap();
    let after_sale = console.notifications().len();
    assert_eq!(after_sale, 1);

    // Unrelated mutation re-runs generation; no duplicate appears.
    console
        .add_transaction("Misc", 5, TransactionKind::Income, now().date_naive())
        .unwrap();
    console.add_product("Gadget", 20, 50, now()).unwrap();
    assert_eq!(console.notifications().len(), 1);
}

#[test]
fn scenario_overdue_alert_lifecycle() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());
    let widget = console.add_product("Widget", 10, 50, now()).unwrap();

    let yesterday = now().date_naive() - Duration::days(1);
    let invoice_id = console
        .add_invoice(
            InvoiceDraft {
                customer_name: "Alice".to_string(),
                customer_phone: String::new(),
                items: vec![InvoiceItem {
                    product_id: widget,
                    quantity: 1,
                    price_at_purchase: 10,
                }],
                date: yesterday,
                status: InvoiceStatus::Unpaid,
            },
            now(),
        )
        .unwrap();

    assert_eq!(console.notifications().len(), 1);
    let emitted = console.notifications().notifications()[0].clone();
    assert!(emitted.id.as_str().starts_with("overdue-"));

    // Paying the invoice stops future candidates but does not revoke the
    // already-emitted alert.
    let mut paid = console.invoices().get(invoice_id).unwrap().clone();
    paid.status = InvoiceStatus::Paid;
    console.update_invoice(paid, now()).unwrap();
    assert_eq!(console.notifications().len(), 1);
    assert_eq!(console.notifications().notifications()[0], emitted);
}

#[test]
fn scenario_invalid_products_are_rejected() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());

    assert!(console.add_product("Widget", 0, 5, now()).is_err());
    assert!(console.add_product("Widget", 10, -1, now()).is_err());
    assert!(console.products().is_empty());
}

#[test]
fn free_tier_product_limit_applies_at_the_action_boundary() {
    // No registration: a plain free account with no trial.
    let mut console = fresh_console();
    console.login("merchant@example.com");
    assert_eq!(console.check_access(now()), Access::Denied);

    for i in 0..7 {
        console.add_product(&format!("P{i}"), 10, 1, now()).unwrap();
    }
    let err = console.add_product("P8", 10, 1, now()).unwrap_err();
    assert!(err.to_string().contains("limited"));

    // The same catalog size is fine once entitled.
    console.upgrade_to_pro();
    console.add_product("P8", 10, 1, now()).unwrap();
    assert_eq!(console.products().len(), 8);
}

#[test]
fn owner_login_is_pro_without_trial() {
    let mut console = fresh_console();
    console.register("owner@mizan.example", now());
    assert_eq!(console.tier(now()), Tier::Owner);
    assert_eq!(console.days_left_in_trial(now()), 0);
    assert_eq!(console.check_access(now()), Access::Granted);
}

#[test]
fn state_survives_a_reload_from_the_same_store() {
    let store = SharedStore::default();

    let mut console = Console::load(Box::new(store.clone()), owners(), now());
    console.register("merchant@example.com", now());
    let widget = console.add_product("Widget", 10, 5, now()).unwrap();
    console.sell_product(widget, "Alice", "0100", now()).unwrap();
    console.set_language("ar");
    drop(console);

    let reloaded = Console::load(Box::new(store), owners(), now());
    assert_eq!(reloaded.account().user_email.as_deref(), Some("merchant@example.com"));
    assert!(reloaded.account().is_trial_active(now()));
    assert_eq!(reloaded.products().get(widget).unwrap().stock, 4);
    assert_eq!(reloaded.invoices().len(), 1);
    assert_eq!(reloaded.transactions().len(), 1);
    assert_eq!(reloaded.language(), "ar");
}

#[test]
fn destructive_actions_respect_declined_confirmation() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());
    let widget = console.add_product("Widget", 10, 5, now()).unwrap();
    let invoice = console.sell_product(widget, "Alice", "", now()).unwrap();

    assert!(!console.clear_category(DataCategory::Products, Confirmation::Declined));
    assert_eq!(console.products().len(), 1);

    assert_eq!(console.delete_invoice(invoice, Confirmation::Declined), Ok(false));
    assert_eq!(console.invoices().len(), 1);

    assert!(!console.reset_all(Confirmation::Declined));
    assert_eq!(console.transactions().len(), 1);

    assert!(console.reset_all(Confirmation::Confirmed));
    assert!(console.products().is_empty());
    assert!(console.invoices().is_empty());
    assert!(console.transactions().is_empty());
    assert!(console.notifications().is_empty());
    // The session itself is untouched by a data reset.
    assert!(console.account().logged_in());
}

#[test]
fn pay_salary_records_an_expense_row() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());
    let employee = console
        .add_employee("Omar", "Cashier", 6000, now().date_naive())
        .unwrap();

    console.pay_salary(employee, now()).unwrap();

    let rows = console.transactions().transactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TransactionKind::Expense);
    assert_eq!(rows[0].amount, 6000);
    assert!(rows[0].description.contains("Omar"));
    assert_eq!(console.totals().net_profit, -6000);
}

struct CannedInsights;

#[async_trait]
impl InsightService for CannedInsights {
    async fn analyze(&self, _request: AnalysisRequest) -> Result<AnalysisResponse, ServiceError> {
        Ok(AnalysisResponse::Structured(json!({
            "summary": "One repeat customer.",
            "actions": [
                { "type": "REPEAT_CUSTOMER", "customerName": "Alice" }
            ]
        })))
    }
}

#[tokio::test]
async fn anomaly_scan_notifications_append_on_every_run() {
    let mut console = fresh_console();
    console.register("merchant@example.com", now());

    let service = CannedInsights;
    let first = console.run_anomaly_scan(&service, now()).await.unwrap();
    assert!(matches!(first, RunOutcome::Completed(_)));
    assert_eq!(console.notifications().len(), 1);

    // Insight keys embed the generation timestamp, so a later run appends a
    // fresh entry instead of deduplicating.
    let later = now() + Duration::seconds(1);
    console.run_anomaly_scan(&service, later).await.unwrap();
    assert_eq!(console.notifications().len(), 2);
}
