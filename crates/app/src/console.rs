//! The root controller: one value owning every ledger and the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use mizan_accounting::{MonthlyFlow, Totals, TransactionBook, TransactionKind};
use mizan_ai::{AnomalyScan, Assistant, InsightService, RunOutcome, ServiceError};
use mizan_core::{Confirmation, DomainError, DomainResult, EmployeeId, InvoiceId, ProductId, TransactionId};
use mizan_entitlement::{Access, Account, OwnerRegistry, Tier};
use mizan_inventory::Catalog;
use mizan_invoicing::{Invoice, InvoiceBook, InvoiceDraft, RecencyPartition};
use mizan_notifications::{Notification, NotificationFeed, NotificationId};
use mizan_parties::{merge_duplicates, repeat_customers, MergeOutcome};
use mizan_payroll::{Employee, EmployeeRegistry};
use mizan_store::{load_or_default, persist, StateStore, StorageKey};

use crate::settings::InvoiceSettings;

/// A clearable slice of console data (admin surface).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataCategory {
    Transactions,
    Products,
    Invoices,
}

/// Owns all console state. Every mutating action applies its ledger changes
/// as one in-memory update, then mirrors the owning keys to the store
/// best-effort and regenerates derived notifications where relevant.
pub struct Console {
    store: Box<dyn StateStore>,
    owners: OwnerRegistry,
    account: Account,
    catalog: Catalog,
    transactions: TransactionBook,
    invoices: InvoiceBook,
    employees: EmployeeRegistry,
    notifications: NotificationFeed,
    settings: InvoiceSettings,
    language: String,
    assistant: Assistant,
}

impl Console {
    /// Read every key from the store (missing or unparsable state degrades to
    /// defaults) and derive the initial notification set.
    pub fn load(store: Box<dyn StateStore>, owners: OwnerRegistry, now: DateTime<Utc>) -> Self {
        let account = Account {
            user_email: load_or_default(store.as_ref(), StorageKey::UserEmail),
            is_pro: load_or_default(store.as_ref(), StorageKey::IsPro),
            trial_started_at: load_or_default(store.as_ref(), StorageKey::TrialStartDate),
            has_registered: load_or_default(store.as_ref(), StorageKey::HasRegistered),
        };
        let language: String = load_or_default(store.as_ref(), StorageKey::Language);

        let mut console = Self {
            catalog: load_or_default(store.as_ref(), StorageKey::Products),
            transactions: load_or_default(store.as_ref(), StorageKey::Transactions),
            invoices: load_or_default(store.as_ref(), StorageKey::Invoices),
            employees: load_or_default(store.as_ref(), StorageKey::Employees),
            notifications: load_or_default(store.as_ref(), StorageKey::Notifications),
            settings: load_or_default(store.as_ref(), StorageKey::InvoiceSettings),
            language: if language.is_empty() { "en".to_string() } else { language },
            account,
            owners,
            assistant: Assistant::new(),
            store,
        };
        console.refresh_notifications(now);
        console
    }

    // ── Session & entitlement ────────────────────────────────────────────

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn login(&mut self, email: &str) {
        self.account.login(email, &self.owners);
        self.persist_account();
    }

    pub fn register(&mut self, email: &str, now: DateTime<Utc>) {
        self.account.register(email, &self.owners, now);
        self.persist_account();
    }

    pub fn logout(&mut self) {
        self.account.logout();
        self.persist_account();
    }

    pub fn upgrade_to_pro(&mut self) {
        self.account.upgrade_to_pro();
        self.persist_account();
    }

    pub fn tier(&self, now: DateTime<Utc>) -> Tier {
        self.account.tier(&self.owners, now)
    }

    /// Gate check for protected pages/actions (accounting, invoices, pro
    /// add-ons). Advisory: ledger operations are never blocked by it.
    pub fn check_access(&self, now: DateTime<Utc>) -> Access {
        self.account.check(&self.owners, now)
    }

    pub fn days_left_in_trial(&self, now: DateTime<Utc>) -> i64 {
        self.account.days_left_in_trial(now)
    }

    /// Free-tier accounts are capped at `FREE_TIER_PRODUCT_LIMIT` products.
    pub fn product_limit_reached(&self, now: DateTime<Utc>) -> bool {
        self.check_access(now) == Access::Denied && self.catalog.free_limit_reached()
    }

    // ── Inventory ────────────────────────────────────────────────────────

    pub fn products(&self) -> &Catalog {
        &self.catalog
    }

    pub fn add_product(
        &mut self,
        name: &str,
        price: i64,
        stock: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<ProductId> {
        if self.product_limit_reached(now) {
            return Err(DomainError::validation(
                "free plan is limited to 7 products",
            ));
        }
        let id = self.catalog.add(name, price, stock)?;
        persist(self.store.as_mut(), StorageKey::Products, &self.catalog);
        self.refresh_notifications(now);
        Ok(id)
    }

    // ── Accounting & payroll ─────────────────────────────────────────────

    pub fn transactions(&self) -> &TransactionBook {
        &self.transactions
    }

    pub fn totals(&self) -> Totals {
        self.transactions.totals()
    }

    pub fn monthly_series(&self) -> Vec<MonthlyFlow> {
        self.transactions.monthly_series()
    }

    pub fn add_transaction(
        &mut self,
        description: &str,
        amount: i64,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> DomainResult<TransactionId> {
        let id = self.transactions.record(description, amount, kind, date)?;
        persist(self.store.as_mut(), StorageKey::Transactions, &self.transactions);
        Ok(id)
    }

    pub fn employees(&self) -> &EmployeeRegistry {
        &self.employees
    }

    pub fn add_employee(
        &mut self,
        name: &str,
        position: &str,
        salary: i64,
        join_date: NaiveDate,
    ) -> DomainResult<EmployeeId> {
        let id = self.employees.add(name, position, salary, join_date)?;
        persist(self.store.as_mut(), StorageKey::Employees, &self.employees);
        Ok(id)
    }

    pub fn update_employee(&mut self, employee: Employee) -> DomainResult<()> {
        self.employees.update(employee)?;
        persist(self.store.as_mut(), StorageKey::Employees, &self.employees);
        Ok(())
    }

    pub fn remove_employee(
        &mut self,
        id: EmployeeId,
        confirmation: Confirmation,
    ) -> DomainResult<bool> {
        let removed = self.employees.remove(id, confirmation)?;
        if removed {
            persist(self.store.as_mut(), StorageKey::Employees, &self.employees);
        }
        Ok(removed)
    }

    /// Record this month's salary for one employee as an expense.
    pub fn pay_salary(
        &mut self,
        employee_id: EmployeeId,
        now: DateTime<Utc>,
    ) -> DomainResult<TransactionId> {
        let employee = self.employees.get(employee_id).ok_or(DomainError::NotFound)?;
        let expense = employee.salary_expense(&now.format("%B %Y").to_string());
        let id = self.transactions.record(
            &expense.description,
            expense.amount,
            TransactionKind::Expense,
            now.date_naive(),
        )?;
        persist(self.store.as_mut(), StorageKey::Transactions, &self.transactions);
        Ok(id)
    }

    // ── Invoicing ────────────────────────────────────────────────────────

    pub fn invoices(&self) -> &InvoiceBook {
        &self.invoices
    }

    pub fn partition_invoices(&self, today: NaiveDate) -> RecencyPartition<'_> {
        self.invoices.partition_by_recency(today)
    }

    pub fn add_invoice(&mut self, draft: InvoiceDraft, now: DateTime<Utc>) -> DomainResult<InvoiceId> {
        let id = self
            .invoices
            .create(draft, &mut self.catalog, &mut self.transactions, now)?;
        self.persist_sale_ledgers();
        self.refresh_notifications(now);
        Ok(id)
    }

    /// One-unit direct sale: a single-item, immediately paid invoice.
    pub fn sell_product(
        &mut self,
        product_id: ProductId,
        customer_name: &str,
        customer_phone: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<InvoiceId> {
        let id = self.invoices.sell_product(
            product_id,
            customer_name,
            customer_phone,
            &mut self.catalog,
            &mut self.transactions,
            now,
        )?;
        self.persist_sale_ledgers();
        self.refresh_notifications(now);
        Ok(id)
    }

    pub fn update_invoice(&mut self, invoice: Invoice, now: DateTime<Utc>) -> DomainResult<()> {
        self.invoices.update(invoice, now)?;
        persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
        self.refresh_notifications(now);
        Ok(())
    }

    pub fn delete_invoice(
        &mut self,
        id: InvoiceId,
        confirmation: Confirmation,
    ) -> DomainResult<bool> {
        let removed = self.invoices.remove(id, confirmation)?;
        if removed {
            persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
        }
        Ok(removed)
    }

    pub fn mark_invoice_overdue(&mut self, id: InvoiceId, now: DateTime<Utc>) -> DomainResult<()> {
        self.invoices.mark_overdue(id, now)?;
        persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
        Ok(())
    }

    // ── Customer identity ────────────────────────────────────────────────

    pub fn merge_customers(&mut self, now: DateTime<Utc>) -> DomainResult<MergeOutcome> {
        let outcome = merge_duplicates(&mut self.invoices, now)?;
        if matches!(outcome, MergeOutcome::Merged { .. }) {
            persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
        }
        Ok(outcome)
    }

    pub fn repeat_customers(&self) -> std::collections::HashSet<String> {
        repeat_customers(&self.invoices)
    }

    // ── Notifications ────────────────────────────────────────────────────

    pub fn notifications(&self) -> &NotificationFeed {
        &self.notifications
    }

    pub fn mark_notification_read(&mut self, id: &NotificationId) {
        self.notifications.mark_read(id);
        persist(self.store.as_mut(), StorageKey::Notifications, &self.notifications);
    }

    pub fn mark_all_notifications_read(&mut self) {
        self.notifications.mark_all_read();
        persist(self.store.as_mut(), StorageKey::Notifications, &self.notifications);
    }

    // ── AI add-ons ───────────────────────────────────────────────────────

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub async fn run_project_analysis(
        &mut self,
        service: &dyn InsightService,
        description: &str,
    ) -> Result<RunOutcome<String>, ServiceError> {
        self.assistant.analyze_project(service, description).await
    }

    /// Run the anomaly scan over the bookkeeping data. Findings become
    /// timestamp-keyed notifications, appended fresh on every run.
    pub async fn run_anomaly_scan(
        &mut self,
        service: &dyn InsightService,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome<AnomalyScan>, ServiceError> {
        let context = json!({
            "transactions": self.transactions.transactions(),
            "invoices": self.invoices.invoices(),
        });

        let outcome = self.assistant.scan_anomalies(service, context).await?;
        if let RunOutcome::Completed(scan) = &outcome {
            let candidates: Vec<Notification> = scan
                .actions
                .iter()
                .map(|action| {
                    Notification::new(
                        NotificationId::insight(action.kind(), &action.subject(), now),
                        action.title(),
                        action.message(),
                        now,
                    )
                })
                .collect();
            if self.notifications.push(candidates) > 0 {
                persist(self.store.as_mut(), StorageKey::Notifications, &self.notifications);
            }
        }
        Ok(outcome)
    }

    // ── Settings & admin ─────────────────────────────────────────────────

    pub fn settings(&self) -> &InvoiceSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: InvoiceSettings) {
        self.settings = settings;
        persist(self.store.as_mut(), StorageKey::InvoiceSettings, &self.settings);
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
        persist(self.store.as_mut(), StorageKey::Language, &self.language);
    }

    /// Wipe one data category. Confirmation-gated; declining is a no-op.
    pub fn clear_category(&mut self, category: DataCategory, confirmation: Confirmation) -> bool {
        if !confirmation.is_confirmed() {
            return false;
        }
        match category {
            DataCategory::Transactions => {
                self.transactions.clear();
                persist(self.store.as_mut(), StorageKey::Transactions, &self.transactions);
            }
            DataCategory::Products => {
                self.catalog.clear();
                persist(self.store.as_mut(), StorageKey::Products, &self.catalog);
            }
            DataCategory::Invoices => {
                self.invoices.clear();
                persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
            }
        }
        tracing::info!(?category, "data category cleared");
        true
    }

    /// Full data reset. Leaves the account (session, tier, trial) untouched.
    pub fn reset_all(&mut self, confirmation: Confirmation) -> bool {
        if !confirmation.is_confirmed() {
            return false;
        }
        self.catalog.clear();
        self.transactions.clear();
        self.invoices.clear();
        self.employees.clear();
        self.notifications.clear();
        self.settings = InvoiceSettings::default();
        persist(self.store.as_mut(), StorageKey::Products, &self.catalog);
        persist(self.store.as_mut(), StorageKey::Transactions, &self.transactions);
        persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
        persist(self.store.as_mut(), StorageKey::Employees, &self.employees);
        persist(self.store.as_mut(), StorageKey::Notifications, &self.notifications);
        persist(self.store.as_mut(), StorageKey::InvoiceSettings, &self.settings);
        tracing::info!("console data reset");
        true
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn persist_account(&mut self) {
        persist(self.store.as_mut(), StorageKey::UserEmail, &self.account.user_email);
        persist(self.store.as_mut(), StorageKey::IsPro, &self.account.is_pro);
        persist(self.store.as_mut(), StorageKey::TrialStartDate, &self.account.trial_started_at);
        persist(self.store.as_mut(), StorageKey::HasRegistered, &self.account.has_registered);
    }

    /// Invoice creation touches three ledgers; mirror all of them.
    fn persist_sale_ledgers(&mut self) {
        persist(self.store.as_mut(), StorageKey::Products, &self.catalog);
        persist(self.store.as_mut(), StorageKey::Transactions, &self.transactions);
        persist(self.store.as_mut(), StorageKey::Invoices, &self.invoices);
    }

    /// Re-derive rule-based alerts after invoice or product changes.
    fn refresh_notifications(&mut self, now: DateTime<Utc>) {
        let added = self
            .notifications
            .refresh(&self.invoices, &self.catalog, now.date_naive(), now);
        if added > 0 {
            persist(self.store.as_mut(), StorageKey::Notifications, &self.notifications);
        }
    }
}
