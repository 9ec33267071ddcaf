//! Assistant features built on the insight service: free-text project
//! analysis and the financial anomaly scan.

use serde_json::{json, Value as JsonValue};

use crate::service::{AnalysisRequest, AnalysisResponse, InsightService, ServiceError};

/// Outcome of invoking a non-reentrant assistant feature.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    Completed(T),
    /// A run was already pending; the invocation was ignored, not queued.
    Ignored,
}

/// A structured finding from the anomaly scan.
///
/// Parsed defensively from the service's JSON: missing fields stay `None`,
/// items with unknown kinds are skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightAction {
    OverdueSoon {
        invoice_id: Option<String>,
        customer_name: Option<String>,
        amount: Option<i64>,
    },
    LargeExpense {
        description: Option<String>,
        amount: Option<i64>,
    },
    RepeatCustomer {
        customer_name: Option<String>,
    },
}

impl InsightAction {
    /// Key segment identifying the action kind.
    pub fn kind(&self) -> &'static str {
        match self {
            InsightAction::OverdueSoon { .. } => "OVERDUE_SOON",
            InsightAction::LargeExpense { .. } => "LARGE_EXPENSE",
            InsightAction::RepeatCustomer { .. } => "REPEAT_CUSTOMER",
        }
    }

    /// Key segment identifying the subject (invoice, expense or customer).
    pub fn subject(&self) -> String {
        match self {
            InsightAction::OverdueSoon {
                invoice_id,
                customer_name,
                ..
            } => invoice_id
                .clone()
                .or_else(|| customer_name.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            InsightAction::LargeExpense { description, .. } => description
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            InsightAction::RepeatCustomer { customer_name } => customer_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    /// Human-readable alert body.
    pub fn message(&self) -> String {
        match self {
            InsightAction::OverdueSoon {
                customer_name,
                amount,
                ..
            } => format!(
                "Invoice for {} worth {} may go overdue soon",
                customer_name.as_deref().unwrap_or("a customer"),
                amount.unwrap_or(0)
            ),
            InsightAction::LargeExpense {
                description,
                amount,
            } => format!(
                "Unusually large expense: {} ({})",
                description.as_deref().unwrap_or("unlabeled"),
                amount.unwrap_or(0)
            ),
            InsightAction::RepeatCustomer { customer_name } => format!(
                "{} is a returning customer",
                customer_name.as_deref().unwrap_or("A customer")
            ),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InsightAction::OverdueSoon { .. } => "Payment due soon",
            InsightAction::LargeExpense { .. } => "Large expense",
            InsightAction::RepeatCustomer { .. } => "Returning customer",
        }
    }
}

/// Result of one anomaly scan run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyScan {
    pub summary: String,
    pub actions: Vec<InsightAction>,
}

/// Per-feature pending/result state.
#[derive(Debug)]
struct FeatureSlot<T> {
    loading: bool,
    result: Option<T>,
}

impl<T> Default for FeatureSlot<T> {
    fn default() -> Self {
        Self {
            loading: false,
            result: None,
        }
    }
}

impl<T> FeatureSlot<T> {
    /// Claim the slot. False means a run is already pending.
    fn try_begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.result = None;
        true
    }

    fn finish(&mut self, result: Option<T>) {
        self.loading = false;
        self.result = result;
    }
}

/// Holds the loading flags and last results for the assistant features.
///
/// Invocations are not re-entrant: a second call while one is pending is
/// ignored at this boundary, independent of any UI disabling.
#[derive(Debug, Default)]
pub struct Assistant {
    analysis: FeatureSlot<String>,
    scan: FeatureSlot<AnomalyScan>,
}

impl Assistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_analysis_pending(&self) -> bool {
        self.analysis.loading
    }

    pub fn is_scan_pending(&self) -> bool {
        self.scan.loading
    }

    pub fn last_analysis(&self) -> Option<&str> {
        self.analysis.result.as_deref()
    }

    pub fn last_scan(&self) -> Option<&AnomalyScan> {
        self.scan.result.as_ref()
    }

    /// Free-text feasibility analysis of a project description.
    pub async fn analyze_project(
        &mut self,
        service: &dyn InsightService,
        description: &str,
    ) -> Result<RunOutcome<String>, ServiceError> {
        if !self.analysis.try_begin() {
            return Ok(RunOutcome::Ignored);
        }

        let request = AnalysisRequest::text(format!(
            "You advise a small business owner. Assess the feasibility of this \
             project and list concrete risks and next steps.\n\n{description}"
        ));

        let outcome = service.analyze(request).await;
        match outcome {
            Ok(AnalysisResponse::Text(text)) => {
                self.analysis.finish(Some(text.clone()));
                Ok(RunOutcome::Completed(text))
            }
            Ok(AnalysisResponse::Structured(value)) => {
                // Tolerate a structured reply by flattening it to text.
                let text = value.to_string();
                self.analysis.finish(Some(text.clone()));
                Ok(RunOutcome::Completed(text))
            }
            Err(e) => {
                tracing::warn!(error = %e, "project analysis failed");
                self.analysis.finish(None);
                Err(e)
            }
        }
    }

    /// Scan bookkeeping data for anomalies.
    ///
    /// `context` is the caller-assembled snapshot (transactions + invoices)
    /// serialized to JSON; this crate does not reach into the ledgers.
    pub async fn scan_anomalies(
        &mut self,
        service: &dyn InsightService,
        context: JsonValue,
    ) -> Result<RunOutcome<AnomalyScan>, ServiceError> {
        if !self.scan.try_begin() {
            return Ok(RunOutcome::Ignored);
        }

        let request = AnalysisRequest::structured(
            format!(
                "You are a bookkeeping assistant. Inspect this data for invoices \
                 at risk of going overdue, unusually large expenses and repeat \
                 customers.\n\n{context}"
            ),
            scan_schema(),
        );

        let outcome = service.analyze(request).await;
        let value = match outcome {
            Ok(AnalysisResponse::Structured(value)) => value,
            Ok(AnalysisResponse::Text(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    self.scan.finish(None);
                    return Err(ServiceError::Malformed(e.to_string()));
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "anomaly scan failed");
                self.scan.finish(None);
                return Err(e);
            }
        };

        let scan = parse_scan(&value);
        self.scan.finish(Some(scan.clone()));
        Ok(RunOutcome::Completed(scan))
    }
}

/// Output schema requested from the service for the anomaly scan.
fn scan_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "actions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string" },
                        "invoiceId": { "type": "string" },
                        "transactionId": { "type": "string" },
                        "customerName": { "type": "string" },
                        "amount": { "type": "number" },
                        "description": { "type": "string" }
                    }
                }
            }
        }
    })
}

fn parse_scan(value: &JsonValue) -> AnomalyScan {
    let summary = value
        .get("summary")
        .and_then(JsonValue::as_str)
        .unwrap_or("")
        .to_string();

    let actions = value
        .get("actions")
        .and_then(JsonValue::as_array)
        .map(|items| items.iter().filter_map(parse_action).collect())
        .unwrap_or_default();

    AnomalyScan { summary, actions }
}

fn parse_action(item: &JsonValue) -> Option<InsightAction> {
    let str_field = |name: &str| {
        item.get(name)
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            // Tolerate numeric ids from the service.
            .or_else(|| item.get(name).and_then(JsonValue::as_i64).map(|n| n.to_string()))
    };
    let amount = item
        .get("amount")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)));

    match item.get("type").and_then(JsonValue::as_str) {
        Some("OVERDUE_SOON") => Some(InsightAction::OverdueSoon {
            invoice_id: str_field("invoiceId"),
            customer_name: str_field("customerName"),
            amount,
        }),
        Some("LARGE_EXPENSE") => Some(InsightAction::LargeExpense {
            description: str_field("description"),
            amount,
        }),
        Some("REPEAT_CUSTOMER") => Some(InsightAction::RepeatCustomer {
            customer_name: str_field("customerName"),
        }),
        _ => None,
    }
}
