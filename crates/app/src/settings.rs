//! Invoice branding configuration.

use serde::{Deserialize, Serialize};

/// Company details printed on invoices. Configuration, not a ledger entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceSettings {
    pub logo: Option<String>,
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            logo: None,
            company_name: "Mizan Console".to_string(),
            company_address: String::new(),
            company_email: String::new(),
        }
    }
}
