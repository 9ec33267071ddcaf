//! Fuzzy customer-name merge and repeat-customer tagging.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use mizan_core::{DomainResult, InvoiceId};
use mizan_invoicing::InvoiceBook;

/// Result of a merge pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// At least one group had spelling variants; `groups` of them were
    /// canonicalized.
    Merged { groups: usize },
    /// Every normalized name had a single spelling. Running the merge again
    /// with no new data always lands here (idempotence).
    NoDuplicates,
}

impl core::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MergeOutcome::Merged { groups } => write!(f, "merged {groups} customer group(s)"),
            MergeOutcome::NoDuplicates => write!(f, "no duplicate customers found"),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Default)]
struct Group {
    /// Original spellings with occurrence counts, in first-seen order.
    spellings: Vec<(String, usize)>,
    invoice_ids: Vec<InvoiceId>,
}

/// Canonicalize customer-name variants across the invoice book.
///
/// Invoices are grouped by trimmed, lower-cased name. In any group with more
/// than one distinct spelling, the most frequent spelling wins; a tie keeps
/// the first-seen spelling (insertion order, accepted nondeterminism).
/// Rewritten invoices get `last_modified = now`.
pub fn merge_duplicates(book: &mut InvoiceBook, now: DateTime<Utc>) -> DomainResult<MergeOutcome> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for invoice in book.invoices() {
        let key = normalize(&invoice.customer_name);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group::default()
        });
        match group
            .spellings
            .iter_mut()
            .find(|(spelling, _)| *spelling == invoice.customer_name)
        {
            Some((_, count)) => *count += 1,
            None => group.spellings.push((invoice.customer_name.clone(), 1)),
        }
        group.invoice_ids.push(invoice.id);
    }

    let mut merged_groups = 0;
    let mut changed = false;

    for key in &order {
        let group = &groups[key];
        if group.spellings.len() <= 1 {
            continue;
        }
        merged_groups += 1;

        // Strict greater-than keeps the earliest spelling on ties.
        let mut canonical = &group.spellings[0];
        for candidate in &group.spellings[1..] {
            if candidate.1 > canonical.1 {
                canonical = candidate;
            }
        }

        for id in &group.invoice_ids {
            let differs = book
                .get(*id)
                .is_some_and(|inv| inv.customer_name != canonical.0);
            if differs {
                book.rename_customer(*id, &canonical.0, now)?;
                changed = true;
            }
        }
    }

    if changed {
        tracing::info!(groups = merged_groups, "customer variants merged");
        Ok(MergeOutcome::Merged {
            groups: merged_groups,
        })
    } else {
        Ok(MergeOutcome::NoDuplicates)
    }
}

/// Normalized customer names appearing on more than one invoice.
///
/// Pure query for display tagging; computed fresh each time, never persisted.
pub fn repeat_customers(book: &InvoiceBook) -> HashSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for invoice in book.invoices() {
        *counts.entry(normalize(&invoice.customer_name)).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect()
}
