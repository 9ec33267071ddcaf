//! Account state and tier evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of the free trial started at registration.
pub const TRIAL_DURATION_DAYS: i64 = 15;

/// Case-insensitive registry of owner email addresses.
///
/// Owner accounts bypass gating entirely and never enter a trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerRegistry {
    emails: Vec<String>,
}

impl OwnerRegistry {
    pub fn new(emails: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            emails: emails.into_iter().map(|e| e.into().to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.emails.iter().any(|e| *e == email)
    }
}

/// Effective entitlement tier, in gating precedence order (highest last).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Trial,
    Pro,
    Owner,
}

/// Outcome of a gate check for a protected page or action.
///
/// Deliberately an enum rather than an error: a denied check is an expected
/// branch, not a failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

impl Access {
    pub fn is_granted(self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Persisted account flags.
///
/// Pro and trial are mutually exclusive: upgrading clears any running trial,
/// and owner logins force `is_pro` without ever starting one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_email: Option<String>,
    pub is_pro: bool,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub has_registered: bool,
}

impl Account {
    pub fn logged_in(&self) -> bool {
        self.user_email.is_some()
    }

    /// Sign in. Owner emails are force-promoted to pro.
    pub fn login(&mut self, email: impl Into<String>, owners: &OwnerRegistry) {
        let email = email.into();
        if owners.contains(&email) {
            self.is_pro = true;
        }
        tracing::info!(email = %email, "account login");
        self.user_email = Some(email);
    }

    /// First-time registration. Starts the trial clock for non-owner emails.
    pub fn register(&mut self, email: impl Into<String>, owners: &OwnerRegistry, now: DateTime<Utc>) {
        let email = email.into();
        let is_owner = owners.contains(&email);
        self.login(email, owners);
        self.has_registered = true;
        if !is_owner {
            self.trial_started_at = Some(now);
            tracing::info!(days = TRIAL_DURATION_DAYS, "trial started");
        }
    }

    /// Sign out, dropping session-bound entitlements.
    pub fn logout(&mut self) {
        self.user_email = None;
        self.is_pro = false;
        self.trial_started_at = None;
    }

    /// Permanent upgrade. Ends any running trial (pro wins).
    pub fn upgrade_to_pro(&mut self) {
        self.is_pro = true;
        self.trial_started_at = None;
    }

    pub fn is_owner(&self, owners: &OwnerRegistry) -> bool {
        self.user_email
            .as_deref()
            .is_some_and(|email| owners.contains(email))
    }

    /// Whole days of trial remaining. 0 when no trial was started and 0 once
    /// `TRIAL_DURATION_DAYS` have elapsed; never negative.
    pub fn days_left_in_trial(&self, now: DateTime<Utc>) -> i64 {
        let Some(started) = self.trial_started_at else {
            return 0;
        };
        let days_passed = (now - started).num_days();
        (TRIAL_DURATION_DAYS - days_passed).max(0)
    }

    pub fn is_trial_active(&self, now: DateTime<Utc>) -> bool {
        self.trial_started_at.is_some() && self.days_left_in_trial(now) > 0
    }

    /// Effective tier with precedence owner > pro > active-trial > free.
    pub fn tier(&self, owners: &OwnerRegistry, now: DateTime<Utc>) -> Tier {
        if self.is_owner(owners) {
            Tier::Owner
        } else if self.is_pro {
            Tier::Pro
        } else if self.is_trial_active(now) {
            Tier::Trial
        } else {
            Tier::Free
        }
    }

    /// Gate check for a protected page or action.
    pub fn check(&self, owners: &OwnerRegistry, now: DateTime<Utc>) -> Access {
        if self.is_pro || self.is_trial_active(now) || self.is_owner(owners) {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn owners() -> OwnerRegistry {
        OwnerRegistry::new(["boss@example.com"])
    }

    fn t0() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().expect("fixed timestamp")
    }

    #[test]
    fn owner_membership_is_case_insensitive() {
        assert!(owners().contains("Boss@Example.COM"));
        assert!(!owners().contains("someone@example.com"));
    }

    #[test]
    fn registration_starts_trial_for_non_owner() {
        let mut account = Account::default();
        account.register("user@example.com", &owners(), t0());
        assert!(account.has_registered);
        assert!(account.is_trial_active(t0()));
        assert_eq!(account.days_left_in_trial(t0()), TRIAL_DURATION_DAYS);
        assert_eq!(account.tier(&owners(), t0()), Tier::Trial);
    }

    #[test]
    fn owner_registration_forces_pro_and_skips_trial() {
        let mut account = Account::default();
        account.register("boss@example.com", &owners(), t0());
        assert!(account.is_pro);
        assert!(account.trial_started_at.is_none());
        assert_eq!(account.tier(&owners(), t0()), Tier::Owner);
    }

    #[test]
    fn days_left_is_zero_without_trial_and_at_expiry() {
        let account = Account::default();
        assert_eq!(account.days_left_in_trial(t0()), 0);

        let mut account = Account::default();
        account.register("user@example.com", &owners(), t0());
        let at_expiry = t0() + Duration::days(TRIAL_DURATION_DAYS);
        assert_eq!(account.days_left_in_trial(at_expiry), 0);
        assert!(!account.is_trial_active(at_expiry));

        // Never negative, even long after expiry.
        let much_later = t0() + Duration::days(400);
        assert_eq!(account.days_left_in_trial(much_later), 0);
    }

    #[test]
    fn trial_is_active_one_day_before_expiry() {
        let mut account = Account::default();
        account.register("user@example.com", &owners(), t0());
        let almost = t0() + Duration::days(TRIAL_DURATION_DAYS - 1);
        assert_eq!(account.days_left_in_trial(almost), 1);
        assert!(account.is_trial_active(almost));
    }

    #[test]
    fn upgrade_clears_trial() {
        let mut account = Account::default();
        account.register("user@example.com", &owners(), t0());
        account.upgrade_to_pro();
        assert!(account.is_pro);
        assert!(account.trial_started_at.is_none());
        assert_eq!(account.tier(&owners(), t0()), Tier::Pro);
    }

    #[test]
    fn gate_denies_expired_free_account() {
        let mut account = Account::default();
        account.register("user@example.com", &owners(), t0());
        let later = t0() + Duration::days(TRIAL_DURATION_DAYS + 1);
        assert_eq!(account.check(&owners(), later), Access::Denied);
        assert_eq!(account.tier(&owners(), later), Tier::Free);
    }

    #[test]
    fn logout_drops_session_entitlements() {
        let mut account = Account::default();
        account.register("user@example.com", &owners(), t0());
        account.logout();
        assert!(!account.logged_in());
        assert!(!account.is_pro);
        assert!(account.trial_started_at.is_none());
        // Registration flag survives logout.
        assert!(account.has_registered);
    }
}
