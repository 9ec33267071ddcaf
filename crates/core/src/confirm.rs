//! Confirmation contract for destructive operations.

/// Explicit user confirmation carried into a destructive operation.
///
/// Delete/clear/reset operations take this as a parameter; a declined
/// confirmation performs no mutation. Callers are expected to collect the
/// answer at the UI boundary and pass it through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_is_not_confirmed() {
        assert!(Confirmation::Confirmed.is_confirmed());
        assert!(!Confirmation::Declined.is_confirmed());
    }
}
