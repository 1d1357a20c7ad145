//! Repository layer for database access

pub mod documents;
pub mod investments;
pub mod money_requests;
pub mod stats;
pub mod transactions;
pub mod users;

pub use documents::DocumentRepository;
pub use investments::InvestmentRepository;
pub use money_requests::{ApprovalOutcome, MoneyRequestRepository};
pub use stats::StatsRepository;
pub use transactions::TransactionRepository;
pub use users::{BalanceOutcome, NewUser, UserRepository};

/// Result of a state change that is only allowed from `pending`
#[derive(Debug)]
pub enum ReviewOutcome<T> {
    Done(T),
    NotFound,
    /// Current status of the record
    NotPending(String),
}

/// ILIKE pattern matching `term` anywhere, with wildcards in the term escaped
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("jane"), "%jane%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
