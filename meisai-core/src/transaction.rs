use serde::{Deserialize, Serialize};

/// One postable purchase extracted from a monthly statement.
///
/// Values are kept exactly as the portal renders them (dates and amounts are
/// preformatted strings, often with Japanese shop names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: String,
    pub shop: String,
    pub amount: String,
}
