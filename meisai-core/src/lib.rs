//! meisai-core: domain types shared across the Vpass statement exporter.

pub mod card;
pub mod credentials;
pub mod period;
pub mod transaction;

pub use card::{Card, CardDirectory};
pub use credentials::{CredentialError, Credentials};
pub use period::Period;
pub use transaction::TransactionRow;
