use thiserror::Error;

/// Failure kinds for one portal interaction.
///
/// `Transport`, `Schema` and `Parse` raised while processing a single card
/// are caught at the per-card boundary by the workflow; the same errors
/// during login or card listing abort the whole run.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Login did not actually succeed. The portal answers HTTP 200 either
    /// way; this is detected from the response body, never inferred from a
    /// later schema mismatch.
    #[error("login rejected: {0}")]
    Authentication(String),

    /// An expected JSON path was missing. Usually a stale session or a card
    /// with no statement for the requested period.
    #[error("expected JSON path missing: {0}")]
    Schema(String),

    #[error("malformed JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Session operations called out of order. The workflow never triggers
    /// this; it guards direct misuse of [`crate::VpassSession`].
    #[error("session used out of order: {0}")]
    Session(&'static str),
}
