//! Request payload builders for the Vpass JSON endpoints.
//!
//! Every endpoint takes the same envelope:
//! `{"header": {"requestHash", "requestTimestamp", "corpCode"}, "body": {"content": {...}}}`.
//! Builders are pure; the caller supplies the millisecond timestamp so the
//! session can stamp each request fresh and tests can pin it.

use meisai_core::{Credentials, Period};
use serde::Serialize;

// Per-endpoint request hashes. Opaque integrity tags the server checks on
// every call; reproduced literally, never derived.
pub const LOGIN_HASH: u32 = 3154381724;
pub const STATEMENT_HASH: u32 = 1494552592;
pub const CARD_SWITCH_HASH: u32 = 3364688549;
pub const CARD_LIST_HASH: u32 = 2160136501;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    header: Header,
    body: Body<T>,
}

#[derive(Debug, Serialize)]
struct Header {
    #[serde(rename = "requestHash")]
    request_hash: u32,
    #[serde(rename = "requestTimestamp")]
    request_timestamp: i64,
    #[serde(rename = "corpCode")]
    corp_code: String,
}

#[derive(Debug, Serialize)]
struct Body<T: Serialize> {
    content: T,
}

fn envelope<T: Serialize>(hash: u32, timestamp_ms: i64, content: T) -> Envelope<T> {
    Envelope {
        header: Header {
            request_hash: hash,
            request_timestamp: timestamp_ms,
            corp_code: String::new(),
        },
        body: Body { content },
    }
}

#[derive(Debug, Serialize)]
pub struct LoginContent {
    userid: String,
    password: String,
    /// Legacy duplicate of the credentials in query-string form; the portal
    /// still requires it alongside the JSON fields.
    #[serde(rename = "ADP0001")]
    adp0001: String,
}

pub fn login(creds: &Credentials, timestamp_ms: i64) -> Envelope<LoginContent> {
    let adp0001 = format!(
        "=1&userid={}&password={}&ADP0001=",
        creds.user_id(),
        creds.password()
    );
    envelope(
        LOGIN_HASH,
        timestamp_ms,
        LoginContent {
            userid: creds.user_id().to_string(),
            password: creds.password().to_string(),
            adp0001,
        },
    )
}

#[derive(Debug, Serialize)]
pub struct StatementContent {
    /// Billing period as `YYYYMM`.
    p01: String,
    p03: u8,
}

pub fn statement(period: Period, timestamp_ms: i64) -> Envelope<StatementContent> {
    envelope(
        STATEMENT_HASH,
        timestamp_ms,
        StatementContent {
            p01: period.label(),
            p03: 1,
        },
    )
}

#[derive(Debug, Serialize)]
pub struct CardSwitchContent {
    #[serde(rename = "cardIdentifyKey")]
    card_identify_key: String,
}

pub fn card_switch(card_id: &str, timestamp_ms: i64) -> Envelope<CardSwitchContent> {
    envelope(
        CARD_SWITCH_HASH,
        timestamp_ms,
        CardSwitchContent {
            card_identify_key: card_id.to_string(),
        },
    )
}

#[derive(Debug, Serialize)]
pub struct CardListContent {
    #[serde(rename = "displayDropdownList")]
    display_dropdown_list: String,
}

pub fn card_list(timestamp_ms: i64) -> Envelope<CardListContent> {
    envelope(
        CARD_LIST_HASH,
        timestamp_ms,
        CardListContent {
            display_dropdown_list: "enable".to_string(),
        },
    )
}
