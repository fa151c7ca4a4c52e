//! Response parsing for the Vpass JSON endpoints.
//!
//! Pure functions over raw response text, kept separate from the session so
//! each parser can be exercised directly.

use meisai_core::{Card, CardDirectory, TransactionRow};
use serde_json::Value;

use crate::error::ClientError;

const MEISAI_LIST: &str = "/body/content/WebMeisaiTopDisplayServiceBean/meisaiList";
const MULTI_CARD_LIST: &str = "/body/content/DropdownListInitDisplayServiceBean/multiCardInfoList";

/// Check that a login response actually carries an authenticated session.
///
/// The portal answers HTTP 200 for a wrong password too; the difference is an
/// `errorList` in the header and a missing `body.content` object.
pub fn verify_login(raw: &str) -> Result<(), ClientError> {
    let v: Value = serde_json::from_str(raw)?;
    if let Some(first) = v
        .pointer("/header/errorList")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let message = first
            .get("errorMessage")
            .and_then(Value::as_str)
            .unwrap_or("login rejected by the portal")
            .to_string();
        return Err(ClientError::Authentication(message));
    }
    if v.pointer("/body/content").and_then(Value::as_object).is_none() {
        return Err(ClientError::Authentication(
            "login response carried no session content".to_string(),
        ));
    }
    Ok(())
}

/// Parse the card-list response into the session's card directory.
pub fn parse_card_list(raw: &str) -> Result<CardDirectory, ClientError> {
    let v: Value = serde_json::from_str(raw)?;
    let list = v
        .pointer(MULTI_CARD_LIST)
        .cloned()
        .ok_or_else(|| ClientError::Schema(json_path(MULTI_CARD_LIST)))?;
    let cards: Vec<Card> = serde_json::from_value(list)
        .map_err(|e| ClientError::Schema(format!("multiCardInfoList entry: {e}")))?;
    Ok(CardDirectory::new(cards))
}

/// Extract postable purchase rows from a raw statement response.
///
/// Only line items whose `shiharaiPatternFlag` is truthy are purchases; the
/// rest are informational or cancelled entries and are dropped. Output keeps
/// the portal's ordering. An empty `meisaiList` is a valid empty statement,
/// not an error.
pub fn parse_statement_rows(raw: &str) -> Result<Vec<TransactionRow>, ClientError> {
    let v: Value = serde_json::from_str(raw)?;
    let items = v
        .pointer(MEISAI_LIST)
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::Schema(json_path(MEISAI_LIST)))?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        if !is_truthy(item.get("shiharaiPatternFlag")) {
            continue;
        }
        let data = item
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::Schema("meisaiList[].data".to_string()))?;
        rows.push(TransactionRow {
            date: cell_text(data, 3)?,
            shop: cell_text(data, 4)?,
            amount: cell_text(data, 5)?,
        });
    }
    Ok(rows)
}

/// Statement cells are usually preformatted strings, but amounts sometimes
/// arrive as bare numbers; both render as text.
fn cell_text(data: &[Value], index: usize) -> Result<String, ClientError> {
    let cell = data
        .get(index)
        .ok_or_else(|| ClientError::Schema(format!("meisaiList[].data[{index}]")))?;
    match cell {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ClientError::Schema(format!("meisaiList[].data[{index}]"))),
    }
}

/// JSON truthiness the way the portal's own front end treats the flag:
/// `null`, `false`, `0` and `""` are falsy, everything else truthy.
fn is_truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn json_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}
