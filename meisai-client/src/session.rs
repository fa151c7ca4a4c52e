//! The authenticated Vpass session and its operation ordering.
//!
//! The portal keeps an "active card" pointer on its side of the session; a
//! statement fetch silently applies to whichever card was selected last.
//! That pointer is modelled here as an explicit state machine, and the
//! workflow re-issues a switch before every fetch rather than assuming the
//! pointer stayed where it was left.

use std::time::Duration;

use chrono::Utc;
use meisai_core::{CardDirectory, Credentials, Period};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;
use crate::parse;
use crate::payload;

const LOGIN_URL: &str = "https://www.smbc-card.com/memapi/jaxrs/xt_login/agree/v1";
const CARD_LIST_URL: &str =
    "https://www.smbc-card.com/memapi/jaxrs/dropdown_list/init_display/v1";
const CARD_SWITCH_URL: &str = "https://www.smbc-card.com/memapi/jaxrs/card_change/card_change/v1";
const STATEMENT_URL: &str = "https://www.smbc-card.com/memapi/jaxrs/web_meisai/web_meisai_top/v1";

const LOGIN_REFERER: &str = "https://www.smbc-card.com/memx/login/index.html";
const MEMBER_REFERER: &str = "https://www.smbc-card.com/memx/web_meisai/top/index.html";

/// The browser string the endpoints were captured with; the portal rejects
/// clients it does not recognize.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/45.0.2454.101 Safari/537.36";

/// An unresponsive endpoint surfaces as a `Transport` error instead of
/// hanging the run.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam between the workflow and the portal. The production implementation
/// is [`VpassSession`]; the workflow tests drive a scripted stand-in.
#[allow(async_fn_in_trait)]
pub trait PortalSession {
    async fn login(&mut self, creds: &Credentials) -> Result<(), ClientError>;
    async fn list_cards(&mut self) -> Result<CardDirectory, ClientError>;
    async fn switch_card(&mut self, card_id: &str) -> Result<(), ClientError>;
    async fn fetch_statement(&mut self, period: Period) -> Result<String, ClientError>;
}

/// Progress of one authenticated session. Operations are only valid in the
/// order login → list cards → switch card → fetch statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SessionState {
    Unauthenticated,
    Authenticated,
    CardsListed,
    CardSelected,
}

/// One authenticated portal session: a cookie-holding HTTP client plus the
/// client-side view of how far the login → fetch sequence has progressed.
pub struct VpassSession {
    http: reqwest::Client,
    state: SessionState,
}

impl VpassSession {
    pub fn new() -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(CALL_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            state: SessionState::Unauthenticated,
        })
    }

    fn require(&self, at_least: SessionState, what: &'static str) -> Result<(), ClientError> {
        if self.state < at_least {
            return Err(ClientError::Session(what));
        }
        Ok(())
    }

    async fn post<T: Serialize>(
        &self,
        url: &str,
        referer: &'static str,
        body: &T,
    ) -> Result<String, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(referer));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        if referer == MEMBER_REFERER {
            headers.insert("DNT", HeaderValue::from_static("1"));
        }
        debug!(url, "POST");
        let resp = self.http.post(url).headers(headers).json(body).send().await?;
        Ok(resp.error_for_status()?.text().await?)
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl PortalSession for VpassSession {
    async fn login(&mut self, creds: &Credentials) -> Result<(), ClientError> {
        if self.state != SessionState::Unauthenticated {
            return Err(ClientError::Session("login on an already-authenticated session"));
        }
        let raw = self
            .post(LOGIN_URL, LOGIN_REFERER, &payload::login(creds, now_ms()))
            .await?;
        parse::verify_login(&raw)?;
        self.state = SessionState::Authenticated;
        Ok(())
    }

    async fn list_cards(&mut self) -> Result<CardDirectory, ClientError> {
        self.require(
            SessionState::Authenticated,
            "card list requested before login",
        )?;
        let raw = self
            .post(CARD_LIST_URL, MEMBER_REFERER, &payload::card_list(now_ms()))
            .await?;
        let cards = parse::parse_card_list(&raw)?;
        debug!(cards = cards.len(), "card directory loaded");
        self.state = SessionState::CardsListed;
        Ok(cards)
    }

    async fn switch_card(&mut self, card_id: &str) -> Result<(), ClientError> {
        self.require(
            SessionState::CardsListed,
            "card switch requested before listing cards",
        )?;
        // The response body is uninteresting; the acknowledgement is the
        // server moving its active-card pointer.
        self.post(
            CARD_SWITCH_URL,
            MEMBER_REFERER,
            &payload::card_switch(card_id, now_ms()),
        )
        .await?;
        self.state = SessionState::CardSelected;
        Ok(())
    }

    async fn fetch_statement(&mut self, period: Period) -> Result<String, ClientError> {
        self.require(
            SessionState::CardSelected,
            "statement fetch requested before selecting a card",
        )?;
        self.post(
            STATEMENT_URL,
            MEMBER_REFERER,
            &payload::statement(period, now_ms()),
        )
        .await
    }
}
