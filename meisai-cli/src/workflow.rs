//! Sequential export workflow: log in once, list the cards once, then for
//! every card re-select it as the active card, fetch its statement, extract
//! the purchase rows, and write the CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use meisai_client::{PortalSession, parse};
use meisai_core::{Card, Credentials, Period};
use meisai_export::{export_file_name, write_statement_csv};
use tracing::{info, warn};

/// Outcome of one run: which exports were written, which cards were skipped
/// and why.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub exported: Vec<PathBuf>,
    pub skipped: Vec<(String, String)>,
}

/// Export the requested period's statement for every card on the account.
///
/// Login and card listing are shared setup; a failure there aborts the run.
/// Anything that goes wrong for a single card (transport, parse, schema,
/// file write) skips that card with a warning and the loop moves on, so one
/// bad card never costs the others their export.
pub async fn export_statements<S: PortalSession>(
    session: &mut S,
    creds: &Credentials,
    period: Period,
    out_dir: &Path,
) -> Result<RunSummary> {
    session.login(creds).await.context("logging in")?;
    let cards = session.list_cards().await.context("listing cards")?;
    info!(cards = cards.len(), period = %period.label(), "starting export");

    let mut summary = RunSummary::default();
    for card in cards.iter() {
        match export_card(session, card, period, out_dir).await {
            Ok(path) => {
                info!(card = %card.display_name, path = %path.display(), "exported");
                summary.exported.push(path);
            }
            Err(err) => {
                warn!(card = %card.display_name, error = %err, "skipping card");
                summary.skipped.push((card.display_name.clone(), err.to_string()));
            }
        }
    }
    Ok(summary)
}

/// One card's switch → fetch → parse → write pass. The switch is re-issued
/// on every pass; the server-side active-card pointer is never assumed to
/// still point at this card from an earlier call.
async fn export_card<S: PortalSession>(
    session: &mut S,
    card: &Card,
    period: Period,
    out_dir: &Path,
) -> Result<PathBuf> {
    session.switch_card(&card.identify_key).await?;
    let raw = session.fetch_statement(period).await?;
    let rows = parse::parse_statement_rows(&raw)?;
    let path = out_dir.join(export_file_name(period, &card.display_name));
    write_statement_csv(&path, &rows)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use meisai_client::ClientError;
    use meisai_core::CardDirectory;
    use serde_json::json;
    use std::collections::HashMap;
    use std::fs;

    /// Scripted portal: fixed card list, one canned statement response per
    /// card identify key.
    struct MockSession {
        cards: Vec<Card>,
        statements: HashMap<String, String>,
        active: Option<String>,
        switches: Vec<String>,
        fail_login: bool,
    }

    impl MockSession {
        fn new(cards: Vec<(&str, &str)>, statements: Vec<(&str, String)>) -> Self {
            Self {
                cards: cards
                    .into_iter()
                    .map(|(key, name)| Card {
                        identify_key: key.to_string(),
                        display_name: name.to_string(),
                    })
                    .collect(),
                statements: statements
                    .into_iter()
                    .map(|(key, raw)| (key.to_string(), raw))
                    .collect(),
                active: None,
                switches: Vec::new(),
                fail_login: false,
            }
        }
    }

    impl PortalSession for MockSession {
        async fn login(&mut self, _creds: &Credentials) -> Result<(), ClientError> {
            if self.fail_login {
                return Err(ClientError::Authentication("bad password".to_string()));
            }
            Ok(())
        }

        async fn list_cards(&mut self) -> Result<CardDirectory, ClientError> {
            Ok(CardDirectory::new(self.cards.clone()))
        }

        async fn switch_card(&mut self, card_id: &str) -> Result<(), ClientError> {
            self.switches.push(card_id.to_string());
            self.active = Some(card_id.to_string());
            Ok(())
        }

        async fn fetch_statement(&mut self, _period: Period) -> Result<String, ClientError> {
            let active = self.active.as_ref().expect("fetch before switch");
            Ok(self
                .statements
                .get(active)
                .cloned()
                .unwrap_or_else(|| "{}".to_string()))
        }
    }

    fn statement_with_rows() -> String {
        json!({
            "body": {"content": {"WebMeisaiTopDisplayServiceBean": {"meisaiList": [
                {"shiharaiPatternFlag": 1,
                 "data": ["", "", "", "2016/03/01", "AMAZON", "1234"]},
                {"shiharaiPatternFlag": 0,
                 "data": ["", "", "", "2016/03/02", "CANCELLED", "999"]},
                {"shiharaiPatternFlag": 1,
                 "data": ["", "", "", "2016/03/09", "JR EAST", "3250"]}
            ]}}}
        })
        .to_string()
    }

    fn period() -> Period {
        Period::resolve(
            Some(2016),
            Some(3),
            NaiveDate::from_ymd_opt(2016, 4, 1).unwrap(),
        )
    }

    fn creds() -> Credentials {
        Credentials::new("taro", "hunter2").unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("meisai-workflow-tests-{}", std::process::id()))
            .join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_bad_card_is_skipped_and_run_continues() {
        // c2's statement response has no meisaiList, so extraction fails
        // with a schema error for that card only.
        let mut session = MockSession::new(
            vec![("c1", "GOLD"), ("c2", "PLATINUM")],
            vec![("c1", statement_with_rows())],
        );
        let out_dir = scratch_dir("partial");

        let summary = export_statements(&mut session, &creds(), period(), &out_dir)
            .await
            .unwrap();

        assert_eq!(summary.exported, vec![out_dir.join("201603GOLD.csv")]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, "PLATINUM");

        let text = fs::read_to_string(out_dir.join("201603GOLD.csv")).unwrap();
        assert_eq!(
            text,
            "date,shop,pay\n2016/03/01,AMAZON,1234\n2016/03/09,JR EAST,3250\n"
        );
        assert!(!out_dir.join("201603PLATINUM.csv").exists());
    }

    #[tokio::test]
    async fn test_malformed_response_on_first_card_spares_the_rest() {
        // c1 answers with an HTML maintenance page, c2 with a statement that
        // has no purchases. c1 is skipped; c2 still gets a header-only file.
        let empty_statement = json!({
            "body": {"content": {"WebMeisaiTopDisplayServiceBean": {"meisaiList": []}}}
        })
        .to_string();
        let mut session = MockSession::new(
            vec![("c1", "GOLD"), ("c2", "PLATINUM")],
            vec![
                ("c1", "<html>maintenance</html>".to_string()),
                ("c2", empty_statement),
            ],
        );
        let out_dir = scratch_dir("malformed");

        let summary = export_statements(&mut session, &creds(), period(), &out_dir)
            .await
            .unwrap();

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, "GOLD");
        assert_eq!(summary.exported, vec![out_dir.join("201603PLATINUM.csv")]);
        assert_eq!(
            fs::read_to_string(out_dir.join("201603PLATINUM.csv")).unwrap(),
            "date,shop,pay\n"
        );
    }

    #[tokio::test]
    async fn test_switch_reissued_before_every_fetch() {
        let mut session = MockSession::new(
            vec![("c1", "GOLD"), ("c2", "PLATINUM")],
            vec![
                ("c1", statement_with_rows()),
                ("c2", statement_with_rows()),
            ],
        );
        let out_dir = scratch_dir("switching");

        let summary = export_statements(&mut session, &creds(), period(), &out_dir)
            .await
            .unwrap();

        assert_eq!(summary.exported.len(), 2);
        assert_eq!(session.switches, vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_login_failure_is_fatal() {
        let mut session = MockSession::new(vec![("c1", "GOLD")], vec![]);
        session.fail_login = true;
        let out_dir = scratch_dir("fatal");

        let result = export_statements(&mut session, &creds(), period(), &out_dir).await;
        assert!(result.is_err());
        assert!(session.switches.is_empty());
    }

    #[tokio::test]
    async fn test_rerun_overwrites_with_identical_content() {
        let out_dir = scratch_dir("idempotent");
        for _ in 0..2 {
            let mut session =
                MockSession::new(vec![("c1", "GOLD")], vec![("c1", statement_with_rows())]);
            export_statements(&mut session, &creds(), period(), &out_dir)
                .await
                .unwrap();
        }
        let text = fs::read_to_string(out_dir.join("201603GOLD.csv")).unwrap();
        assert_eq!(
            text,
            "date,shop,pay\n2016/03/01,AMAZON,1234\n2016/03/09,JR EAST,3250\n"
        );
    }
}
