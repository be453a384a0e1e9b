//! Unit tests for the gate crate

#[cfg(test)]
mod store_tests {
    use crate::domain::repository::{SessionBindingStore, TokenStore};
    use crate::domain::value_objects::{SessionId, Token};
    use crate::error::GateError;
    use crate::infra::json_file::{JsonBindingStore, JsonTokenStore};

    fn token_store(dir: &tempfile::TempDir) -> JsonTokenStore {
        JsonTokenStore::new(dir.path().join("tokens.json"), 10)
    }

    fn binding_store(dir: &tempfile::TempDir) -> JsonBindingStore {
        JsonBindingStore::new(dir.path().join("sessions.json"))
    }

    fn token(raw: &str) -> Token {
        Token::from_string(raw.to_string())
    }

    fn session(raw: &str) -> SessionId {
        SessionId::from_string(raw.to_string())
    }

    #[tokio::test]
    async fn test_issued_token_is_valid_until_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let store = token_store(&dir);

        let issued = store.issue().await.unwrap();
        assert_eq!(issued.as_str().len(), 20);
        assert!(store.is_valid(&issued).await.unwrap());

        assert!(store.consume(&issued).await.unwrap());
        assert!(!store.is_valid(&issued).await.unwrap());

        // Second consumption of the same token is a no-op, not an error
        assert!(!store.consume(&issued).await.unwrap());
    }

    #[tokio::test]
    async fn test_consume_of_unknown_token_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = token_store(&dir);

        let never_issued = token("ffffffffffffffffffff");
        assert!(!store.consume(&never_issued).await.unwrap());
    }

    #[tokio::test]
    async fn test_tokens_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = token_store(&dir);

        let a = store.issue().await.unwrap();
        let b = store.issue().await.unwrap();
        assert_ne!(a, b);

        assert!(store.consume(&a).await.unwrap());
        assert!(store.is_valid(&b).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = token_store(&dir);

        let probe = token("ffffffffffffffffffff");
        assert!(!store.is_valid(&probe).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonTokenStore::new(&path, 10);
        let probe = token("ffffffffffffffffffff");
        assert!(!store.is_valid(&probe).await.unwrap());

        // The store stays usable: the next issue rewrites the document
        let issued = store.issue().await.unwrap();
        assert!(store.is_valid(&issued).await.unwrap());
    }

    #[tokio::test]
    async fn test_tokens_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let issued = {
            let store = token_store(&dir);
            store.issue().await.unwrap()
        };

        let reopened = token_store(&dir);
        assert!(reopened.is_valid(&issued).await.unwrap());
    }

    #[tokio::test]
    async fn test_rebinding_overwrites_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);

        let s = session("aabbccddee0011223344");
        let t1 = token("11111111111111111111");
        let t2 = token("22222222222222222222");

        store.bind(&s, &t1).await.unwrap();
        store.bind(&s, &t2).await.unwrap();

        // Only the most recently bound token is live, even though t1 was
        // never spent
        assert!(!store.is_valid(&s, &t1).await.unwrap());
        assert!(store.is_valid(&s, &t2).await.unwrap());
    }

    #[tokio::test]
    async fn test_binding_requires_exact_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);

        let s1 = session("aabbccddee0011223344");
        let s2 = session("5566778899aabbccddee");
        let t1 = token("11111111111111111111");
        let t2 = token("22222222222222222222");

        store.bind(&s1, &t1).await.unwrap();

        assert!(store.is_valid(&s1, &t1).await.unwrap());
        assert!(!store.is_valid(&s2, &t1).await.unwrap());
        assert!(!store.is_valid(&s1, &t2).await.unwrap());
    }

    #[tokio::test]
    async fn test_unbind_removes_whole_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);

        let s = session("aabbccddee0011223344");
        let t = token("11111111111111111111");

        store.bind(&s, &t).await.unwrap();
        store.unbind(&s).await.unwrap();
        assert!(!store.is_valid(&s, &t).await.unwrap());

        // Unbinding an absent session is a fault condition
        assert!(matches!(
            store.unbind(&s).await,
            Err(GateError::BindingNotFound)
        ));
    }

    #[tokio::test]
    async fn test_binding_store_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonBindingStore::new(&path);
        let s = session("aabbccddee0011223344");
        let t = token("11111111111111111111");
        assert!(!store.is_valid(&s, &t).await.unwrap());
    }

    #[tokio::test]
    async fn test_bindings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let s = session("aabbccddee0011223344");
        let t = token("11111111111111111111");
        {
            let store = binding_store(&dir);
            store.bind(&s, &t).await.unwrap();
        }

        let reopened = binding_store(&dir);
        assert!(reopened.is_valid(&s, &t).await.unwrap());
    }
}

#[cfg(test)]
mod use_case_tests {
    use crate::application::config::GateConfig;
    use crate::application::issue_session_challenge::IssueSessionChallengeUseCase;
    use crate::application::submit_pin::{SubmitOutcome, SubmitPinUseCase};
    use crate::application::submit_session_pin::{SessionSubmitOutcome, SubmitSessionPinUseCase};
    use crate::domain::repository::{SessionBindingStore, TokenStore};
    use crate::domain::value_objects::{Level, Pin, Token};
    use crate::infra::json_file::{JsonBindingStore, JsonTokenStore};
    use std::sync::Arc;

    const PINS: [&str; 4] = ["0432", "0234", "0123", "0124"];

    fn test_config() -> Arc<GateConfig> {
        Arc::new(GateConfig {
            pins: std::array::from_fn(|i| Pin::new(PINS[i])),
            cookie_secure: false,
            ..GateConfig::default()
        })
    }

    fn token_store(dir: &tempfile::TempDir) -> Arc<JsonTokenStore> {
        Arc::new(JsonTokenStore::new(dir.path().join("tokens.json"), 10))
    }

    fn binding_store(dir: &tempfile::TempDir) -> Arc<JsonBindingStore> {
        Arc::new(JsonBindingStore::new(dir.path().join("sessions.json")))
    }

    #[tokio::test]
    async fn test_wrong_pin_still_spends_the_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = token_store(&dir);
        let use_case = SubmitPinUseCase::new(store.clone(), test_config());

        let t1 = store.issue().await.unwrap();

        // Wrong PIN: no advance, but t1 is gone and a fresh token came back
        let outcome = use_case
            .execute(Level::Two, Some("9999"), Some(&t1))
            .await
            .unwrap();
        let t2 = match outcome {
            SubmitOutcome::Retry { token } => token,
            SubmitOutcome::Advanced => panic!("wrong PIN must not advance"),
        };
        assert_ne!(t1, t2);
        assert!(!store.is_valid(&t1).await.unwrap());
        assert!(store.is_valid(&t2).await.unwrap());

        // Replaying t1 with the correct PIN fails: single use
        let outcome = use_case
            .execute(Level::Two, Some(PINS[2]), Some(&t1))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Retry { .. }));

        // The fresh token with the correct PIN advances
        let outcome = use_case
            .execute(Level::Two, Some(PINS[2]), Some(&t2))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Advanced));
    }

    #[tokio::test]
    async fn test_correct_pin_without_token_never_advances() {
        let dir = tempfile::tempdir().unwrap();
        let store = token_store(&dir);
        let use_case = SubmitPinUseCase::new(store.clone(), test_config());

        let outcome = use_case
            .execute(Level::Two, Some(PINS[2]), None)
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Retry { .. }));

        let never_issued = Token::from_string("ffffffffffffffffffff".to_string());
        let outcome = use_case
            .execute(Level::Two, Some(PINS[2]), Some(&never_issued))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Retry { .. }));
    }

    #[tokio::test]
    async fn test_session_pair_advances_and_unbinds() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);
        let config = test_config();

        let issue = IssueSessionChallengeUseCase::new(store.clone(), config.clone());
        let challenge = issue.execute(None).await.unwrap();

        let submit = SubmitSessionPinUseCase::new(store.clone(), config);
        let outcome = submit
            .execute(
                Some(PINS[3]),
                Some(&challenge.token),
                Some(challenge.session_id.as_str()),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, SessionSubmitOutcome::Advanced));

        // The binding went with it
        assert!(
            !store
                .is_valid(&challenge.session_id, &challenge.token)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_cookie_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);
        let config = test_config();

        let issue = IssueSessionChallengeUseCase::new(store.clone(), config.clone());
        let challenge = issue.execute(None).await.unwrap();

        // Correct PIN and a live token, but no cookie: rejected, and the
        // existing binding is untouched
        let submit = SubmitSessionPinUseCase::new(store.clone(), config);
        let outcome = submit
            .execute(Some(PINS[3]), Some(&challenge.token), None)
            .await
            .unwrap();

        let rebound = match outcome {
            SessionSubmitOutcome::Retry(rebound) => rebound,
            SessionSubmitOutcome::Advanced => panic!("cookieless submission must not advance"),
        };
        assert_ne!(rebound.session_id, challenge.session_id);
        assert!(
            store
                .is_valid(&challenge.session_id, &challenge.token)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_malformed_cookie_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);
        let config = test_config();

        let issue = IssueSessionChallengeUseCase::new(store.clone(), config.clone());
        let challenge = issue.execute(None).await.unwrap();

        let submit = SubmitSessionPinUseCase::new(store.clone(), config);
        let outcome = submit
            .execute(Some(PINS[3]), Some(&challenge.token), Some("too-short"))
            .await
            .unwrap();

        assert!(matches!(outcome, SessionSubmitOutcome::Retry(_)));
        assert!(
            store
                .is_valid(&challenge.session_id, &challenge.token)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_foreign_session_cannot_spend_a_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);
        let config = test_config();

        let issue = IssueSessionChallengeUseCase::new(store.clone(), config.clone());
        let victim = issue.execute(None).await.unwrap();
        let attacker = issue.execute(None).await.unwrap();
        assert_ne!(victim.session_id, attacker.session_id);

        // The attacker presents their own (well-formed) session with the
        // victim's token
        let submit = SubmitSessionPinUseCase::new(store.clone(), config);
        let outcome = submit
            .execute(
                Some(PINS[3]),
                Some(&victim.token),
                Some(attacker.session_id.as_str()),
            )
            .await
            .unwrap();

        let rebound = match outcome {
            SessionSubmitOutcome::Retry(rebound) => rebound,
            SessionSubmitOutcome::Advanced => panic!("foreign token must not advance"),
        };
        // Rotation happened on the attacker's session, not the victim's
        assert_eq!(rebound.session_id, attacker.session_id);
        assert!(
            store
                .is_valid(&victim.session_id, &victim.token)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_wrong_pin_rotates_the_binding() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);
        let config = test_config();

        let issue = IssueSessionChallengeUseCase::new(store.clone(), config.clone());
        let challenge = issue.execute(None).await.unwrap();

        let submit = SubmitSessionPinUseCase::new(store.clone(), config);
        let outcome = submit
            .execute(
                Some("9999"),
                Some(&challenge.token),
                Some(challenge.session_id.as_str()),
            )
            .await
            .unwrap();

        let rebound = match outcome {
            SessionSubmitOutcome::Retry(rebound) => rebound,
            SessionSubmitOutcome::Advanced => panic!("wrong PIN must not advance"),
        };
        // Same session, fresh token; the spent one stays spent
        assert_eq!(rebound.session_id, challenge.session_id);
        assert_ne!(rebound.token, challenge.token);
        assert!(
            !store
                .is_valid(&challenge.session_id, &challenge.token)
                .await
                .unwrap()
        );
        assert!(
            store
                .is_valid(&rebound.session_id, &rebound.token)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_page_view_invalidates_earlier_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = binding_store(&dir);
        let config = test_config();

        let issue = IssueSessionChallengeUseCase::new(store.clone(), config.clone());
        let first = issue.execute(None).await.unwrap();
        // Same caller fetches the page again
        let second = issue.execute(Some(first.session_id.as_str())).await.unwrap();

        assert_eq!(second.session_id, first.session_id);
        assert!(
            !store
                .is_valid(&first.session_id, &first.token)
                .await
                .unwrap()
        );

        // The earlier token is dead even with the right session and PIN
        let submit = SubmitSessionPinUseCase::new(store.clone(), config);
        let outcome = submit
            .execute(
                Some(PINS[3]),
                Some(&first.token),
                Some(first.session_id.as_str()),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, SessionSubmitOutcome::Retry(_)));
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::{GateConfig, SameSite};
    use crate::domain::value_objects::Level;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();

        assert_eq!(config.token_bytes_len, 10);
        assert_eq!(config.token_len(), 20);
        assert_eq!(config.session_id_bytes_len, 10);
        assert_eq!(config.session_id_len(), 20);
        assert_eq!(config.session_cookie_name, "session_id");
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
    }

    #[test]
    fn test_development_config() {
        let config = GateConfig::development();

        assert!(!config.cookie_secure);
        for level in Level::ALL {
            let pin = config.pin(level).as_str();
            assert_eq!(pin.len(), 4);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_random_pins_differ_between_configs() {
        // Sixteen digits of combined PIN space; a collision across two
        // configs would be a broken RNG
        let a = GateConfig::with_random_pins();
        let b = GateConfig::with_random_pins();
        let digits = |c: &GateConfig| {
            Level::ALL
                .iter()
                .map(|l| c.pin(*l).as_str().to_owned())
                .collect::<Vec<_>>()
                .join("")
        };
        assert_ne!(digits(&a), digits(&b));
    }

    #[test]
    fn test_session_cookie_reflects_config() {
        let config = GateConfig {
            cookie_secure: false,
            ..GateConfig::default()
        };
        let cookie = config.session_cookie();
        assert_eq!(cookie.name, "session_id");
        assert!(!cookie.secure);
        assert!(cookie.http_only);
    }
}

#[cfg(test)]
mod page_tests {
    use crate::domain::value_objects::{Level, Token};
    use crate::presentation::pages;

    #[test]
    fn test_entry_page_invalid_flag() {
        let page = pages::entry_page(Level::One, false, None);
        assert!(page.contains("Level 1"));
        assert!(!page.contains(pages::WRONG_PIN_MARKER));

        let page = pages::entry_page(Level::One, true, None);
        assert!(page.contains(pages::WRONG_PIN_MARKER));
    }

    #[test]
    fn test_entry_page_form_method() {
        let page = pages::entry_page(Level::Zero, false, None);
        assert!(page.contains("method=\"get\""));
        assert!(page.contains("action=\"/level0\""));

        let page = pages::entry_page(Level::Two, false, None);
        assert!(page.contains("method=\"post\""));
        assert!(page.contains("action=\"/level2\""));
    }

    #[test]
    fn test_entry_page_token_transport() {
        let token = Token::from_string("aabbccddee0011223344".to_string());
        let page = pages::entry_page(Level::Two, false, Some(&token));

        // The hidden input travels on a single line; scrapers depend on it
        let line = page
            .lines()
            .find(|line| {
                ["input", "type", "hidden", "token", "value"]
                    .iter()
                    .all(|needle| line.contains(needle))
            })
            .expect("hidden token input line");
        assert!(line.contains("value=\"aabbccddee0011223344\""));

        let page = pages::entry_page(Level::One, false, None);
        assert!(!page.contains("hidden"));
    }

    #[test]
    fn test_success_page_progression() {
        let page = pages::success_page(Level::Zero);
        assert!(page.contains("Level 0 cleared"));
        assert!(page.contains("href=\"/level1\""));
        assert!(!page.contains(pages::WRONG_PIN_MARKER));

        let page = pages::success_page(Level::Three);
        assert!(page.contains("Level 3 cleared"));
        assert!(page.contains("All levels cleared."));
        assert!(!page.contains("href"));
    }
}
