//! Session state of the wallet checker.
//!
//! [`WalletStore`] owns the last verification result and publishes every
//! mutation on a [`tokio::sync::watch`] channel, so that a UI can re-render
//! from [`WalletStore::subscribe`]. Overlapping calls are not fenced: the
//! response that resolves last wins.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};

use crate::common::error::{Error, NOT_FOUND_MESSAGE};
use crate::common::{WalletMetadata, WalletSummary, WalletVerifyResponseData};
use crate::service::WalletApi;

/// Snapshot of the wallet checker state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletState {
    /// Summary of the last wallet found in the dataset
    pub summary: Option<WalletSummary>,
    /// Dataset metadata, refreshed by either action
    pub metadata: Option<WalletMetadata>,
    /// Last address that received an answer from the API
    pub last_query: Option<String>,
    /// User facing message of the last failed or missed verification
    pub error_message: Option<String>,
}

/// Outcome of the last action, derived from the state fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    /// No verification has completed yet
    Idle,
    /// The wallet was found in the dataset
    Found,
    /// The wallet is not in the dataset
    NotFound,
    /// The verification failed
    Failed,
}

impl WalletState {
    /// The outcome of the last action.
    pub fn status(&self) -> WalletStatus {
        match (&self.summary, self.error_message.as_deref()) {
            (Some(_), _) => WalletStatus::Found,
            (None, Some(NOT_FOUND_MESSAGE)) => WalletStatus::NotFound,
            (None, Some(_)) => WalletStatus::Failed,
            (None, None) => WalletStatus::Idle,
        }
    }
}

/// Holds the wallet checker state and the actions mutating it
pub struct WalletStore<S> {
    service: S,
    state: watch::Sender<WalletState>,
}

impl<S> WalletStore<S>
where
    S: WalletApi,
{
    /// Construct a new [`WalletStore`] with an empty state
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(WalletState::default());
        WalletStore { service, state }
    }

    /// A snapshot of the current state
    pub fn state(&self) -> WalletState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state mutation
    pub fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.state.subscribe()
    }

    /// Refresh the dataset metadata. Failures are logged and leave the state
    /// untouched.
    pub async fn load_metadata(&self) {
        match self.service.fetch_metadata().await {
            Ok(metadata) => self.state.send_modify(|state| state.metadata = metadata),
            Err(error) => error!(%error, "could not load dataset metadata"),
        }
    }

    /// Verify `address` and record the outcome.
    ///
    /// A wallet missing from the dataset is not an error: the state records
    /// the miss and `Ok` is returned. Transport failures clear the summary,
    /// set the retry message and are returned to the caller.
    pub async fn verify_wallet(&self, address: &str) -> Result<(), Error> {
        self.state.send_modify(|state| state.error_message = None);

        let WalletVerifyResponseData {
            found,
            summary,
            metadata,
        } = match self.service.verify_wallet(address).await {
            Ok(data) => data,
            Err(err) => {
                error!(error = %err, address, "error verifying wallet");
                self.state.send_modify(|state| {
                    state.summary = None;
                    state.error_message = Some(err.user_message().to_string());
                });
                return Err(err);
            }
        };

        let summary = summary.filter(|_| found);
        let error_message = match summary {
            Some(_) => None,
            None => {
                let miss = Error::NotFound(address.to_string());
                info!(%miss, "wallet verification missed the dataset");
                Some(miss.user_message().to_string())
            }
        };

        self.state.send_modify(|state| {
            state.last_query = Some(address.to_string());
            state.metadata = Some(metadata);
            state.error_message = error_message;
            state.summary = summary;
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::common::error::RETRY_MESSAGE;
    use crate::service::tests::{metadata_json, setup_service, success, summary_json};
    use crate::service::WalletService;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;
    use test_case::test_case;

    const VERIFY_PATH: &str = "/api/v1/wallets/verify";
    const METADATA_PATH: &str = "/api/v1/wallets/metadata";

    fn verify_body(address: &str) -> Matcher {
        Matcher::Json(json!({"address": address}))
    }

    fn found_body(address: &str) -> String {
        success(json!({
            "found": true,
            "summary": summary_json(address),
            "metadata": metadata_json()
        }))
    }

    fn not_found_body() -> String {
        success(json!({
            "found": false,
            "summary": null,
            "metadata": metadata_json()
        }))
    }

    #[tokio::test]
    async fn test_initial_state_is_empty() {
        let server = Server::new_async().await;
        let store = WalletStore::new(setup_service(&server));

        assert_eq!(store.state(), WalletState::default());
        assert_eq!(store.state().status(), WalletStatus::Idle);
    }

    #[tokio::test]
    async fn test_verify_wallet_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body("0xABC"))
            .with_status(200)
            .with_body(found_body("0xABC"))
            .expect(1)
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet("0xABC").await.unwrap();

        mock.assert_async().await;
        let state = store.state();
        let expected: WalletSummary = serde_json::from_value(summary_json("0xABC")).unwrap();
        assert_eq!(state.summary, Some(expected));
        assert_eq!(state.last_query.as_deref(), Some("0xABC"));
        assert!(state.error_message.is_none());
        assert_eq!(state.metadata.unwrap().records, 1280);
        assert_eq!(store.state().status(), WalletStatus::Found);
    }

    #[tokio::test]
    async fn test_verify_wallet_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body("0xDEAD"))
            .with_status(200)
            .with_body(not_found_body())
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        let result = store.verify_wallet("0xDEAD").await;

        assert!(result.is_ok());
        let state = store.state();
        assert!(state.summary.is_none());
        assert_eq!(
            state.error_message.as_deref(),
            Some("Wallet no encontrada en el dataset.")
        );
        assert_eq!(state.last_query.as_deref(), Some("0xDEAD"));
        assert!(state.metadata.is_some());
        assert_eq!(state.status(), WalletStatus::NotFound);
    }

    #[test_case("bc1qdc9gnr2tqfm78lqhxunapaw605qhkpsq36ysr6", true; "bech32 hit")]
    #[test_case("bc1qdc9gnr2tqfm78lqhxunapaw605qhkpsq36ysr6", false; "bech32 miss")]
    #[test_case("1BoatSLRHtKNngkdXEeobR76b53LETtpyT", true; "legacy btc hit")]
    #[test_case("1BoatSLRHtKNngkdXEeobR76b53LETtpyT", false; "legacy btc miss")]
    #[test_case("0x47ce0c6ac56edb84e2ad330bec0b500ad6e71bee", true; "eth hit")]
    #[test_case("0x000000000000000000000000000000000000dead", false; "eth miss")]
    #[tokio::test]
    async fn test_verify_wallet_records_any_address(address: &str, found: bool) {
        let mut server = Server::new_async().await;
        let body = if found {
            found_body(address)
        } else {
            not_found_body()
        };
        let mock = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body(address))
            .with_status(200)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet(address).await.unwrap();

        mock.assert_async().await;
        let state = store.state();
        assert_eq!(state.last_query.as_deref(), Some(address));
        if found {
            assert_eq!(state.summary.unwrap().address, address);
            assert!(state.error_message.is_none());
        } else {
            assert!(state.summary.is_none());
            assert_eq!(state.error_message.as_deref(), Some(NOT_FOUND_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_found_flag_without_summary_is_a_miss() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", VERIFY_PATH)
            .with_status(200)
            .with_body(success(json!({
                "found": true,
                "summary": null,
                "metadata": metadata_json()
            })))
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet("0xABC").await.unwrap();

        let state = store.state();
        assert!(state.summary.is_none());
        assert_eq!(state.error_message.as_deref(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_hit_after_miss_clears_the_message() {
        let mut server = Server::new_async().await;
        let _miss = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body("0xDEAD"))
            .with_status(200)
            .with_body(not_found_body())
            .create_async()
            .await;
        let _hit = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body("0xABC"))
            .with_status(200)
            .with_body(found_body("0xABC"))
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet("0xDEAD").await.unwrap();
        store.verify_wallet("0xABC").await.unwrap();

        let state = store.state();
        assert!(state.error_message.is_none());
        assert_eq!(state.summary.unwrap().address, "0xABC");
        assert_eq!(state.last_query.as_deref(), Some("0xABC"));
    }

    #[tokio::test]
    async fn test_verify_wallet_failure_is_returned_and_recorded() {
        let mut server = Server::new_async().await;
        let _hit = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body("0xABC"))
            .with_status(200)
            .with_body(found_body("0xABC"))
            .create_async()
            .await;
        let _failure = server
            .mock("POST", VERIFY_PATH)
            .match_body(verify_body("0xFAIL"))
            .with_status(500)
            .with_body("{}")
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet("0xABC").await.unwrap();
        let metadata_before = store.state().metadata;

        let result = store.verify_wallet("0xFAIL").await;

        assert!(matches!(result, Err(Error::InternalServer)));
        let state = store.state();
        assert!(state.summary.is_none());
        assert_eq!(
            state.error_message.as_deref(),
            Some("No se pudo verificar la wallet. Intenta nuevamente.")
        );
        assert_eq!(state.last_query.as_deref(), Some("0xABC"));
        assert_eq!(state.metadata, metadata_before);
        assert_eq!(state.status(), WalletStatus::Failed);
    }

    #[tokio::test]
    async fn test_verify_wallet_timeout_is_returned() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections but never answer them.
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client =
            ApiClient::with_base_url(format!("http://{addr}"), Duration::from_millis(100)).unwrap();
        let store = WalletStore::new(WalletService::with_prefix(client, "/api/v1".to_string()));

        let result = store.verify_wallet("0xABC").await;
        handle.abort();

        assert!(matches!(result, Err(Error::RequestTimeout)));
        let state = store.state();
        assert!(state.summary.is_none());
        assert!(state.last_query.is_none());
        assert_eq!(state.error_message.as_deref(), Some(RETRY_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_envelope_is_returned() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", VERIFY_PATH)
            .with_status(200)
            .with_body(r#"{"status": "success", "message": "ok", "data": null}"#)
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        let result = store.verify_wallet("0xABC").await;

        assert!(matches!(result, Err(Error::InvalidApiResponse)));
        assert_eq!(store.state().error_message.as_deref(), Some(RETRY_MESSAGE));
        assert!(store.state().last_query.is_none());
    }

    #[tokio::test]
    async fn test_load_metadata() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", METADATA_PATH)
            .with_status(200)
            .with_body(success(metadata_json()))
            .expect(1)
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.load_metadata().await;

        mock.assert_async().await;
        let metadata = store.state().metadata.unwrap();
        assert_eq!(metadata.version, "1.0.0");
        assert!(store.state().error_message.is_none());
    }

    #[tokio::test]
    async fn test_load_metadata_overwrites_with_none() {
        let mut server = Server::new_async().await;
        let _hit = server
            .mock("POST", VERIFY_PATH)
            .with_status(200)
            .with_body(found_body("0xABC"))
            .create_async()
            .await;
        let _metadata = server
            .mock("GET", METADATA_PATH)
            .with_status(200)
            .with_body(r#"{"status": "success", "message": "ok"}"#)
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet("0xABC").await.unwrap();
        assert!(store.state().metadata.is_some());

        store.load_metadata().await;

        assert!(store.state().metadata.is_none());
    }

    #[tokio::test]
    async fn test_load_metadata_failure_keeps_state() {
        let mut server = Server::new_async().await;
        let _hit = server
            .mock("POST", VERIFY_PATH)
            .with_status(200)
            .with_body(found_body("0xABC"))
            .create_async()
            .await;
        let _metadata = server
            .mock("GET", METADATA_PATH)
            .with_status(503)
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        store.verify_wallet("0xABC").await.unwrap();
        let before = store.state();

        store.load_metadata().await;

        assert_eq!(store.state(), before);
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", VERIFY_PATH)
            .with_status(200)
            .with_body(not_found_body())
            .create_async()
            .await;

        let store = WalletStore::new(setup_service(&server));
        let mut receiver = store.subscribe();

        store.verify_wallet("0xDEAD").await.unwrap();

        assert!(receiver.has_changed().unwrap());
        let state = receiver.borrow_and_update().clone();
        assert_eq!(state.status(), WalletStatus::NotFound);
        assert_eq!(state.last_query.as_deref(), Some("0xDEAD"));
    }
}
