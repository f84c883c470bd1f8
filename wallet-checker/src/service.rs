//! # Wallet Service Module
//!
//! This module provides the `WalletApi` trait and its `WalletService`
//! implementation, which wrap the two REST calls of the wallet risk API:
//! verifying a wallet address and fetching the metadata of the dataset.
//! Transport failures are returned to the caller unchanged.

use std::future::Future;

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::common::error::Error;
use crate::common::{ApiEnvelope, WalletMetadata, WalletVerifyResponseData};
use crate::config::Settings;

const VERIFY_PATH: &str = "/wallets/verify";
const METADATA_PATH: &str = "/wallets/metadata";

/// Trait describing the interactions with the wallet risk API.
pub trait WalletApi: Sync + Send {
    /// Verify `address` against the risk dataset.
    fn verify_wallet(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<WalletVerifyResponseData, Error>> + Send;

    /// Fetch the metadata of the risk dataset, `None` when the API has none.
    fn fetch_metadata(&self) -> impl Future<Output = Result<Option<WalletMetadata>, Error>> + Send;
}

#[derive(Serialize)]
struct VerifyWalletRequest<'a> {
    address: &'a str,
}

/// A client for the wallet endpoints of the risk API.
#[derive(Clone, Debug)]
pub struct WalletService {
    client: ApiClient,
    prefix: String,
}

impl WalletService {
    /// Construct a new [`WalletService`] using the configured path prefix
    pub fn new(client: ApiClient, settings: &Settings) -> Self {
        Self::with_prefix(client, settings.api_prefix.clone())
    }

    /// Construct a new [`WalletService`] serving endpoints under `prefix`
    pub fn with_prefix(client: ApiClient, prefix: String) -> Self {
        WalletService { client, prefix }
    }

    fn path(&self, endpoint: &str) -> String {
        format!("{}{}", self.prefix, endpoint)
    }
}

impl WalletApi for WalletService {
    async fn verify_wallet(&self, address: &str) -> Result<WalletVerifyResponseData, Error> {
        debug!("Beginning wallet verification for address: {address}");

        let body = VerifyWalletRequest { address };
        let envelope: ApiEnvelope<WalletVerifyResponseData> =
            self.client.post(&self.path(VERIFY_PATH), &body).await?;

        let data = envelope
            .into_success()?
            .data
            .ok_or(Error::InvalidApiResponse)?;

        debug!(found = data.found, "Received wallet verification");
        Ok(data)
    }

    async fn fetch_metadata(&self) -> Result<Option<WalletMetadata>, Error> {
        debug!("Fetching dataset metadata");

        let envelope: ApiEnvelope<WalletMetadata> =
            self.client.get(&self.path(METADATA_PATH)).await?;

        Ok(envelope.into_success()?.data)
    }
}
