//! Wallet risk types exchanged with the dataset API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod envelope;
pub mod error;

pub use envelope::{ApiEnvelope, ApiError, ApiSuccess};
pub use error::Error;

/// One evidence record contributing to a wallet's risk profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSource {
    /// Identifier of the list or feed the record comes from
    pub source: String,
    /// Kind of evidence, e.g. a phishing report
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free form detail reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Categorical risk level assigned by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    /// Scam category assigned by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scam_category: Option<String>,
    /// When the source recorded the evidence
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Whether the source is considered trusted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted: Option<bool>,
    /// Numeric score reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Aggregated risk view for one wallet address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    /// Canonical address as stored in the dataset
    pub address: String,
    /// Networks the address was seen on
    pub networks: Vec<String>,
    /// Categorical risk level, e.g. `ALTO`
    #[serde(default)]
    pub risk_level: Option<String>,
    /// Risk level mapped onto a 0-100 scale
    pub risk_level_numeric: i64,
    /// Risk score mapped onto a 0-100 scale
    #[serde(default)]
    pub risk_score_numeric: Option<i64>,
    /// Scam categories reported for the address
    pub scam_categories: Vec<String>,
    /// Domains linked to the address
    pub domains: Vec<String>,
    /// First time the address was reported
    #[serde(default)]
    pub first_seen: Option<String>,
    /// Last time the address was reported
    #[serde(default)]
    pub last_seen: Option<String>,
    /// Evidence records, in the order the API returned them
    pub sources: Vec<WalletSource>,
}

impl WalletSummary {
    /// Whether the dataset attributes any risk signal to the wallet.
    pub fn is_flagged(&self) -> bool {
        self.risk_level.is_some() || !self.scam_categories.is_empty()
    }
}

/// Describes the dataset backing the risk API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletMetadata {
    /// Dataset description
    pub description: String,
    /// Dataset version
    pub version: String,
    /// When the dataset was generated
    pub date_generated: String,
    /// Human label for each risk category code
    pub risk_categories: BTreeMap<String, String>,
    /// File the dataset was built from
    pub source_file: String,
    /// Number of wallet records
    pub records: u64,
    /// When the records were extracted
    pub extracted_at: String,
}

impl WalletMetadata {
    /// The human label for a risk category code, if the dataset defines it.
    pub fn risk_label(&self, code: &str) -> Option<&str> {
        self.risk_categories.get(code).map(String::as_str)
    }
}

/// Payload of a wallet verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletVerifyResponseData {
    /// Whether the wallet is in the dataset
    pub found: bool,
    /// The wallet summary, `None` on a miss
    #[serde(default)]
    pub summary: Option<WalletSummary>,
    /// Dataset context, returned on hits and misses alike
    pub metadata: WalletMetadata,
}
