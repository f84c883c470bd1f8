/// Configuration error variants.
#[derive(Debug, thiserror::Error)]
pub enum WalletConfigError {
    /// A URL setting could not be parsed
    #[error("[{0}] Invalid URL: failed to parse: {1}")]
    InvalidUrl(&'static str, url::ParseError),

    /// Scheme must be HTTP or HTTPS
    #[error("[{0}] Invalid URL scheme: must be HTTP or HTTPS, got '{1}'")]
    InvalidUrlScheme(&'static str, String),

    /// Host is required
    #[error("[{0}] Invalid URL: host is required")]
    UrlHostRequired(&'static str),

    /// An error returned for duration parameters that must be positive.
    #[error("Duration for {0} must be nonzero")]
    ZeroDurationForbidden(&'static str),
}
