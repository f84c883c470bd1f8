#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod client;
pub mod common;
pub mod config;
pub mod logging;
pub mod resolver;
pub mod service;
pub mod store;

/// Log filter directives used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,wallet_checker=debug";
